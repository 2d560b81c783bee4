//! Request DTOs accepted from the presentation layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::rental::models::{FuelLevel, Rental};

/// Data collected when a vehicle comes back
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReturnDetails {
    pub actual_return_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::str")]
    pub kilometers_driven: Decimal,
    pub remaining_fuel_level: FuelLevel,
}

impl ReturnDetails {
    /// Record the return data on `rental`.
    pub fn apply_to(&self, rental: &mut Rental) {
        rental.actual_return_date = Some(self.actual_return_date);
        rental.kilometers_driven = Some(self.kilometers_driven);
        rental.remaining_fuel_level = Some(self.remaining_fuel_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::rental::validation::fixtures::rental;

    #[test]
    fn test_return_details_from_json() {
        let details: ReturnDetails = serde_json::from_str(
            r#"{
                "actual_return_date": "2024-05-12T09:00:00Z",
                "kilometers_driven": "132.5",
                "remaining_fuel_level": "quarter"
            }"#,
        )
        .unwrap();

        assert_eq!(details.kilometers_driven, dec!(132.5));
        assert_eq!(details.remaining_fuel_level, FuelLevel::Quarter);
    }

    #[test]
    fn test_unknown_fuel_level_is_rejected() {
        let result: Result<ReturnDetails, _> = serde_json::from_str(
            r#"{
                "actual_return_date": "2024-05-12T09:00:00Z",
                "kilometers_driven": "10",
                "remaining_fuel_level": "overflowing"
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_apply_to_records_return_data() {
        let mut rental = rental();
        let details = ReturnDetails {
            actual_return_date: rental.expected_return_date,
            kilometers_driven: dec!(75),
            remaining_fuel_level: FuelLevel::Half,
        };

        details.apply_to(&mut rental);

        assert_eq!(rental.actual_return_date, Some(rental.expected_return_date));
        assert_eq!(rental.kilometers_driven, Some(dec!(75)));
        assert_eq!(rental.remaining_fuel_level, Some(FuelLevel::Half));
    }
}
