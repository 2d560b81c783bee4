//! Response DTOs handed to the presentation layer.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PricingConfig;
use crate::rental::service::ServiceError;
use crate::rental::validation::ValidationError;

use super::calculators::round_money;
use super::engine::PricingBreakdown;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    /// Rounded to cents for display.
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount: round_money(amount, 2),
            currency: currency.to_string(),
        }
    }
}

/// Response for a quote or settlement
#[derive(Debug, Clone, Serialize)]
pub struct PricingBreakdownResponse {
    pub days_rented: i64,
    pub days_late: i64,
    pub plan: MoneyResponse,
    pub fees: MoneyResponse,
    pub fuel: MoneyResponse,
    pub discount: MoneyResponse,
    pub late_penalty: MoneyResponse,
    pub total: MoneyResponse,
}

impl PricingBreakdownResponse {
    /// Amounts stamped with the configured currency.
    pub fn from_breakdown(breakdown: &PricingBreakdown, config: &PricingConfig) -> Self {
        let currency = config.currency.as_str();
        Self {
            days_rented: breakdown.days_rented,
            days_late: breakdown.days_late,
            plan: MoneyResponse::new(breakdown.plan, currency),
            fees: MoneyResponse::new(breakdown.fees, currency),
            fuel: MoneyResponse::new(breakdown.fuel, currency),
            discount: MoneyResponse::new(breakdown.discount, currency),
            late_penalty: MoneyResponse::new(breakdown.late_penalty, currency),
            total: MoneyResponse::new(breakdown.total, currency),
        }
    }
}

/// Generic rental error response
#[derive(Debug, Serialize)]
pub struct RentalErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ValidationError>,
}

impl From<&ServiceError> for RentalErrorResponse {
    fn from(error: &ServiceError) -> Self {
        let violations = match error {
            ServiceError::Validation(report) => report.errors().to_vec(),
            _ => Vec::new(),
        };

        Self {
            error_type: error.kind().to_string(),
            message: error.to_string(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::rental::validation::{ValidationReport, LICENSE_EXPIRED};

    #[test]
    fn test_money_response_rounds_to_cents() {
        let money = MoneyResponse::new(dec!(247.505), "BRL");
        assert_eq!(money.amount, dec!(247.50));

        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "247.50");
        assert_eq!(json["currency"], "BRL");
    }

    #[test]
    fn test_breakdown_response_serializes_every_line() {
        let breakdown = PricingBreakdown {
            days_rented: 2,
            days_late: 0,
            plan: dec!(225),
            fees: dec!(0),
            fuel: dec!(0),
            discount: dec!(0),
            late_penalty: dec!(22.5),
            total: dec!(247.5),
        };

        let response =
            PricingBreakdownResponse::from_breakdown(&breakdown, &PricingConfig::default());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["days_rented"], 2);
        assert_eq!(json["total"]["currency"], "BRL");
        assert_eq!(json["total"]["amount"], "247.5");
        assert_eq!(json["late_penalty"]["amount"], "22.5");
    }

    #[test]
    fn test_breakdown_response_uses_configured_currency() {
        let config = PricingConfig::from_lookup(|key| match key {
            "RENTAL_CURRENCY" => Some("usd".to_string()),
            _ => None,
        })
        .unwrap();
        let breakdown = PricingBreakdown {
            days_rented: 1,
            days_late: 0,
            plan: dec!(100),
            fees: dec!(0),
            fuel: dec!(0),
            discount: dec!(0),
            late_penalty: dec!(10),
            total: dec!(110),
        };

        let response = PricingBreakdownResponse::from_breakdown(&breakdown, &config);

        assert_eq!(response.total.currency, "USD");
        assert_eq!(response.plan.currency, "USD");
    }

    #[test]
    fn test_error_response_carries_violations() {
        let mut report = ValidationReport::new();
        report.push("driver", LICENSE_EXPIRED);
        let error = ServiceError::Validation(report);

        let response = RentalErrorResponse::from(&error);

        assert_eq!(response.error_type, "validation");
        assert_eq!(response.violations.len(), 1);
        assert_eq!(response.violations[0].field, "driver");
    }

    #[test]
    fn test_error_response_omits_empty_violations() {
        let response = RentalErrorResponse::from(&ServiceError::AlreadyConcluded);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error_type"], "already_concluded");
        assert!(json.get("violations").is_none());
    }
}
