//! Structural and business rules for rentals.
//!
//! Every rule is evaluated and each failure is recorded against the field it
//! concerns, so the presentation layer can show all problems at once.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::clock::Clock;

use super::models::{Coupon, Rental};

pub const LICENSE_EXPIRED: &str = "license expired";
pub const VEHICLE_ALREADY_RENTED: &str = "vehicle already rented";
pub const RENTAL_DATE_AFTER_EXPECTED_RETURN: &str = "rental date must precede expected return";
pub const RETURN_BEFORE_RENTAL: &str = "return date must be after rental date";
pub const NEGATIVE_TOTAL: &str = "total value cannot be negative";
pub const NEGATIVE_KILOMETERS: &str = "kilometers driven cannot be negative";

/// A single field-scoped rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulates rule violations in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.push(ValidationError {
            field,
            message: message.into(),
        });
        self
    }

    /// Record a violation when `failed` holds.
    pub fn check(&mut self, failed: bool, field: &'static str, message: &str) -> &mut Self {
        if failed {
            self.push(field, message);
        }
        self
    }

    /// Record `"<field> is required"` when the value is absent.
    pub fn require<T>(&mut self, value: Option<&T>, field: &'static str) -> &mut Self {
        if value.is_none() {
            self.push(field, format!("{field} is required"));
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Drop every violation recorded against `field`.
    pub fn discard(&mut self, field: &str) -> &mut Self {
        self.errors.retain(|e| e.field != field);
        self
    }

    /// Whether any violation was recorded against `field`.
    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Message list for display, one line per violation.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

/// Rental rule set, parameterised by the source of "now".
#[derive(Debug, Clone)]
pub struct RentalValidator<C> {
    clock: C,
}

impl<C: Clock> RentalValidator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Evaluate every rule against `rental`; an empty report means valid.
    pub fn validate(&self, rental: &Rental) -> ValidationReport {
        let now = self.clock.now();
        let mut report = ValidationReport::new();

        report
            .require(rental.employee_id.as_ref(), "employee")
            .require(rental.customer_id.as_ref(), "customer")
            .require(rental.vehicle_category_id.as_ref(), "vehicle_category")
            .require(rental.billing_plan.as_ref(), "billing_plan")
            .require(rental.driver.as_ref(), "driver");

        if let Some(driver) = &rental.driver {
            report.check(!driver.has_valid_license_at(now), "driver", LICENSE_EXPIRED);
        }

        report.require(rental.vehicle.as_ref(), "vehicle");

        // Availability only matters while booking; a returning vehicle is rented by this contract.
        if let Some(vehicle) = rental.vehicle.as_ref().filter(|_| !rental.is_being_returned()) {
            report.check(vehicle.is_currently_rented, "vehicle", VEHICLE_ALREADY_RENTED);
        }

        report.check(
            rental.rental_date >= rental.expected_return_date,
            "rental_date",
            RENTAL_DATE_AFTER_EXPECTED_RETURN,
        );

        if let Some(returned) = rental.actual_return_date {
            report.check(
                returned <= rental.rental_date,
                "actual_return_date",
                RETURN_BEFORE_RENTAL,
            );
        }

        report.check(
            rental.total_value < Decimal::ZERO,
            "total_value",
            NEGATIVE_TOTAL,
        );

        if let Some(km) = rental.kilometers_driven {
            report.check(km < Decimal::ZERO, "kilometers_driven", NEGATIVE_KILOMETERS);
        }

        report
    }

    /// Whether `coupon` may still be applied as a discount.
    pub fn is_coupon_valid(&self, coupon: &Coupon) -> bool {
        coupon.is_valid_at(self.clock.now())
    }
}

/// A concluded rental can no longer be modified.
pub fn is_concluded(rental: &Rental) -> bool {
    rental.is_closed
}

/// Whether the rental's vehicle still counts as out on this contract.
pub fn is_vehicle_currently_rented(rental: &Rental) -> bool {
    !is_concluded(rental)
        && rental
            .vehicle
            .as_ref()
            .is_some_and(|vehicle| vehicle.is_currently_rented)
}
