//! Rental pricing engine.
//!
//! Computes the provisional total of a rental at booking time and its final
//! total at settlement. The engine assumes the rental already passed the
//! validator; it never re-validates, but it refuses to price when an input it
//! needs is absent instead of treating it as zero.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::PricingConfig;
use crate::rental::models::{FuelPriceTable, Rental};

use super::calculators::{
    coupon_discount, fees_total, fuel_cost, late_penalty, plan_quote_amount,
    plan_settlement_amount, whole_days_between,
};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("cannot price rental: missing {field}")]
    MissingInput { field: &'static str },
}

/// Line-by-line result of a pricing pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingBreakdown {
    pub days_rented: i64,
    /// Zero for quotes
    pub days_late: i64,
    pub plan: Decimal,
    pub fees: Decimal,
    pub fuel: Decimal,
    pub discount: Decimal,
    pub late_penalty: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Provisional total from the planned dates, at zero kilometers.
    pub fn compute_initial_total(&self, rental: &Rental) -> Result<Decimal, PricingError> {
        self.quote(rental).map(|b| b.total)
    }

    /// Final total from the recorded return data and current fuel prices.
    pub fn compute_final_total(
        &self,
        rental: &Rental,
        prices: &FuelPriceTable,
    ) -> Result<Decimal, PricingError> {
        self.settle(rental, prices).map(|b| b.total)
    }

    /// Quote-time pricing: plan for the planned days, fees, minus coupon.
    pub fn quote(&self, rental: &Rental) -> Result<PricingBreakdown, PricingError> {
        let plan = rental.billing_plan.as_ref().ok_or(PricingError::MissingInput {
            field: "billing_plan",
        })?;

        let days_rented = whole_days_between(rental.rental_date, rental.expected_return_date);

        let plan_amount = plan_quote_amount(plan, rental.plan_kind, days_rented);
        let fees = fees_total(&rental.service_fees);
        let discount = coupon_discount(rental.coupon.as_ref());
        let total = plan_amount + fees - discount;

        debug!(
            rental_id = %rental.id,
            days_rented,
            %total,
            "Quoted rental"
        );

        Ok(PricingBreakdown {
            days_rented,
            days_late: 0,
            plan: plan_amount,
            fees,
            fuel: Decimal::ZERO,
            discount,
            late_penalty: Decimal::ZERO,
            total,
        })
    }

    /// Settlement pricing: plan with kilometers, fees, fuel owed, minus
    /// coupon, then the late penalty on the running total.
    pub fn settle(
        &self,
        rental: &Rental,
        prices: &FuelPriceTable,
    ) -> Result<PricingBreakdown, PricingError> {
        let plan = rental.billing_plan.as_ref().ok_or(PricingError::MissingInput {
            field: "billing_plan",
        })?;
        let vehicle = rental.vehicle.as_ref().ok_or(PricingError::MissingInput {
            field: "vehicle",
        })?;
        let kilometers = rental.kilometers_driven.ok_or(PricingError::MissingInput {
            field: "kilometers_driven",
        })?;
        let fuel_level = rental.remaining_fuel_level.ok_or(PricingError::MissingInput {
            field: "remaining_fuel_level",
        })?;

        let days_rented = whole_days_between(rental.rental_date, rental.expected_return_date);
        let days_late = self.days_late(rental);

        let plan_amount = plan_settlement_amount(plan, rental.plan_kind, days_rented, kilometers);
        let fees = fees_total(&rental.service_fees);
        let fuel = fuel_cost(vehicle.fuel_capacity, fuel_level, vehicle.fuel_type, prices);
        let discount = coupon_discount(rental.coupon.as_ref());

        let running_total = plan_amount + fees + fuel - discount;
        let penalty = late_penalty(
            running_total,
            days_late,
            self.config.late_surcharge_rate,
            self.config.late_fee_per_day,
        );
        let total = running_total + penalty;

        debug!(
            rental_id = %rental.id,
            days_rented,
            days_late,
            %total,
            "Settled rental"
        );

        Ok(PricingBreakdown {
            days_rented,
            days_late,
            plan: plan_amount,
            fees,
            fuel,
            discount,
            late_penalty: penalty,
            total,
        })
    }

    /// Signed whole days between expected and actual return; a missing
    /// return date counts as one day.
    fn days_late(&self, rental: &Rental) -> i64 {
        let days = rental
            .actual_return_date
            .map_or(1, |returned| {
                whole_days_between(rental.expected_return_date, returned)
            });

        if self.config.clamp_early_return {
            days.max(0)
        } else {
            days
        }
    }
}
