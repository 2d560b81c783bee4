//! Core pricing calculation functions.
//!
//! Pure functions for rental pricing math - no I/O, no clock.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::rental::models::{
    BillingPlan, Coupon, Fee, FuelLevel, FuelPriceTable, FuelType, PlanKind,
};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use rental_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Whole days from `from` to `to`, truncated toward zero.
///
/// Negative when `to` precedes `from`.
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Plan contribution at quote time: the daily rate of the chosen plan times
/// the planned days. Kilometers are not known yet.
pub fn plan_quote_amount(plan: &BillingPlan, kind: PlanKind, days_rented: i64) -> Decimal {
    plan.daily_rate_for(kind) * Decimal::from(days_rented)
}

/// Plan contribution at settlement, including the kilometer component.
///
/// - Daily: daily rate per day plus per-km rate on every kilometer.
/// - Unlimited: daily rate per day, kilometers ignored.
/// - Capped: daily rate per day plus the overage rate on kilometers beyond
///   the free allowance.
pub fn plan_settlement_amount(
    plan: &BillingPlan,
    kind: PlanKind,
    days_rented: i64,
    kilometers_driven: Decimal,
) -> Decimal {
    let days = Decimal::from(days_rented);

    match kind {
        PlanKind::Daily => plan.daily_rate * days + plan.daily_per_km_rate * kilometers_driven,
        PlanKind::Unlimited => plan.unlimited_daily_rate * days,
        PlanKind::Capped => {
            let overage_km = kilometers_driven - plan.capped_free_km;
            let overage = if overage_km > Decimal::ZERO {
                overage_km * plan.capped_overage_per_km_rate
            } else {
                Decimal::ZERO
            };
            plan.capped_daily_rate * days + overage
        }
    }
}

/// Sum of all flat add-on fees.
pub fn fees_total(fees: &[Fee]) -> Decimal {
    fees.iter().map(|fee| fee.amount).sum()
}

/// Cost of refilling what the customer did not return.
pub fn fuel_cost(
    fuel_capacity: Decimal,
    level: FuelLevel,
    fuel_type: FuelType,
    prices: &FuelPriceTable,
) -> Decimal {
    let litres_owed = fuel_capacity * level.missing_fraction();
    litres_owed * prices.price_for(fuel_type)
}

/// Discount granted by an attached coupon; expiry is the caller's concern.
pub fn coupon_discount(coupon: Option<&Coupon>) -> Decimal {
    coupon.map_or(Decimal::ZERO, |c| c.discount_value)
}

/// Late penalty added at settlement: a surcharge on the running total plus a
/// flat charge per day late.
///
/// `days_late` is signed; an early return yields a negative flat term.
pub fn late_penalty(
    running_total: Decimal,
    days_late: i64,
    surcharge_rate: Decimal,
    fee_per_day: Decimal,
) -> Decimal {
    running_total * surcharge_rate + fee_per_day * Decimal::from(days_late)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    use crate::rental::validation::fixtures::{billing_plan, fuel_prices};

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(-1.234), 2), dec!(-1.23));
    }

    // ==================== whole_days_between tests ====================

    #[test]
    fn test_whole_days_truncates_partial_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(whole_days_between(start, start + Duration::hours(47)), 1);
        assert_eq!(whole_days_between(start, start + Duration::hours(48)), 2);
        assert_eq!(whole_days_between(start, start + Duration::hours(23)), 0);
    }

    #[test]
    fn test_whole_days_negative_truncates_toward_zero() {
        let start = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();

        assert_eq!(whole_days_between(start, start - Duration::hours(36)), -1);
        assert_eq!(whole_days_between(start, start - Duration::hours(12)), 0);
    }

    // ==================== plan tests ====================

    #[test]
    fn test_plan_quote_uses_rate_of_selected_kind() {
        let plan = billing_plan();

        assert_eq!(plan_quote_amount(&plan, PlanKind::Daily, 2), dec!(200));
        assert_eq!(plan_quote_amount(&plan, PlanKind::Unlimited, 2), dec!(300));
        assert_eq!(plan_quote_amount(&plan, PlanKind::Capped, 2), dec!(240));
    }

    #[test]
    fn test_daily_settlement_charges_every_kilometer() {
        let plan = billing_plan();
        // 100 * 2 + 0.5 * 50
        assert_eq!(
            plan_settlement_amount(&plan, PlanKind::Daily, 2, dec!(50)),
            dec!(225)
        );
    }

    #[test]
    fn test_unlimited_settlement_ignores_kilometers() {
        let plan = billing_plan();
        assert_eq!(
            plan_settlement_amount(&plan, PlanKind::Unlimited, 3, dec!(5000)),
            dec!(450)
        );
    }

    #[test]
    fn test_capped_settlement_overage_only_beyond_allowance() {
        let plan = billing_plan();

        assert_eq!(
            plan_settlement_amount(&plan, PlanKind::Capped, 2, dec!(80)),
            dec!(240)
        );
        assert_eq!(
            plan_settlement_amount(&plan, PlanKind::Capped, 2, dec!(100)),
            dec!(240)
        );
        // 120 * 2 + (130 - 100) * 2
        assert_eq!(
            plan_settlement_amount(&plan, PlanKind::Capped, 2, dec!(130)),
            dec!(300)
        );
    }

    // ==================== add-on tests ====================

    #[test]
    fn test_fees_total() {
        let fees = vec![
            Fee {
                name: "Insurance".to_string(),
                amount: dec!(35.90),
            },
            Fee {
                name: "Child seat".to_string(),
                amount: dec!(15.10),
            },
        ];

        assert_eq!(fees_total(&fees), dec!(51.00));
        assert_eq!(fees_total(&[]), dec!(0));
    }

    #[test]
    fn test_fuel_cost_full_tank_is_free() {
        let prices = fuel_prices();
        assert_eq!(
            fuel_cost(dec!(50), FuelLevel::Full, FuelType::Gasoline, &prices),
            dec!(0)
        );
    }

    #[test]
    fn test_fuel_cost_empty_tank_is_whole_capacity() {
        let prices = fuel_prices();
        assert_eq!(
            fuel_cost(dec!(50), FuelLevel::Empty, FuelType::Gasoline, &prices),
            dec!(300)
        );
    }

    #[test]
    fn test_fuel_cost_uses_price_of_vehicle_fuel_type() {
        let prices = fuel_prices();
        // 40 * 0.5 * 5
        assert_eq!(
            fuel_cost(dec!(40), FuelLevel::Half, FuelType::Diesel, &prices),
            dec!(100)
        );
        // 40 * 0.25 * 4
        assert_eq!(
            fuel_cost(dec!(40), FuelLevel::ThreeQuarters, FuelType::Ethanol, &prices),
            dec!(40)
        );
    }

    #[test]
    fn test_coupon_discount() {
        let coupon = Coupon {
            code: "TEN".to_string(),
            discount_value: dec!(10),
            expiration_date: Utc::now(),
        };

        assert_eq!(coupon_discount(Some(&coupon)), dec!(10));
        assert_eq!(coupon_discount(None), dec!(0));
    }

    #[test]
    fn test_late_penalty_on_time() {
        assert_eq!(late_penalty(dec!(225), 0, dec!(0.10), dec!(50)), dec!(22.5));
    }

    #[test]
    fn test_late_penalty_days_late() {
        assert_eq!(late_penalty(dec!(200), 3, dec!(0.10), dec!(50)), dec!(170));
    }

    #[test]
    fn test_late_penalty_early_return_reduces_total() {
        assert_eq!(late_penalty(dec!(200), -1, dec!(0.10), dec!(50)), dec!(-30));
    }
}
