//! Rental contract and the records it references.
//!
//! These are owned and persisted by the storage collaborator; the core only
//! reads them and computes against them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing strategy selected for a rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Per day plus per kilometer
    Daily,
    /// Flat per day, kilometers free
    Unlimited,
    /// Per day with a free kilometer allowance and an overage rate
    Capped,
}

/// Coarse fuel-remaining reading taken at return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelLevel {
    Empty,
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl FuelLevel {
    /// Fraction of the tank the customer owes.
    pub fn missing_fraction(self) -> Decimal {
        match self {
            FuelLevel::Empty => dec!(1),
            FuelLevel::Quarter => dec!(0.75),
            FuelLevel::Half => dec!(0.5),
            FuelLevel::ThreeQuarters => dec!(0.25),
            FuelLevel::Full => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Ethanol,
    Gas,
}

/// Per-category pricing parameters for every plan kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingPlan {
    pub id: Uuid,
    pub vehicle_category_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub daily_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub daily_per_km_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unlimited_daily_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub capped_daily_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub capped_free_km: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub capped_overage_per_km_rate: Decimal,
}

impl BillingPlan {
    /// Daily rate charged under the given plan kind.
    pub fn daily_rate_for(&self, kind: PlanKind) -> Decimal {
        match kind {
            PlanKind::Daily => self.daily_rate,
            PlanKind::Unlimited => self.unlimited_daily_rate,
            PlanKind::Capped => self.capped_daily_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub fuel_capacity: Decimal,
    pub fuel_type: FuelType,
    /// Maintained by storage whenever a rental opens or closes
    pub is_currently_rented: bool,
}

/// Flat add-on charge (insurance, child seat, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_value: Decimal,
    pub expiration_date: DateTime<Utc>,
}

impl Coupon {
    /// A coupon is usable strictly before its expiration instant.
    pub fn is_valid_at(&self, check_time: DateTime<Utc>) -> bool {
        self.expiration_date > check_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub license_expiration_date: DateTime<Utc>,
}

impl Driver {
    pub fn has_valid_license_at(&self, check_time: DateTime<Utc>) -> bool {
        self.license_expiration_date > check_time
    }
}

/// Per-unit fuel prices, fetched fresh before each settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelPriceTable {
    #[serde(with = "rust_decimal::serde::str")]
    pub gasoline: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub diesel: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ethanol: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub gas: Decimal,
}

impl FuelPriceTable {
    pub fn price_for(&self, fuel_type: FuelType) -> Decimal {
        match fuel_type {
            FuelType::Gasoline => self.gasoline,
            FuelType::Diesel => self.diesel,
            FuelType::Ethanol => self.ethanol,
            FuelType::Gas => self.gas,
        }
    }
}

/// A rental contract, open (quote) or closed (settled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub vehicle_category_id: Option<Uuid>,
    pub billing_plan: Option<BillingPlan>,
    pub driver: Option<Driver>,
    pub vehicle: Option<Vehicle>,
    pub coupon: Option<Coupon>,
    #[serde(default)]
    pub service_fees: Vec<Fee>,
    pub rental_date: DateTime<Utc>,
    pub expected_return_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub kilometers_driven: Option<Decimal>,
    pub remaining_fuel_level: Option<FuelLevel>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value: Decimal,
    pub is_closed: bool,
    pub plan_kind: PlanKind,
}

impl Rental {
    /// Whether return data has been recorded, i.e. the rental is being closed.
    pub fn is_being_returned(&self) -> bool {
        self.actual_return_date.is_some()
    }
}
