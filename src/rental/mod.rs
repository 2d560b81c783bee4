//! Rental contracts, the rules they must satisfy, and the booking/return workflow.

pub mod models;
pub mod service;
pub mod validation;

pub use models::{
    BillingPlan, Coupon, Driver, Fee, FuelLevel, FuelPriceTable, FuelType, PlanKind, Rental,
    Vehicle,
};
pub use service::{RentalService, RentalStore, ServiceError, StoreError};
pub use validation::{is_concluded, is_vehicle_currently_rented};
