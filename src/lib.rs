//! Rental validation and pricing engine.
//!
//! Decides whether a vehicle rental may be opened or closed and derives its
//! monetary total, both as a quote at booking time and as the final settlement
//! when the vehicle comes back.

pub mod clock;
pub mod config;
pub mod error;
pub mod fuel;
pub mod pricing;
pub mod rental;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PricingConfig;
pub use error::{AppError, Result};
pub use pricing::{PricingBreakdown, PricingEngine, PricingError};
pub use rental::validation::{RentalValidator, ValidationError, ValidationReport};
