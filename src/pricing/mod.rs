//! Pricing engine module for rentals.
//!
//! Derives the monetary total of a rental at quote time and at settlement.

pub mod calculators;
pub mod engine;
pub mod requests;
pub mod responses;

// Re-export commonly used items
pub use calculators::round_money;
pub use engine::{PricingBreakdown, PricingEngine, PricingError};
pub use requests::ReturnDetails;
pub use responses::{MoneyResponse, PricingBreakdownResponse, RentalErrorResponse};
