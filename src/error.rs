//! Error handling for the rental core

use crate::config::ConfigError;
use crate::fuel::FuelPriceError;
use crate::pricing::PricingError;
use crate::rental::service::{ServiceError, StoreError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Fuel price error: {0}")]
    FuelPrices(#[from] FuelPriceError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, AppError>;
