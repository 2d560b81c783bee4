//! Pricing configuration loaded from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Knobs for the pricing engine and the fuel price cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Currency code stamped on money responses
    pub currency: String,
    /// Fraction of the running total charged at settlement
    pub late_surcharge_rate: Decimal,
    /// Flat amount charged per day late
    pub late_fee_per_day: Decimal,
    /// Clamp negative late days (early returns) to zero
    pub clamp_early_return: bool,
    /// How long a fetched fuel price table stays fresh
    pub fuel_price_ttl: Duration,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "BRL".to_string(),
            late_surcharge_rate: dec!(0.10),
            late_fee_per_day: dec!(50),
            clamp_early_return: false,
            fuel_price_ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl PricingConfig {
    /// Read configuration from the process environment (and `.env` if present).
    ///
    /// Unset variables fall back to [`PricingConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let currency = lookup("RENTAL_CURRENCY")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.currency);

        let late_surcharge_rate = parse_var(
            &lookup,
            "RENTAL_LATE_SURCHARGE_RATE",
            defaults.late_surcharge_rate,
        )?;
        let late_fee_per_day =
            parse_var(&lookup, "RENTAL_LATE_FEE_PER_DAY", defaults.late_fee_per_day)?;
        let clamp_early_return = parse_var(
            &lookup,
            "RENTAL_CLAMP_EARLY_RETURN",
            defaults.clamp_early_return,
        )?;
        let ttl_secs: u64 = parse_var(
            &lookup,
            "RENTAL_FUEL_PRICE_TTL_SECS",
            defaults.fuel_price_ttl.as_secs(),
        )?;

        Ok(Self {
            currency,
            late_surcharge_rate,
            late_fee_per_day,
            clamp_early_return,
            fuel_price_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw.clone(),
        }),
        None => Ok(default),
    }
}
