//! Fuel price feed and in-memory caching using moka
//!
//! Settlement needs current per-unit fuel prices. The feed is external; prices
//! move slowly, so a fetched table is reused until its TTL runs out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::config::PricingConfig;
use crate::rental::models::FuelPriceTable;

/// Fuel price feed errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FuelPriceError {
    #[error("fuel price feed unavailable: {0}")]
    Unavailable(String),

    #[error("malformed fuel price table: {0}")]
    Malformed(String),
}

/// Source of current fuel prices
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FuelPriceFeed: Send + Sync {
    async fn current_prices(&self) -> Result<FuelPriceTable, FuelPriceError>;
}

/// Feed that always answers with the same table.
#[derive(Debug, Clone)]
pub struct StaticFuelPriceFeed {
    table: FuelPriceTable,
}

impl StaticFuelPriceFeed {
    pub fn new(table: FuelPriceTable) -> Self {
        Self { table }
    }

    /// Parse a table such as `{"gasoline": "5.89", "diesel": "6.10", ...}`.
    pub fn from_json(json: &str) -> Result<Self, FuelPriceError> {
        let table = serde_json::from_str(json)
            .map_err(|e| FuelPriceError::Malformed(e.to_string()))?;
        Ok(Self::new(table))
    }
}

#[async_trait]
impl FuelPriceFeed for StaticFuelPriceFeed {
    async fn current_prices(&self) -> Result<FuelPriceTable, FuelPriceError> {
        Ok(self.table.clone())
    }
}

const PRICES_KEY: &str = "current";

/// Caches the latest fuel price table in front of a feed
#[derive(Clone)]
pub struct FuelPriceCache<F> {
    feed: Arc<F>,
    prices: Cache<&'static str, Arc<FuelPriceTable>>,
}

impl<F: FuelPriceFeed> FuelPriceCache<F> {
    pub fn new(feed: F, ttl: Duration) -> Self {
        Self {
            feed: Arc::new(feed),
            prices: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Cache whose TTL is `PricingConfig::fuel_price_ttl`.
    pub fn from_config(feed: F, config: &PricingConfig) -> Self {
        Self::new(feed, config.fuel_price_ttl)
    }

    /// Cached table, or a fresh one from the feed.
    pub async fn prices(&self) -> Result<Arc<FuelPriceTable>, FuelPriceError> {
        if let Some(cached) = self.prices.get(PRICES_KEY).await {
            debug!("Cache HIT for fuel prices");
            return Ok(cached);
        }

        debug!("Cache MISS for fuel prices");
        let table = match self.feed.current_prices().await {
            Ok(table) => Arc::new(table),
            Err(e) => {
                warn!("Failed to fetch fuel prices: {}", e);
                return Err(e);
            }
        };

        self.prices.insert(PRICES_KEY, Arc::clone(&table)).await;
        Ok(table)
    }

    /// Drop the cached table so the next settlement fetches fresh prices.
    pub async fn invalidate(&self) {
        self.prices.invalidate(PRICES_KEY).await;
        info!("Fuel price cache invalidated");
    }
}
