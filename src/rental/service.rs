//! Rental workflow: validate, price, persist.
//!
//! The validator gates the pricing engine; only valid rentals are priced and
//! handed to storage, and the priced result is checked again before it is
//! written. Storage itself is a collaborator behind [`RentalStore`].

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::PricingConfig;
use crate::fuel::{FuelPriceCache, FuelPriceError, FuelPriceFeed};
use crate::pricing::{PricingBreakdown, PricingEngine, PricingError, ReturnDetails};

use super::models::Rental;
use super::validation::{
    is_concluded, is_vehicle_currently_rented, RentalValidator, ValidationReport,
};

/// Storage collaborator failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Backend(String),
}

/// Rental workflow error types
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("rental is invalid: {0}")]
    Validation(ValidationReport),

    #[error("coupon {code} has expired")]
    ExpiredCoupon { code: String },

    #[error("vehicle {plate} is on an open rental; conclude it first")]
    VehicleUnavailable { plate: String },

    #[error("rental is already concluded")]
    AlreadyConcluded,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    FuelPrices(#[from] FuelPriceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable machine-readable name for the error.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::ExpiredCoupon { .. } => "expired_coupon",
            ServiceError::VehicleUnavailable { .. } => "vehicle_unavailable",
            ServiceError::AlreadyConcluded => "already_concluded",
            ServiceError::Pricing(_) => "pricing",
            ServiceError::FuelPrices(_) => "fuel_prices",
            ServiceError::Store(_) => "storage",
        }
    }
}

/// Persistence collaborator for rentals and the vehicle rented flag.
///
/// Writes are pending until [`RentalStore::commit`]; [`RentalStore::rollback`]
/// discards them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Insert or update a rental with its computed total.
    async fn save_rental(&self, rental: &Rental) -> Result<(), StoreError>;

    /// Maintain `Vehicle::is_currently_rented`.
    async fn set_vehicle_rented(&self, vehicle_id: Uuid, rented: bool) -> Result<(), StoreError>;

    async fn commit(&self) -> Result<(), StoreError>;

    async fn rollback(&self) -> Result<(), StoreError>;
}

pub struct RentalService<S, F, C> {
    store: S,
    fuel_prices: FuelPriceCache<F>,
    validator: RentalValidator<C>,
    engine: PricingEngine,
}

impl<S, F, C> RentalService<S, F, C>
where
    S: RentalStore,
    F: FuelPriceFeed,
    C: Clock,
{
    pub fn new(store: S, fuel_prices: FuelPriceCache<F>, clock: C, engine: PricingEngine) -> Self {
        Self {
            store,
            fuel_prices,
            validator: RentalValidator::new(clock),
            engine,
        }
    }

    /// Engine and fuel price cache both built from `config`.
    pub fn from_config(store: S, feed: F, clock: C, config: PricingConfig) -> Self {
        let fuel_prices = FuelPriceCache::from_config(feed, &config);
        Self::new(store, fuel_prices, clock, PricingEngine::new(config))
    }

    pub fn validator(&self) -> &RentalValidator<C> {
        &self.validator
    }

    /// Validate and price a rental without persisting anything.
    pub fn quote(&self, rental: &Rental) -> Result<PricingBreakdown, ServiceError> {
        self.ensure_valid(rental)?;
        Ok(self.engine.quote(rental)?)
    }

    /// Book a rental: validate, price provisionally, store, flag the vehicle.
    pub async fn open_rental(&self, mut rental: Rental) -> Result<Rental, ServiceError> {
        debug!(rental_id = %rental.id, "Trying to open rental");

        self.ensure_valid(&rental)?;

        if let Some(coupon) = &rental.coupon {
            if !self.validator.is_coupon_valid(coupon) {
                warn!(rental_id = %rental.id, code = %coupon.code, "Rejected expired coupon");
                return Err(ServiceError::ExpiredCoupon {
                    code: coupon.code.clone(),
                });
            }
        }

        rental.total_value = self.engine.compute_initial_total(&rental)?;
        rental.is_closed = false;
        self.ensure_valid(&rental)?;

        self.persist(&rental, true).await?;
        if let Some(vehicle) = rental.vehicle.as_mut() {
            vehicle.is_currently_rented = true;
        }

        info!(
            rental_id = %rental.id,
            total = %rental.total_value,
            "Opened rental"
        );

        Ok(rental)
    }

    /// Settle a returned rental: record return data, validate, price with
    /// current fuel prices, conclude, store, release the vehicle.
    pub async fn close_rental(
        &self,
        mut rental: Rental,
        details: &ReturnDetails,
    ) -> Result<Rental, ServiceError> {
        debug!(rental_id = %rental.id, "Trying to close rental");

        if is_concluded(&rental) {
            warn!(rental_id = %rental.id, "Rental already concluded");
            return Err(ServiceError::AlreadyConcluded);
        }

        details.apply_to(&mut rental);

        // The stored total is provisional; it is replaced and checked below.
        let mut report = self.validator.validate(&rental);
        report.discard("total_value");
        self.reject_if_invalid(&rental, report)?;

        let prices = self.fuel_prices.prices().await?;
        rental.total_value = self.engine.compute_final_total(&rental, &prices)?;
        self.ensure_valid(&rental)?;
        rental.is_closed = true;

        self.persist(&rental, false).await?;
        if let Some(vehicle) = rental.vehicle.as_mut() {
            vehicle.is_currently_rented = false;
        }

        info!(
            rental_id = %rental.id,
            total = %rental.total_value,
            "Closed rental"
        );

        Ok(rental)
    }

    /// Fail when the rental's vehicle is still out on this open contract.
    pub fn check_availability(&self, rental: &Rental) -> Result<(), ServiceError> {
        if is_vehicle_currently_rented(rental) {
            let plate = rental
                .vehicle
                .as_ref()
                .map(|v| v.plate.clone())
                .unwrap_or_default();
            return Err(ServiceError::VehicleUnavailable { plate });
        }
        Ok(())
    }

    /// Write the rental and the vehicle flag as one unit; roll back on any failure.
    async fn persist(&self, rental: &Rental, vehicle_rented: bool) -> Result<(), ServiceError> {
        if let Err(e) = self.write(rental, vehicle_rented).await {
            warn!(rental_id = %rental.id, "Failed to persist rental: {}", e);
            if let Err(rollback) = self.store.rollback().await {
                warn!(rental_id = %rental.id, "Rollback failed: {}", rollback);
            }
            return Err(e.into());
        }

        Ok(())
    }

    async fn write(&self, rental: &Rental, vehicle_rented: bool) -> Result<(), StoreError> {
        self.store.save_rental(rental).await?;
        if let Some(vehicle) = &rental.vehicle {
            self.store.set_vehicle_rented(vehicle.id, vehicle_rented).await?;
        }
        self.store.commit().await
    }

    fn ensure_valid(&self, rental: &Rental) -> Result<(), ServiceError> {
        self.reject_if_invalid(rental, self.validator.validate(rental))
    }

    fn reject_if_invalid(
        &self,
        rental: &Rental,
        report: ValidationReport,
    ) -> Result<(), ServiceError> {
        if report.is_valid() {
            return Ok(());
        }

        warn!(
            rental_id = %rental.id,
            violations = report.errors().len(),
            "Rental failed validation"
        );
        Err(ServiceError::Validation(report))
    }
}
