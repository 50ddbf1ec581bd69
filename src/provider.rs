//! Resolution of geographic coordinates to the data describing a region.
//!
//! The simulation itself only ever sees a [`RegionProfile`]. Where the data comes from is hidden
//! behind the [`DataProvider`] trait, so that the simulation can be run against synthetic data in
//! tests.
use crate::error::SimulationError;
use crate::region::{RateStructure, Region, RegionID, RegionProfile};
use crate::units::MoneyPerEnergy;
use anyhow::Result;
use indexmap::IndexMap;
use log::debug;

/// The maximum difference, in degrees, for two coordinates to be considered the same location
pub const COORDINATE_TOLERANCE: f64 = 1e-3;

/// A source of region data, keyed by geographic coordinates.
///
/// Every lookup fails with [`SimulationError::RegionNotFound`] if there is no region registered
/// at the given coordinates.
pub trait DataProvider {
    /// The number of households in the region
    fn lookup_household_count(&self, latitude: f64, longitude: f64) -> Result<u32>;

    /// The price at which the region's utility buys energy
    fn lookup_wholesale_price(&self, latitude: f64, longitude: f64) -> Result<MoneyPerEnergy>;

    /// The utility's charges to residential customers
    fn lookup_utility_rates(&self, latitude: f64, longitude: f64) -> Result<RateStructure>;

    /// Hourly energy usage of a representative household
    fn lookup_hourly_usage(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>>;

    /// Hourly energy production of a representative residential solar installation
    fn lookup_hourly_solar_production(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>>;
}

/// Gather everything the simulation needs to know about the region at the given coordinates
pub fn load_region_profile<P: DataProvider + ?Sized>(
    provider: &P,
    latitude: f64,
    longitude: f64,
) -> Result<RegionProfile> {
    RegionProfile::new(
        provider.lookup_household_count(latitude, longitude)?,
        provider.lookup_wholesale_price(latitude, longitude)?,
        provider.lookup_utility_rates(latitude, longitude)?,
        provider.lookup_hourly_usage(latitude, longitude)?,
        provider.lookup_hourly_solar_production(latitude, longitude)?,
    )
}

/// All the data held about a single region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionData {
    /// Location and description of the region
    pub region: Region,
    /// Number of households (from census data)
    pub households: u32,
    /// Wholesale energy price
    pub wholesale_price: MoneyPerEnergy,
    /// Utility charges
    pub rates: RateStructure,
    /// Hourly usage for a representative household
    pub hourly_usage: Vec<f64>,
    /// Hourly production for a representative solar installation
    pub hourly_solar_production: Vec<f64>,
}

/// An in-memory [`DataProvider`] holding data for a set of regions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionRegistry {
    regions: IndexMap<RegionID, RegionData>,
}

impl RegionRegistry {
    /// Create a registry from region data, keyed by region ID
    pub fn new(regions: IndexMap<RegionID, RegionData>) -> Self {
        Self { regions }
    }

    /// Iterate over the registered regions in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &RegionData> {
        self.regions.values()
    }

    /// Find the region registered at the given coordinates
    pub fn find(&self, latitude: f64, longitude: f64) -> Result<&RegionData> {
        let data = self
            .regions
            .values()
            .find(|data| data.region.is_at(latitude, longitude))
            .ok_or(SimulationError::RegionNotFound {
                latitude,
                longitude,
            })?;
        debug!(
            "Coordinates ({latitude}, {longitude}) resolved to region {}",
            data.region.id
        );

        Ok(data)
    }
}

impl DataProvider for RegionRegistry {
    fn lookup_household_count(&self, latitude: f64, longitude: f64) -> Result<u32> {
        Ok(self.find(latitude, longitude)?.households)
    }

    fn lookup_wholesale_price(&self, latitude: f64, longitude: f64) -> Result<MoneyPerEnergy> {
        Ok(self.find(latitude, longitude)?.wholesale_price)
    }

    fn lookup_utility_rates(&self, latitude: f64, longitude: f64) -> Result<RateStructure> {
        Ok(self.find(latitude, longitude)?.rates)
    }

    fn lookup_hourly_usage(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>> {
        Ok(self.find(latitude, longitude)?.hourly_usage.clone())
    }

    fn lookup_hourly_solar_production(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>> {
        Ok(self
            .find(latitude, longitude)?
            .hourly_solar_production
            .clone())
    }
}
