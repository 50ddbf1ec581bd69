//! Regions represent the geographical areas whose households are simulated.
use crate::error::SimulationError;
use crate::provider::COORDINATE_TOLERANCE;
use crate::units::{Energy, Money, MoneyPerEnergy};
use anyhow::{Result, bail, ensure};
use derive_more::Display;
use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::rc::Rc;

/// A unique identifier for a region (e.g. "pittsburgh")
#[derive(
    Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RegionID(pub Rc<str>);

impl Borrow<str> for RegionID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionID {
    fn from(s: &str) -> Self {
        Self(Rc::from(s))
    }
}

impl From<String> for RegionID {
    fn from(s: String) -> Self {
        Self(Rc::from(s))
    }
}

/// The number of hours in a representative (non-leap) year
pub const HOURS_PER_YEAR: usize = 8760;

/// Descriptive information about a region registered with a data provider
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// A unique identifier for a region (e.g. "pittsburgh").
    pub id: RegionID,
    /// A text description of the region (e.g. "Pittsburgh, PA").
    pub description: String,
    /// Latitude of the weather station associated with the region
    pub latitude: f64,
    /// Longitude of the weather station associated with the region
    pub longitude: f64,
}

impl Region {
    /// Whether the region is at the given coordinates, within [`COORDINATE_TOLERANCE`]
    pub fn is_at(&self, latitude: f64, longitude: f64) -> bool {
        approx_eq!(f64, self.latitude, latitude, epsilon = COORDINATE_TOLERANCE)
            && approx_eq!(f64, self.longitude, longitude, epsilon = COORDINATE_TOLERANCE)
    }
}

/// The charges a utility levies on its residential customers.
///
/// These are the levers which the recovery strategies adjust.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStructure {
    /// Annual fixed charge paid by every customer
    pub fixed_charge_all: Money,
    /// Annual fixed charge paid by customers with solar installations
    pub fixed_charge_solar: Money,
    /// Charge per kWh bought from the utility
    pub variable_charge_all: MoneyPerEnergy,
}

/// Check that an hourly profile covers exactly one representative year with sensible values
fn check_hourly_profile(name: &str, values: &[f64]) -> Result<()> {
    ensure!(
        values.len() == HOURS_PER_YEAR,
        SimulationError::MalformedProfile(format!(
            "{name} has {} entries, expected {HOURS_PER_YEAR}",
            values.len()
        ))
    );

    if let Some(hour) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        bail!(SimulationError::MalformedProfile(format!(
            "{name} has invalid value {} at hour {hour}",
            values[hour]
        )));
    }

    Ok(())
}

/// All the data about a region which the simulation needs.
///
/// Hourly usage is that of one representative household. Hourly production is that of one
/// representative solar installation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfile {
    num_households: u32,
    wholesale_price: MoneyPerEnergy,
    utility_rates: RateStructure,
    hourly_usage: Vec<Energy>,
    hourly_solar_production: Vec<Energy>,
}

impl RegionProfile {
    /// Create a new [`RegionProfile`].
    ///
    /// Fails if either hourly sequence does not have exactly [`HOURS_PER_YEAR`] finite,
    /// non-negative entries, or if the wholesale price is negative.
    pub fn new(
        num_households: u32,
        wholesale_price: MoneyPerEnergy,
        utility_rates: RateStructure,
        hourly_usage: Vec<f64>,
        hourly_solar_production: Vec<f64>,
    ) -> Result<Self> {
        check_hourly_profile("Hourly usage", &hourly_usage)?;
        check_hourly_profile("Hourly solar production", &hourly_solar_production)?;
        ensure!(
            wholesale_price.is_finite() && wholesale_price >= MoneyPerEnergy(0.0),
            "Wholesale price must be a non-negative number (got {wholesale_price})"
        );

        Ok(Self {
            num_households,
            wholesale_price,
            utility_rates,
            hourly_usage: hourly_usage.into_iter().map(Energy).collect(),
            hourly_solar_production: hourly_solar_production.into_iter().map(Energy).collect(),
        })
    }

    /// The total number of households in the region
    pub fn num_households(&self) -> u32 {
        self.num_households
    }

    /// The price the utility pays for energy on the wholesale market
    pub fn wholesale_price(&self) -> MoneyPerEnergy {
        self.wholesale_price
    }

    /// The utility's current charges
    pub fn utility_rates(&self) -> &RateStructure {
        &self.utility_rates
    }

    /// Energy used by a representative household in each hour of the year
    pub fn hourly_usage(&self) -> &[Energy] {
        &self.hourly_usage
    }

    /// Energy produced by a representative solar installation in each hour of the year
    pub fn hourly_solar_production(&self) -> &[Energy] {
        &self.hourly_solar_production
    }

    /// Iterate over (usage, production) pairs for each hour of the year
    pub fn iter_hours(&self) -> impl Iterator<Item = (Energy, Energy)> + '_ {
        self.hourly_usage
            .iter()
            .copied()
            .zip(self.hourly_solar_production.iter().copied())
    }
}
