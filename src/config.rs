//! The parameters of a single simulation run.
use crate::error::SimulationError;
use crate::input::{input_err_msg, read_toml};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The file in a data directory holding default run parameters
const PARAMETERS_FILE_NAME: &str = "parameters.toml";

/// Check that `value` is a valid solar set-aside fraction
fn check_ssa(name: &str, value: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        SimulationError::InvalidConfiguration(format!(
            "{name} must be between 0 and 1 (got {value})"
        ))
    );

    Ok(())
}

/// The user-supplied parameters for a run.
///
/// These are fixed for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// The solar set-aside in force before the simulation starts
    pub initial_ssa: f64,
    /// The solar set-aside to be reached in the final simulated year
    pub target_ssa: f64,
    /// The number of years to simulate
    pub horizon: u32,
    /// Latitude of the region
    pub latitude: f64,
    /// Longitude of the region
    pub longitude: f64,
}

impl SimulationConfig {
    /// Create a new [`SimulationConfig`], checking that it is valid
    pub fn new(
        initial_ssa: f64,
        target_ssa: f64,
        horizon: u32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let config = Self {
            initial_ssa,
            target_ssa,
            horizon,
            latitude,
            longitude,
        };
        config.validate()?;

        Ok(config)
    }

    /// Read the run parameters stored in `parameters.toml` in the given data directory
    pub fn from_path<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let file_path = data_dir.as_ref().join(PARAMETERS_FILE_NAME);
        let config: Self = read_toml(&file_path)?;
        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(config)
    }

    /// Check that the SSAs lie in [0, 1] and that at least one year is simulated
    pub fn validate(&self) -> Result<()> {
        check_horizon(self.horizon)?;
        check_ssa_range(self.initial_ssa, self.target_ssa)?;
        ensure!(
            self.latitude.is_finite() && self.longitude.is_finite(),
            SimulationError::InvalidConfiguration("coordinates must be finite numbers".into())
        );

        Ok(())
    }
}

/// Check that the horizon covers at least one year
pub(crate) fn check_horizon(horizon: u32) -> Result<()> {
    ensure!(
        horizon >= 1,
        SimulationError::InvalidConfiguration("horizon must be at least one year".into())
    );

    Ok(())
}

/// Check that both SSA values are valid fractions
pub(crate) fn check_ssa_range(initial_ssa: f64, target_ssa: f64) -> Result<()> {
    check_ssa("initial_ssa", initial_ssa)?;
    check_ssa("target_ssa", target_ssa)
}
