//! Generation of the solar set-aside (SSA) path over the simulation horizon.
use crate::config::{check_horizon, check_ssa_range};
use crate::units::Dimensionless;
use anyhow::Result;

/// The SSA in force in each simulated year.
///
/// Year 0 is the baseline (`initial`) and is not simulated; years `1..=horizon` step linearly
/// towards the target.
#[derive(Debug, Clone, PartialEq)]
pub struct SsaTrajectory {
    initial: Dimensionless,
    step: Dimensionless,
    values: Vec<Dimensionless>,
}

impl SsaTrajectory {
    /// Generate the trajectory from `initial_ssa` to `target_ssa` over `horizon` years.
    ///
    /// Year `i` has SSA `initial_ssa + i * step`, where `step = (target_ssa - initial_ssa) /
    /// horizon`. The final year is exactly `target_ssa`.
    pub fn generate(initial_ssa: f64, target_ssa: f64, horizon: u32) -> Result<Self> {
        check_horizon(horizon)?;
        check_ssa_range(initial_ssa, target_ssa)?;

        let step = (target_ssa - initial_ssa) / horizon as f64;
        let (lower, upper) = if target_ssa >= initial_ssa {
            (initial_ssa, target_ssa)
        } else {
            (target_ssa, initial_ssa)
        };

        let values = (1..=horizon)
            .map(|year| {
                if year == horizon {
                    // Avoid accumulated rounding error in the final year
                    target_ssa
                } else {
                    (initial_ssa + year as f64 * step).clamp(lower, upper)
                }
            })
            .map(Dimensionless)
            .collect();

        Ok(Self {
            initial: Dimensionless(initial_ssa),
            step: Dimensionless(step),
            values,
        })
    }

    /// The SSA before the first simulated year
    pub fn initial(&self) -> Dimensionless {
        self.initial
    }

    /// The change in SSA from one year to the next
    pub fn step(&self) -> Dimensionless {
        self.step
    }

    /// The number of simulated years
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a trajectory covers at least one year
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the SSA for the given year, if it is within the horizon (year 0 is the baseline)
    pub fn get(&self, year: u32) -> Option<Dimensionless> {
        if year == 0 {
            return Some(self.initial);
        }

        self.values.get(year as usize - 1).copied()
    }

    /// Iterate over simulated years and their SSA, starting at year 1
    pub fn iter(&self) -> impl Iterator<Item = (u32, Dimensionless)> + '_ {
        (1..).zip(self.values.iter().copied())
    }
}
