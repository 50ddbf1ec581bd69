//! Functionality for running the simulation.
use crate::balance::{compute_shortfall, purchased_energy};
use crate::config::SimulationConfig;
use crate::provider::{DataProvider, load_region_profile};
use crate::region::RegionProfile;
use crate::strategy::{RecoveryStrategy, variable_rate_increase};
use crate::trajectory::SsaTrajectory;
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use anyhow::Result;
use log::{debug, info};
use serde::Serialize;

/// The cost per affected customer of each recovery strategy in one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearResult {
    /// The simulated year (starting at 1)
    pub year: u32,
    /// Cost per customer of raising the fixed charge for all customers
    #[serde(rename = "fixed_charge_all")]
    pub cost_strategy1: Money,
    /// Cost per solar customer of raising the fixed charge for solar customers only
    #[serde(rename = "fixed_charge_solar")]
    pub cost_strategy2: Money,
    /// Average cost per customer of raising the variable charge
    #[serde(rename = "variable_charge_all")]
    pub cost_strategy3: Money,
}

impl YearResult {
    /// The cost for the given strategy
    pub fn cost(&self, strategy: RecoveryStrategy) -> Money {
        match strategy {
            RecoveryStrategy::FixedChargeAll => self.cost_strategy1,
            RecoveryStrategy::FixedChargeSolar => self.cost_strategy2,
            RecoveryStrategy::VariableChargeAll => self.cost_strategy3,
        }
    }
}

/// Intermediate quantities for one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearBalance {
    /// The simulated year (starting at 1)
    pub year: u32,
    /// The SSA in force
    pub ssa: Dimensionless,
    /// Households with a solar installation
    pub adopting_households: u32,
    /// Energy no longer bought from the utility
    pub displaced_energy: Energy,
    /// Wholesale value of the displaced energy
    pub revenue_shortfall: Money,
    /// Energy still bought from the utility across the region
    pub purchased_energy: Energy,
    /// Increase in the variable charge needed to recover the shortfall
    pub variable_rate_increase: MoneyPerEnergy,
}

/// The results of a complete run: one entry per simulated year, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<YearResult>,
    balances: Vec<YearBalance>,
}

impl ResultTable {
    /// The number of simulated years
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no years were simulated
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the per-year costs
    pub fn iter(&self) -> impl Iterator<Item = &YearResult> {
        self.rows.iter()
    }

    /// Iterate over the per-year intermediate quantities
    pub fn iter_balances(&self) -> impl Iterator<Item = &YearBalance> {
        self.balances.iter()
    }

    /// Add the results of the next year
    fn push(&mut self, row: YearResult, balance: YearBalance) {
        self.rows.push(row);
        self.balances.push(balance);
    }
}

/// Simulate a single year with the given SSA
fn simulate_year(
    year: u32,
    ssa: Dimensionless,
    region: &RegionProfile,
) -> (YearResult, YearBalance) {
    let balance = compute_shortfall(ssa, region);
    let allocate = |strategy: RecoveryStrategy| strategy.allocate(&balance, region);
    let purchased = purchased_energy(region, &balance);
    let rate_increase = variable_rate_increase(balance.revenue_shortfall, purchased);

    let row = YearResult {
        year,
        cost_strategy1: allocate(RecoveryStrategy::FixedChargeAll),
        cost_strategy2: allocate(RecoveryStrategy::FixedChargeSolar),
        cost_strategy3: allocate(RecoveryStrategy::VariableChargeAll),
    };
    let year_balance = YearBalance {
        year,
        ssa,
        adopting_households: balance.adopting_households,
        displaced_energy: balance.displaced_energy,
        revenue_shortfall: balance.revenue_shortfall,
        purchased_energy: purchased,
        variable_rate_increase: rate_increase,
    };

    (row, year_balance)
}

/// Run the simulation.
///
/// # Arguments:
///
/// * `config` - The parameters of the run
/// * `region` - Data for the region at the coordinates given in `config`
///
/// # Returns
///
/// One row per year from 1 to `config.horizon` inclusive.
pub fn run(config: &SimulationConfig, region: &RegionProfile) -> Result<ResultTable> {
    config.validate()?;
    let trajectory =
        SsaTrajectory::generate(config.initial_ssa, config.target_ssa, config.horizon)?;
    info!(
        "Simulating {} years: SSA {} -> {} (step {})",
        config.horizon,
        config.initial_ssa,
        config.target_ssa,
        trajectory.step().0
    );

    let mut table = ResultTable::default();
    for (year, ssa) in trajectory.iter() {
        let (row, balance) = simulate_year(year, ssa, region);
        debug!(
            "Year {year}: SSA {}, {} solar households, shortfall {}",
            ssa.0, balance.adopting_households, balance.revenue_shortfall
        );
        table.push(row, balance);
    }

    Ok(table)
}

/// Resolve the region at the configured coordinates, then run the simulation
pub fn run_from_provider<P: DataProvider + ?Sized>(
    config: &SimulationConfig,
    provider: &P,
) -> Result<ResultTable> {
    config.validate()?;
    let region = load_region_profile(provider, config.latitude, config.longitude)?;
    run(config, &region)
}
