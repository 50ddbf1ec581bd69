//! Calculation of the energy displaced from utility sales by residential solar in a year.
use crate::region::RegionProfile;
use crate::units::{Dimensionless, Energy, Money};

/// The effect of one year's solar adoption on the utility's sales
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    /// The number of households with a solar installation
    pub adopting_households: u32,
    /// Energy which households supplied from their own solar installations instead of buying it
    pub displaced_energy: Energy,
    /// The wholesale value of the displaced energy
    pub revenue_shortfall: Money,
}

/// The number of households which must adopt solar to meet the given SSA.
///
/// This is `ssa * num_households` rounded to the nearest whole household (halves round up).
pub fn adopting_households(ssa: Dimensionless, num_households: u32) -> u32 {
    let count = (ssa.0 * num_households as f64).round();

    // ssa is at most 1, but clamp anyway so the count can never exceed the households available
    count.clamp(0.0, num_households as f64) as u32
}

/// The energy displaced in a single hour.
///
/// Each adopting household supplies itself with its own production, up to its own usage (excess
/// production is not credited). The total can never exceed the region's consumption in that hour.
pub fn displaced_energy_in_hour(
    usage: Energy,
    production: Energy,
    adopting_households: u32,
    num_households: u32,
) -> Energy {
    let self_supplied = if production < usage {
        production
    } else {
        usage
    };
    let displaced = self_supplied * Dimensionless(adopting_households as f64);
    let total_consumption = usage * Dimensionless(num_households as f64);

    if displaced < total_consumption {
        displaced
    } else {
        total_consumption
    }
}

/// Calculate the displaced energy and revenue shortfall for a year with the given SSA
pub fn compute_shortfall(ssa: Dimensionless, region: &RegionProfile) -> EnergyBalance {
    let num_households = region.num_households();
    let adopting = adopting_households(ssa, num_households);

    let displaced_energy: Energy = region
        .iter_hours()
        .map(|(usage, production)| {
            displaced_energy_in_hour(usage, production, adopting, num_households)
        })
        .sum();

    EnergyBalance {
        adopting_households: adopting,
        displaced_energy,
        revenue_shortfall: displaced_energy * region.wholesale_price(),
    }
}

/// The region's total annual consumption, whatever its source
pub fn total_consumption(region: &RegionProfile) -> Energy {
    let usage: Energy = region.hourly_usage().iter().copied().sum();
    usage * Dimensionless(region.num_households() as f64)
}

/// The energy still bought from the utility once displaced energy is accounted for
pub fn purchased_energy(region: &RegionProfile, balance: &EnergyBalance) -> Energy {
    total_consumption(region) - balance.displaced_energy
}
