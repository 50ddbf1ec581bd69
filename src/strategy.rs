//! The rules by which a utility recovers its revenue shortfall from its customers.
use crate::balance::EnergyBalance;
use crate::region::{RateStructure, RegionProfile};
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Convert a count of payers into a divisor, substituting 1 for 0 so division is always defined
fn payers(count: u32) -> Dimensionless {
    Dimensionless(count.max(1) as f64)
}

/// Recover the shortfall through a flat increase in every customer's fixed charge
pub fn fixed_charge_all(revenue_shortfall: Money, region: &RegionProfile) -> Money {
    revenue_shortfall / payers(region.num_households())
}

/// Recover the shortfall through a flat increase in the fixed charge of solar customers only
pub fn fixed_charge_solar(revenue_shortfall: Money, adopting_households: u32) -> Money {
    revenue_shortfall / payers(adopting_households)
}

/// Recover the shortfall through the variable charge.
///
/// The result is the increase in the average customer's bill, assuming all customers use energy
/// in the same proportion.
pub fn variable_charge_all(revenue_shortfall: Money, region: &RegionProfile) -> Money {
    revenue_shortfall / payers(region.num_households())
}

/// The increase in the per-kWh charge needed to recover the shortfall from the energy which is
/// still bought from the utility.
///
/// If less than 1 kWh is bought, the shortfall is spread over a single kWh.
pub fn variable_rate_increase(revenue_shortfall: Money, purchased_energy: Energy) -> MoneyPerEnergy {
    let purchased_energy = if purchased_energy > Energy(1.0) {
        purchased_energy
    } else {
        Energy(1.0)
    };

    revenue_shortfall / purchased_energy
}

/// A cost-recovery strategy
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Raise the fixed charge for all customers
    FixedChargeAll,
    /// Raise the fixed charge for solar customers only
    FixedChargeSolar,
    /// Raise the variable charge for all customers
    VariableChargeAll,
}

impl RecoveryStrategy {
    /// The cost to each affected customer of recovering a year's shortfall with this strategy
    pub fn allocate(self, balance: &EnergyBalance, region: &RegionProfile) -> Money {
        match self {
            Self::FixedChargeAll => fixed_charge_all(balance.revenue_shortfall, region),
            Self::FixedChargeSolar => {
                fixed_charge_solar(balance.revenue_shortfall, balance.adopting_households)
            }
            Self::VariableChargeAll => variable_charge_all(balance.revenue_shortfall, region),
        }
    }

    /// The utility's charges after this strategy has been applied.
    ///
    /// # Arguments
    ///
    /// * `rates` - The charges before recovery
    /// * `cost` - The output of [`RecoveryStrategy::allocate`]
    /// * `rate_increase` - The output of [`variable_rate_increase`]
    pub fn adjust_rates(
        self,
        rates: &RateStructure,
        cost: Money,
        rate_increase: MoneyPerEnergy,
    ) -> RateStructure {
        let mut rates = *rates;
        match self {
            Self::FixedChargeAll => {
                // Solar customers are customers too
                rates.fixed_charge_all += cost;
                rates.fixed_charge_solar += cost;
            }
            Self::FixedChargeSolar => rates.fixed_charge_solar += cost,
            Self::VariableChargeAll => rates.variable_charge_all += rate_increase,
        }

        rates
    }
}
