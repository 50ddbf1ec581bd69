//! Integration tests running the simulation against a synthetic data provider.
use anyhow::{Result, ensure};
use float_cmp::assert_approx_eq;
use itertools::Itertools;
use ssa_impact::config::SimulationConfig;
use ssa_impact::error::SimulationError;
use ssa_impact::provider::DataProvider;
use ssa_impact::region::{HOURS_PER_YEAR, RateStructure};
use ssa_impact::simulation::run_from_provider;
use ssa_impact::units::{Money, MoneyPerEnergy};

/// A single region with flat usage and solar production for half of each day
struct FlatRegion {
    latitude: f64,
    longitude: f64,
    households: u32,
}

impl FlatRegion {
    fn check_location(&self, latitude: f64, longitude: f64) -> Result<()> {
        ensure!(
            latitude == self.latitude && longitude == self.longitude,
            SimulationError::RegionNotFound {
                latitude,
                longitude
            }
        );

        Ok(())
    }
}

impl DataProvider for FlatRegion {
    fn lookup_household_count(&self, latitude: f64, longitude: f64) -> Result<u32> {
        self.check_location(latitude, longitude)?;
        Ok(self.households)
    }

    fn lookup_wholesale_price(&self, latitude: f64, longitude: f64) -> Result<MoneyPerEnergy> {
        self.check_location(latitude, longitude)?;
        Ok(MoneyPerEnergy(0.05))
    }

    fn lookup_utility_rates(&self, latitude: f64, longitude: f64) -> Result<RateStructure> {
        self.check_location(latitude, longitude)?;
        Ok(RateStructure {
            fixed_charge_all: Money(100.0),
            fixed_charge_solar: Money(100.0),
            variable_charge_all: MoneyPerEnergy(0.1),
        })
    }

    fn lookup_hourly_usage(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>> {
        self.check_location(latitude, longitude)?;
        Ok(vec![1.0; HOURS_PER_YEAR])
    }

    fn lookup_hourly_solar_production(&self, latitude: f64, longitude: f64) -> Result<Vec<f64>> {
        self.check_location(latitude, longitude)?;
        Ok((0..HOURS_PER_YEAR)
            .map(|hour| if hour % 24 < 12 { 3.0 } else { 0.0 })
            .collect())
    }
}

fn provider() -> FlatRegion {
    FlatRegion {
        latitude: 40.5,
        longitude: -80.233,
        households: 1000,
    }
}

#[test]
fn test_scenario() {
    let config = SimulationConfig::new(0.005, 0.2, 6, 40.5, -80.233).unwrap();
    let table = run_from_provider(&config, &provider()).unwrap();

    assert_eq!(
        table.iter().map(|row| row.year).collect_vec(),
        (1..=6).collect_vec()
    );

    // Each adopting household displaces 1 kWh for 12 hours a day
    let displaced_per_household = 12.0 * 365.0;
    let ssas = [0.0375, 0.07, 0.1025, 0.135, 0.1675, 0.2];
    for ((row, balance), ssa) in table.iter().zip(table.iter_balances()).zip(ssas) {
        assert_approx_eq!(f64, balance.ssa.0, ssa, epsilon = 1e-12);
        let adopting = f64::from(balance.adopting_households);
        assert!((adopting - ssa * 1000.0).abs() <= 0.5 + 1e-9);

        let shortfall = adopting * displaced_per_household * 0.05;
        assert_approx_eq!(
            Money,
            row.cost_strategy1,
            Money(shortfall / 1000.0),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Money,
            row.cost_strategy2,
            Money(shortfall / adopting),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Money,
            row.cost_strategy3,
            Money(shortfall / 1000.0),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_costs_grow_with_adoption() {
    let config = SimulationConfig::new(0.0, 1.0, 10, 40.5, -80.233).unwrap();
    let table = run_from_provider(&config, &provider()).unwrap();
    for (prev, next) in table.iter().tuple_windows() {
        assert!(next.cost_strategy1 >= prev.cost_strategy1);
    }
}

#[test]
fn test_region_not_found() {
    let config = SimulationConfig::new(0.005, 0.2, 6, 51.5, -0.1).unwrap();
    let err = run_from_provider(&config, &provider()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimulationError>(),
        Some(&SimulationError::RegionNotFound {
            latitude: 51.5,
            longitude: -0.1
        })
    );
}

#[test]
fn test_region_without_households() {
    let provider = FlatRegion {
        households: 0,
        ..provider()
    };
    let config = SimulationConfig::new(0.5, 1.0, 2, 40.5, -80.233).unwrap();
    let table = run_from_provider(&config, &provider).unwrap();
    for row in table.iter() {
        assert_eq!(row.cost_strategy1, Money(0.0));
        assert_eq!(row.cost_strategy2, Money(0.0));
        assert_eq!(row.cost_strategy3, Money(0.0));
    }
}
