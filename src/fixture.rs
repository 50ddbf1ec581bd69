//! Fixtures for tests

use crate::config::SimulationConfig;
use crate::provider::{RegionData, RegionRegistry};
use crate::region::{HOURS_PER_YEAR, RateStructure, Region, RegionProfile};
use crate::units::{Money, MoneyPerEnergy};
use indexmap::indexmap;
use rstest::fixture;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Usage of a representative household: 1.2 kWh every hour
pub fn hourly_usage() -> Vec<f64> {
    vec![1.2; HOURS_PER_YEAR]
}

/// Production of a representative installation: 2 kWh between 06:00 and 18:00
pub fn hourly_solar_production() -> Vec<f64> {
    (0..HOURS_PER_YEAR)
        .map(|hour| if (6..18).contains(&(hour % 24)) { 2.0 } else { 0.0 })
        .collect()
}

#[fixture]
pub fn rates() -> RateStructure {
    RateStructure {
        fixed_charge_all: Money(120.0),
        fixed_charge_solar: Money(120.0),
        variable_charge_all: MoneyPerEnergy(0.12),
    }
}

#[fixture]
pub fn region_profile(rates: RateStructure) -> RegionProfile {
    RegionProfile::new(
        100,
        MoneyPerEnergy(0.04),
        rates,
        hourly_usage(),
        hourly_solar_production(),
    )
    .unwrap()
}

#[fixture]
pub fn config() -> SimulationConfig {
    SimulationConfig::new(0.005, 0.2, 6, 40.5, -80.233).unwrap()
}

#[fixture]
pub fn region() -> Region {
    Region {
        id: "pittsburgh".into(),
        description: "Pittsburgh, PA".into(),
        latitude: 40.5,
        longitude: -80.233,
    }
}

#[fixture]
pub fn registry(region: Region, rates: RateStructure) -> RegionRegistry {
    let data = RegionData {
        region,
        households: 100,
        wholesale_price: MoneyPerEnergy(0.04),
        rates,
        hourly_usage: hourly_usage(),
        hourly_solar_production: hourly_solar_production(),
    };

    RegionRegistry::new(indexmap! { data.region.id.clone() => data })
}

/// Create an example regions file in dir_path
pub fn create_regions_file(dir_path: &Path) {
    let mut file = File::create(dir_path.join("regions.csv")).unwrap();
    writeln!(
        file,
        "id,description,latitude,longitude,households,wholesale_price
pittsburgh,\"Pittsburgh, PA\",40.5,-80.233,100,0.04
washington_dc,\"Washington, DC\",38.867,-77.033,250,0.05"
    )
    .unwrap();
}

/// Create an example utility rates file in dir_path
pub fn create_rates_file(dir_path: &Path) {
    let mut file = File::create(dir_path.join("utility_rates.csv")).unwrap();
    writeln!(
        file,
        "region_id,fixed_charge_all,fixed_charge_solar,variable_charge_all
pittsburgh,120.0,120.0,0.12
washington_dc,150.0,180.0,0.13"
    )
    .unwrap();
}

/// Create example hourly usage and solar production files in dir_path
pub fn create_profile_files(dir_path: &Path) {
    let mut usage = File::create(dir_path.join("hourly_usage.csv")).unwrap();
    let mut solar = File::create(dir_path.join("hourly_solar.csv")).unwrap();
    writeln!(usage, "region_id,hour,usage").unwrap();
    writeln!(solar, "region_id,hour,production").unwrap();

    let regions = [("pittsburgh", 1.2, 1.0), ("washington_dc", 2.0, 0.75)];
    for (region_id, region_usage, scale) in regions {
        for (hour, production) in hourly_solar_production().into_iter().enumerate() {
            writeln!(usage, "{region_id},{hour},{region_usage}").unwrap();
            writeln!(solar, "{region_id},{hour},{}", production * scale).unwrap();
        }
    }
}

/// Create a complete example data directory in dir_path
pub fn create_data_dir(dir_path: &Path) {
    create_regions_file(dir_path);
    create_rates_file(dir_path);
    create_profile_files(dir_path);
}
