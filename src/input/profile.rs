//! Code for reading hourly usage and solar production profiles from CSV files.
use super::rates::get_region_id;
use super::*;
use crate::error::SimulationError;
use crate::region::{HOURS_PER_YEAR, RegionID};
use anyhow::bail;
use indexmap::IndexSet;
use serde::Deserialize;

const HOURLY_USAGE_FILE_NAME: &str = "hourly_usage.csv";
const HOURLY_SOLAR_FILE_NAME: &str = "hourly_solar.csv";

/// A usage record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct HourlyUsageRaw {
    region_id: String,
    hour: usize,
    #[serde(deserialize_with = "deserialise_non_negative")]
    usage: f64,
}

/// A solar production record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct HourlySolarRaw {
    region_id: String,
    hour: usize,
    #[serde(deserialize_with = "deserialise_non_negative")]
    production: f64,
}

/// Assemble hourly profiles from an iterator of (region ID, hour, value) records.
///
/// Records may be given in any order, but every region must have exactly one value for every hour
/// of the year.
fn read_profiles_from_iter<I>(
    iter: I,
    region_ids: &IndexSet<RegionID>,
    name: &str,
) -> Result<IndexMap<RegionID, Vec<f64>>>
where
    I: Iterator<Item = (String, usize, f64)>,
{
    let mut profiles: IndexMap<RegionID, Vec<Option<f64>>> = IndexMap::new();
    for (region_id, hour, value) in iter {
        let region_id = get_region_id(region_ids, &region_id)?;
        ensure!(
            hour < HOURS_PER_YEAR,
            "Invalid hour {hour} for region {region_id}: must be less than {HOURS_PER_YEAR}"
        );

        let profile = profiles
            .entry(region_id.clone())
            .or_insert_with(|| vec![None; HOURS_PER_YEAR]);
        ensure!(
            profile[hour].replace(value).is_none(),
            "Duplicate entry for region {region_id}, hour {hour}"
        );
    }

    let mut out = IndexMap::new();
    for region_id in region_ids {
        let Some(profile) = profiles.swap_remove(region_id) else {
            bail!(SimulationError::MalformedProfile(format!(
                "No {name} data given for region {region_id}"
            )));
        };

        let missing = profile.iter().filter(|value| value.is_none()).count();
        ensure!(
            missing == 0,
            SimulationError::MalformedProfile(format!(
                "{name} data for region {region_id} is missing {missing} of {HOURS_PER_YEAR} hours"
            ))
        );

        out.insert(region_id.clone(), profile.into_iter().flatten().collect());
    }

    Ok(out)
}

/// Read the hourly usage of a representative household for every region.
///
/// # Arguments
///
/// * `data_dir` - Folder containing region data files
/// * `region_ids` - All known region IDs
pub fn read_hourly_usage(
    data_dir: &Path,
    region_ids: &IndexSet<RegionID>,
) -> Result<IndexMap<RegionID, Vec<f64>>> {
    let file_path = data_dir.join(HOURLY_USAGE_FILE_NAME);
    let usage_csv: Vec<HourlyUsageRaw> = read_csv(&file_path)?;
    let iter = usage_csv
        .into_iter()
        .map(|raw| (raw.region_id, raw.hour, raw.usage));
    read_profiles_from_iter(iter, region_ids, "usage").with_context(|| input_err_msg(&file_path))
}

/// Read the hourly production of a representative solar installation for every region.
///
/// # Arguments
///
/// * `data_dir` - Folder containing region data files
/// * `region_ids` - All known region IDs
pub fn read_hourly_solar(
    data_dir: &Path,
    region_ids: &IndexSet<RegionID>,
) -> Result<IndexMap<RegionID, Vec<f64>>> {
    let file_path = data_dir.join(HOURLY_SOLAR_FILE_NAME);
    let solar_csv: Vec<HourlySolarRaw> = read_csv(&file_path)?;
    let iter = solar_csv
        .into_iter()
        .map(|raw| (raw.region_id, raw.hour, raw.production));
    read_profiles_from_iter(iter, region_ids, "solar production")
        .with_context(|| input_err_msg(&file_path))
}
