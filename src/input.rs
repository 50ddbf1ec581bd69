//! Common routines for handling input data.
use crate::error::SimulationError;
use crate::provider::{RegionData, RegionRegistry};
use crate::region::RegionID;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

mod profile;
use profile::{read_hourly_solar, read_hourly_usage};
mod rates;
use rates::read_rates;
mod region;
use region::read_regions;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec: Vec<T> = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;

    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read an f64, checking that it is a finite, non-negative number
pub fn deserialise_non_negative<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(
            "Value must be a finite number greater than or equal to zero",
        ));
    }

    Ok(value)
}

/// Find the ID of the region at the given coordinates, reading only the regions file
pub fn find_region_id(data_dir: &Path, latitude: f64, longitude: f64) -> Result<RegionID> {
    let regions = read_regions(data_dir)?;
    let record = regions
        .values()
        .find(|record| record.region.is_at(latitude, longitude))
        .ok_or(SimulationError::RegionNotFound {
            latitude,
            longitude,
        })?;

    Ok(record.region.id.clone())
}

/// Read all region data from the specified data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the region data files
///
/// # Returns
///
/// A [`RegionRegistry`] which can be used to look up regions by their coordinates.
pub fn read_data_dir(data_dir: &Path) -> Result<RegionRegistry> {
    let regions = read_regions(data_dir)?;
    let region_ids = regions.keys().cloned().collect();
    let mut rates = read_rates(data_dir, &region_ids)?;
    let mut usage = read_hourly_usage(data_dir, &region_ids)?;
    let mut solar = read_hourly_solar(data_dir, &region_ids)?;

    let regions: IndexMap<_, _> = regions
        .into_iter()
        .map(|(id, raw)| -> Result<_> {
            let missing = || format!("Incomplete data for region {id}");
            let data = RegionData {
                households: raw.households,
                wholesale_price: raw.wholesale_price,
                rates: rates.swap_remove(&id).with_context(missing)?,
                hourly_usage: usage.swap_remove(&id).with_context(missing)?,
                hourly_solar_production: solar.swap_remove(&id).with_context(missing)?,
                region: raw.region,
            };
            Ok((id, data))
        })
        .try_collect()?;

    Ok(RegionRegistry::new(regions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{create_data_dir, create_regions_file};
    use crate::region::HOURS_PER_YEAR;
    use crate::units::MoneyPerEnergy;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,1\nworld,2\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // File with only header row
        let file_path = create_csv_file(dir.path(), "id,value");
        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Settings {
            value: u32,
        }

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = 1").unwrap();
        }
        assert_eq!(
            read_toml::<Settings>(&file_path).unwrap(),
            Settings { value: 1 }
        );

        // Missing file
        assert!(read_toml::<Settings>(&dir.path().join("missing.toml")).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct NonNegative {
        #[serde(deserialize_with = "deserialise_non_negative")]
        value: f64,
    }

    fn deserialise_f64(value: f64) -> Result<f64, serde::de::value::Error> {
        let deserialiser: serde::de::value::F64Deserializer<serde::de::value::Error> =
            serde::de::IntoDeserializer::into_deserializer(value);
        deserialise_non_negative(deserialiser)
    }

    #[test]
    fn test_deserialise_non_negative() {
        assert_eq!(deserialise_f64(0.0), Ok(0.0));
        assert_eq!(deserialise_f64(1.5), Ok(1.5));
        assert!(deserialise_f64(-0.1).is_err());
        assert!(deserialise_f64(f64::NAN).is_err());
        assert!(deserialise_f64(f64::INFINITY).is_err());

        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "value\n-1.0");
        assert!(read_csv::<NonNegative>(&file_path).is_err());
        let file_path = create_csv_file(dir.path(), "value\n1.0");
        assert_eq!(read_csv::<NonNegative>(&file_path).unwrap()[0].value, 1.0);
    }

    #[test]
    fn test_read_data_dir() {
        let dir = tempdir().unwrap();
        create_data_dir(dir.path());

        let registry = read_data_dir(dir.path()).unwrap();
        let data = registry.find(40.5, -80.233).unwrap();
        assert_eq!(data.households, 100);
        assert_eq!(data.wholesale_price, MoneyPerEnergy(0.04));
        assert_eq!(data.hourly_usage.len(), HOURS_PER_YEAR);
        assert_eq!(data.hourly_solar_production.len(), HOURS_PER_YEAR);

        let data = registry.find(38.867, -77.033).unwrap();
        assert_eq!(data.region.id, "washington_dc".into());
        assert_eq!(data.hourly_usage[0], 2.0);
    }

    #[test]
    fn test_find_region_id() {
        let dir = tempdir().unwrap();
        create_regions_file(dir.path());

        // Only the regions file is needed
        assert_eq!(
            find_region_id(dir.path(), 38.8674, -77.033).unwrap(),
            "washington_dc".into()
        );

        let err = find_region_id(dir.path(), 51.5, -0.1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimulationError>(),
            Some(&SimulationError::RegionNotFound {
                latitude: 51.5,
                longitude: -0.1
            })
        );
    }
}
