//! Code for reading region-related information from CSV files.
use super::*;
use crate::provider::COORDINATE_TOLERANCE;
use crate::region::{Region, RegionID};
use crate::units::MoneyPerEnergy;
use float_cmp::approx_eq;
use log::warn;
use serde::Deserialize;

const REGIONS_FILE_NAME: &str = "regions.csv";

/// A region record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct RegionRaw {
    id: String,
    description: String,
    latitude: f64,
    longitude: f64,
    households: u32,
    #[serde(deserialize_with = "deserialise_non_negative")]
    wholesale_price: f64,
}

/// The scalar data for a region
#[derive(PartialEq, Debug)]
pub struct RegionRecord {
    /// Location and description
    pub region: Region,
    /// Number of households
    pub households: u32,
    /// Wholesale energy price
    pub wholesale_price: MoneyPerEnergy,
}

/// Check that two regions are not registered at the same location
fn check_coordinates_distinct(a: &Region, b: &Region) -> Result<()> {
    ensure!(
        !(approx_eq!(f64, a.latitude, b.latitude, epsilon = COORDINATE_TOLERANCE)
            && approx_eq!(f64, a.longitude, b.longitude, epsilon = COORDINATE_TOLERANCE)),
        "Regions {} and {} have the same coordinates",
        a.id,
        b.id
    );

    Ok(())
}

/// Read region records from an iterator of raw records
fn read_regions_from_iter<I>(iter: I) -> Result<IndexMap<RegionID, RegionRecord>>
where
    I: Iterator<Item = RegionRaw>,
{
    let mut regions: IndexMap<RegionID, RegionRecord> = IndexMap::new();
    for raw in iter {
        ensure!(
            (-90.0..=90.0).contains(&raw.latitude),
            "Invalid latitude for region {}: {}",
            raw.id,
            raw.latitude
        );
        ensure!(
            (-180.0..=180.0).contains(&raw.longitude),
            "Invalid longitude for region {}: {}",
            raw.id,
            raw.longitude
        );
        if raw.households == 0 {
            warn!("Region {} has no households", raw.id);
        }

        let id = RegionID::from(raw.id);
        let record = RegionRecord {
            region: Region {
                id: id.clone(),
                description: raw.description,
                latitude: raw.latitude,
                longitude: raw.longitude,
            },
            households: raw.households,
            wholesale_price: MoneyPerEnergy(raw.wholesale_price),
        };

        for other in regions.values() {
            check_coordinates_distinct(&record.region, &other.region)?;
        }

        ensure!(
            regions.insert(id.clone(), record).is_none(),
            "Duplicate region ID found: {id}"
        );
    }

    Ok(regions)
}

/// Reads regions from a CSV file.
///
/// # Arguments
///
/// * `data_dir` - Folder containing region data files
///
/// # Returns
///
/// A map of region records keyed by region ID, in the order they appear in the file
pub fn read_regions(data_dir: &Path) -> Result<IndexMap<RegionID, RegionRecord>> {
    let file_path = data_dir.join(REGIONS_FILE_NAME);
    let regions_csv = read_csv(&file_path)?;
    read_regions_from_iter(regions_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}
