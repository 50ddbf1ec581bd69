//! Code for reading utility rates from a CSV file.
use super::*;
use crate::region::{RateStructure, RegionID};
use crate::units::{Money, MoneyPerEnergy};
use indexmap::IndexSet;
use serde::Deserialize;

const RATES_FILE_NAME: &str = "utility_rates.csv";

/// A utility rate record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct RateRaw {
    region_id: String,
    #[serde(deserialize_with = "deserialise_non_negative")]
    fixed_charge_all: f64,
    #[serde(deserialize_with = "deserialise_non_negative")]
    fixed_charge_solar: f64,
    #[serde(deserialize_with = "deserialise_non_negative")]
    variable_charge_all: f64,
}

/// Get the ID matching `id` from the set of known region IDs
pub(super) fn get_region_id(region_ids: &IndexSet<RegionID>, id: &str) -> Result<RegionID> {
    region_ids
        .get(id)
        .cloned()
        .with_context(|| format!("Unknown region ID {id} found"))
}

/// Read utility rates from an iterator of raw records
fn read_rates_from_iter<I>(
    iter: I,
    region_ids: &IndexSet<RegionID>,
) -> Result<IndexMap<RegionID, RateStructure>>
where
    I: Iterator<Item = RateRaw>,
{
    let mut rates = IndexMap::new();
    for raw in iter {
        let region_id = get_region_id(region_ids, &raw.region_id)?;
        let structure = RateStructure {
            fixed_charge_all: Money(raw.fixed_charge_all),
            fixed_charge_solar: Money(raw.fixed_charge_solar),
            variable_charge_all: MoneyPerEnergy(raw.variable_charge_all),
        };

        ensure!(
            rates.insert(region_id.clone(), structure).is_none(),
            "More than one set of rates given for region {region_id}"
        );
    }

    for region_id in region_ids {
        ensure!(
            rates.contains_key(region_id),
            "No utility rates given for region {region_id}"
        );
    }

    Ok(rates)
}

/// Read utility rates for every region.
///
/// # Arguments
///
/// * `data_dir` - Folder containing region data files
/// * `region_ids` - All known region IDs
///
/// # Returns
///
/// The rate structure of each region, keyed by region ID
pub fn read_rates(
    data_dir: &Path,
    region_ids: &IndexSet<RegionID>,
) -> Result<IndexMap<RegionID, RateStructure>> {
    let file_path = data_dir.join(RATES_FILE_NAME);
    let rates_csv = read_csv(&file_path)?;
    read_rates_from_iter(rates_csv.into_iter(), region_ids)
        .with_context(|| input_err_msg(&file_path))
}
