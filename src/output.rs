//! The module responsible for writing output data to disk.
use crate::region::{RateStructure, RegionID};
use crate::simulation::{ResultTable, YearBalance};
use crate::strategy::RecoveryStrategy;
use crate::units::{Money, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub mod metadata;
pub use metadata::write_metadata;

/// The root folder in which region-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "ssa_results";

/// The output file name for the per-year costs of each strategy
const RESULTS_FILE_NAME: &str = "results.csv";

/// The output file name for per-year energy balances
const ENERGY_BALANCE_FILE_NAME: &str = "debug_energy_balance.csv";

/// The output file name for the utility rates implied by each strategy
const ADJUSTED_RATES_FILE_NAME: &str = "debug_adjusted_rates.csv";

/// Get the default output directory for the specified region
pub fn get_output_dir(region_id: &RegionID) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, &*region_id.0].iter().collect()
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced if `allow_overwrite` is
/// true.
///
/// # Returns
///
/// True if an existing, non-empty directory was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
             --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the adjusted rates CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AdjustedRatesRow {
    year: u32,
    strategy: RecoveryStrategy,
    fixed_charge_all: Money,
    fixed_charge_solar: Money,
    variable_charge_all: MoneyPerEnergy,
}

/// For writing extra debug information about the run
struct DebugDataWriter {
    energy_balance_writer: csv::Writer<File>,
    adjusted_rates_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            energy_balance_writer: new_writer(ENERGY_BALANCE_FILE_NAME)?,
            adjusted_rates_writer: new_writer(ADJUSTED_RATES_FILE_NAME)?,
        })
    }

    /// Write the energy balance for each year
    fn write_energy_balances<'a, I>(&mut self, balances: I) -> Result<()>
    where
        I: Iterator<Item = &'a YearBalance>,
    {
        for balance in balances {
            self.energy_balance_writer.serialize(balance)?;
        }

        Ok(())
    }

    /// Write the rates which would result from each strategy in each year
    fn write_adjusted_rates(&mut self, table: &ResultTable, rates: &RateStructure) -> Result<()> {
        for (row, balance) in table.iter().zip(table.iter_balances()) {
            for strategy in RecoveryStrategy::iter() {
                let adjusted =
                    strategy.adjust_rates(rates, row.cost(strategy), balance.variable_rate_increase);
                self.adjusted_rates_writer.serialize(AdjustedRatesRow {
                    year: row.year,
                    strategy,
                    fixed_charge_all: adjusted.fixed_charge_all,
                    fixed_charge_solar: adjusted.fixed_charge_solar,
                    variable_charge_all: adjusted.variable_charge_all,
                })?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.energy_balance_writer.flush()?;
        self.adjusted_rates_writer.flush()?;

        Ok(())
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    results_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let file_path = output_path.join(RESULTS_FILE_NAME);
        let results_writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("Failed to create {}", file_path.display()))?;

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            results_writer,
            debug_writer,
        })
    }

    /// Write the result table, plus debug info if enabled.
    ///
    /// # Arguments
    ///
    /// * `table` - Results of the run
    /// * `rates` - The region's utility rates before any recovery
    pub fn write_results(&mut self, table: &ResultTable, rates: &RateStructure) -> Result<()> {
        for row in table.iter() {
            self.results_writer.serialize(row)?;
        }

        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_energy_balances(table.iter_balances())?;
            wtr.write_adjusted_rates(table, rates)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.results_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
