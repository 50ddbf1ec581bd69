//! The command line interface for the simulation.
use crate::config::SimulationConfig;
use crate::input::{find_region_id, read_data_dir};
use crate::log;
use crate::output::{DataWriter, create_output_directory, get_output_dir, write_metadata};
use crate::provider::load_region_profile;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// The location of the region to simulate
#[derive(Args)]
pub struct Location {
    /// Latitude of the region, in degrees
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,
    /// Longitude of the region, in degrees
    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,
}

/// The parameters of a simulation run
#[derive(Args)]
pub struct SimulationArgs {
    /// The solar set-aside before the first simulated year (between 0 and 1)
    pub initial_ssa: f64,
    /// The solar set-aside to reach in the final year (between 0 and 1)
    pub target_ssa: f64,
    /// The number of years to simulate
    pub horizon: u32,
    /// Where the region is
    #[command(flatten)]
    pub location: Location,
}

impl SimulationArgs {
    /// Convert into a validated [`SimulationConfig`]
    fn to_config(&self) -> Result<SimulationConfig> {
        SimulationConfig::new(
            self.initial_ssa,
            self.target_ssa,
            self.horizon,
            self.location.latitude,
            self.location.longitude,
        )
    }
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write additional information to CSV files
    #[arg(long)]
    pub debug_model: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Simulate the cost of recovering lost revenue for a region.
    Run {
        /// The parameters of the run
        #[command(flatten)]
        args: SimulationArgs,
        /// Directory containing region data (defaults to the `data_dir` setting)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example data directories.
    Example {
        /// The available subcommands for managing examples.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Check that a data directory can be read and holds data for a region.
    Validate {
        /// Where the region is
        #[command(flatten)]
        location: Location,
        /// Directory containing region data (defaults to the `data_dir` setting)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                args,
                data_dir,
                opts,
            } => handle_run_command(&args.to_config()?, data_dir.as_deref(), &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { location, data_dir } => {
                handle_validate_command(&location, data_dir.as_deref(), None)
            }
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and execute the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ ssa-impact --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // No command given: show help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
///
/// # Arguments
///
/// * `config` - The parameters of the run
/// * `data_dir` - Directory containing region data. If None, the `data_dir` setting is used.
/// * `opts` - Output options
/// * `settings` - Program settings. If None, they are loaded from the settings file.
pub fn handle_run_command(
    config: &SimulationConfig,
    data_dir: Option<&Path>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.debug_model {
        settings.debug_model = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    let data_dir = data_dir.unwrap_or(&settings.data_dir);

    // Get path to output folder
    let output_path = if let Some(output_dir) = &opts.output_dir {
        output_dir.clone()
    } else {
        let region_id = find_region_id(data_dir, config.latitude, config.longitude)
            .context("Failed to load region data.")?;
        get_output_dir(&region_id)
    };
    let overwrite = create_output_directory(&output_path, settings.overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // The logger must be running before region data is read
    log::init(Some(settings.log_level.as_str()), Some(output_path.as_path()))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let registry = read_data_dir(data_dir).context("Failed to load region data.")?;
    info!("Loaded region data from {}", data_dir.display());
    let region_data = registry.find(config.latitude, config.longitude)?;

    let region = load_region_profile(&registry, config.latitude, config.longitude)?;
    info!(
        "Simulating region {} ({} households)",
        region_data.region.id,
        region.num_households()
    );
    let table = crate::simulation::run(config, &region)?;

    write_metadata(&output_path, data_dir, config).context("Failed to save metadata.")?;
    let mut writer = DataWriter::create(&output_path, settings.debug_model)?;
    writer.write_results(&table, region.utility_rates())?;
    writer.flush()?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    location: &Location,
    data_dir: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    let data_dir = data_dir.unwrap_or(&settings.data_dir);
    let registry = read_data_dir(data_dir).context("Failed to validate region data.")?;
    info!("Read data for {} regions", registry.iter().count());

    let region = load_region_profile(&registry, location.latitude, location.longitude)?;
    info!(
        "Region data is valid: {} households at ({}, {})",
        region.num_households(),
        location.latitude,
        location.longitude
    );

    Ok(())
}
