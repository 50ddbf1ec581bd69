//! Integration tests for the `run` command.
use ssa_impact::cli::{RunOpts, handle_run_command};
use ssa_impact::config::SimulationConfig;
use ssa_impact::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example data directory.
fn get_data_dir() -> PathBuf {
    PathBuf::from("demos/pittsburgh")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("SSA_IMPACT_LOG_LEVEL", "off") };

    let config = SimulationConfig::new(0.005, 0.2, 6, 40.5, -80.233).unwrap();

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: true,
    };
    handle_run_command(
        &config,
        Some(get_data_dir().as_path()),
        &opts,
        Some(Settings::default()),
    )
    .unwrap();

    let results = fs::read_to_string(output_dir.join("results.csv")).unwrap();
    let lines: Vec<_> = results.lines().collect();
    assert_eq!(
        lines[0],
        "year,fixed_charge_all,fixed_charge_solar,variable_charge_all"
    );
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("1,"));
    assert!(lines[6].starts_with("6,"));

    for file_name in [
        "metadata.toml",
        "debug_energy_balance.csv",
        "debug_adjusted_rates.csv",
        "ssa_impact_info.log",
        "ssa_impact_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // Second time will fail because the output folder is no longer empty
    let err = handle_run_command(
        &config,
        Some(get_data_dir().as_path()),
        &opts,
        Some(Settings::default()),
    )
    .unwrap_err();
    assert_eq!(
        err.chain().next().unwrap().to_string(),
        format!("Failed to create output directory: {}", output_dir.display())
    );
}
