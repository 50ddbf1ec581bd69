//! Integration tests for the log files written by the `run` command.
use ssa_impact::cli::{RunOpts, handle_run_command};
use ssa_impact::config::SimulationConfig;
use ssa_impact::settings::Settings;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Copy the example data directory, giving Pittsburgh no households
fn create_data_dir_without_households(data_dir: &Path) {
    for entry in fs::read_dir("demos/pittsburgh").unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, data_dir.join(path.file_name().unwrap())).unwrap();
    }

    fs::write(
        data_dir.join("regions.csv"),
        "id,description,latitude,longitude,households,wholesale_price
pittsburgh,\"Pittsburgh, PA\",40.5,-80.233,0,0.031
washington_dc,\"Washington, DC\",38.867,-77.033,289485,0.034
",
    )
    .unwrap();
}

/// Warnings raised while reading region data end up in the error log
#[test]
fn test_region_data_warnings_are_logged() {
    unsafe { std::env::set_var("SSA_IMPACT_LOG_LEVEL", "warn") };

    let data_dir = tempdir().unwrap();
    create_data_dir_without_households(data_dir.path());

    let output_dir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(output_dir.path().to_path_buf()),
        ..Default::default()
    };
    let config = SimulationConfig::new(0.005, 0.2, 6, 40.5, -80.233).unwrap();
    handle_run_command(
        &config,
        Some(data_dir.path()),
        &opts,
        Some(Settings::default()),
    )
    .unwrap();

    let error_log = fs::read_to_string(output_dir.path().join("ssa_impact_error.log")).unwrap();
    assert!(
        error_log.contains("Region pittsburgh has no households"),
        "unexpected error log contents: {error_log}"
    );

    // With no households, there is nothing to recover
    let results = fs::read_to_string(output_dir.path().join("results.csv")).unwrap();
    assert_eq!(results.lines().count(), 7);
    assert!(results.lines().nth(1).unwrap().starts_with("1,0.0,0.0,0.0"));
}
