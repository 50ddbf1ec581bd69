//! Estimates the cost to utility customers of recovering the revenue lost as residential solar
//! adoption rises towards a solar set-aside (SSA) target.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod balance;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod output;
pub mod provider;
pub mod region;
pub mod settings;
pub mod simulation;
pub mod strategy;
pub mod trajectory;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's settings file is stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config directory on this platform: fall back to the working directory
        return PathBuf::from(".");
    };
    config_dir.push("ssa-impact");

    config_dir
}
