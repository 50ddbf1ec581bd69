//! Error kinds which abort a simulation run.
//!
//! Functions return [`anyhow::Result`] throughout the crate. Failures which callers may want to
//! distinguish are raised as a [`SimulationError`], which can be recovered from an
//! [`anyhow::Error`] with `downcast_ref`.
use thiserror::Error;

/// The ways in which a run can fail before producing any results
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// The user-supplied parameters are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// No region is registered at the given coordinates
    #[error("No region found at coordinates ({latitude}, {longitude})")]
    RegionNotFound {
        /// Latitude requested
        latitude: f64,
        /// Longitude requested
        longitude: f64,
    },
    /// An hourly profile does not cover exactly one representative year
    #[error("Malformed profile: {0}")]
    MalformedProfile(String),
}
