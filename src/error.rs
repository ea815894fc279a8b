//! Error types for wall-builder
//!
//! This module defines the error hierarchy that covers:
//! - Reading and parsing wall profiles
//! - Configuration validation
//! - Worker thread errors during parallel builds
//!
//! Ledger queries never fail: unknown profiles or days read as zero, so there
//! is no query error type.

use std::path::PathBuf;
use thiserror::Error;

use crate::partition::ProfileId;

/// Top-level error type for the wall-builder application
#[derive(Error, Debug)]
pub enum BuilderError {
    /// Profile input errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Errors raised while loading wall profiles, before any scheduling starts
#[derive(Error, Debug)]
pub enum InputError {
    /// Profiles file does not exist
    #[error("Initial walls from '{path}' can not be found")]
    NotFound { path: PathBuf },

    /// Profiles file exists but could not be read
    #[error("Failed to read profiles from '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No profiles at all
    #[error("No wall profiles found in '{path}'")]
    Empty { path: PathBuf },

    /// Profiles supplied directly, but none of them
    #[error("No wall profiles to build")]
    NoProfiles,

    /// A section height is not a non-negative integer
    #[error("Invalid section height '{token}' at line {line}, column {column}")]
    InvalidHeight {
        line: usize,
        column: usize,
        token: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid target height
    #[error("Invalid wall height {height}: must be between 1 and {max}")]
    InvalidHeight { height: u32, max: u32 },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Cost constants must be positive
    #[error("Invalid {name} {value}: must be positive")]
    InvalidCost { name: &'static str, value: u64 },

    /// Cost of one full section does not fit in a u64
    #[error("Foot volume {volume} at price {price} overflows the cost of a {height} ft section")]
    CostOverflow { volume: u64, price: u64, height: u32 },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked on day {day}: {message}")]
    Panicked { id: usize, day: u32, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Report channel closed before the day ended
    #[error("Worker {id} could not report: channel closed")]
    ReportChannelClosed { id: usize },

    /// Ledger write for a profile that has no lock
    #[error("Profile {profile} is not registered in the ledger")]
    UnknownProfile { profile: ProfileId },
}

/// Result type alias for BuilderError
pub type Result<T> = std::result::Result<T, BuilderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let input_err = InputError::Empty {
            path: PathBuf::from("data.txt"),
        };
        let err: BuilderError = input_err.into();
        assert!(matches!(err, BuilderError::Input(_)));

        let worker_err = WorkerError::UnknownProfile {
            profile: ProfileId::new(7),
        };
        let err: BuilderError = worker_err.into();
        assert!(matches!(err, BuilderError::Worker(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = InputError::InvalidHeight {
            line: 2,
            column: 3,
            token: "x".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid section height 'x' at line 2, column 3"
        );

        let err = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        assert_eq!(
            err.to_string(),
            "Invalid worker count 0: must be between 1 and 512"
        );

        let err = ConfigError::CostOverflow {
            volume: 7,
            price: 9,
            height: 30,
        };
        assert_eq!(
            err.to_string(),
            "Foot volume 7 at price 9 overflows the cost of a 30 ft section"
        );
    }
}
