//! Configuration types for wall-builder
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Build strategy selection

use crate::error::ConfigError;
use crate::ledger::{CostModel, DEFAULT_FOOT_VOLUME, DEFAULT_VOLUME_PRICE};
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Maximum wall height in feet
const MAX_HEIGHT: u32 = 10_000;

/// Default target height of every section
pub const DEFAULT_WALL_HEIGHT: u32 = 30;

/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 4;

/// Wall construction simulator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wall-builder",
    version,
    about = "Simulates day-by-day construction of wall profiles",
    long_about = "Reads wall profiles (one line per profile, whitespace-separated section heights)\n\
                  and raises every section one foot per day of labor until it reaches the wall height.\n\n\
                  By default every section is worked on every day. With --parallel a fixed pool of\n\
                  workers builds one section each per day and moves on when it is done.",
    after_help = "EXAMPLES:\n    \
        wall-builder data/profiles.txt\n    \
        wall-builder data/profiles.txt --parallel -w 2\n    \
        wall-builder data/profiles.txt amount 1 1\n    \
        wall-builder data/profiles.txt cost 1 --profile 1\n    \
        wall-builder data/profiles.txt overall"
)]
pub struct CliArgs {
    /// File with the initial section heights of every profile
    #[arg(value_name = "PROFILES_FILE", env = "WALL_FILE")]
    pub profiles: PathBuf,

    /// Query to answer after the build (prints a summary if omitted)
    #[command(subcommand)]
    pub command: Option<Query>,

    /// Build with a bounded pool of worker threads
    ///
    /// From the environment, any of 1/0, yes/no, true/false, on/off.
    #[arg(long, env = "WALL_MULTI_THREADED", value_parser = BoolishValueParser::new())]
    pub parallel: bool,

    /// Number of workers in the pool (with --parallel)
    #[arg(
        short = 'w',
        long,
        env = "WALL_WORKERS",
        default_value_t = DEFAULT_WORKERS,
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Target height of every section, in feet
    #[arg(long, env = "WALL_HEIGHT", default_value_t = DEFAULT_WALL_HEIGHT, value_name = "FEET")]
    pub height: u32,

    /// Volume of material per foot of one section
    #[arg(long, env = "FOOT_VOLUME", default_value_t = DEFAULT_FOOT_VOLUME, value_name = "VOLUME")]
    pub foot_volume: u64,

    /// Price per unit of volume
    #[arg(long, env = "VOLUME_PRICE", default_value_t = DEFAULT_VOLUME_PRICE, value_name = "PRICE")]
    pub volume_price: u64,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (per-day and per-worker events)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Ledger queries
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Volume of material added to a profile on a given day
    Amount {
        /// Profile number (1-based line in the profiles file)
        #[arg(value_name = "PROFILE")]
        profile: u32,

        /// Day number (1-based)
        #[arg(value_name = "DAY")]
        day: u32,
    },

    /// Cost of a given day, for one profile or for all of them
    Cost {
        /// Day number (1-based)
        #[arg(value_name = "DAY")]
        day: u32,

        /// Restrict to one profile
        #[arg(long, value_name = "PROFILE")]
        profile: Option<u32>,
    },

    /// Cost of the whole build
    Overall,
}

/// How the days of work are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every unfinished section is raised every day
    Sequential,
    /// A fixed pool of workers, one section per worker per day
    Parallel { workers: usize },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel { .. } => "parallel",
        }
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Profiles file
    pub profiles_path: PathBuf,

    /// Target height of every section
    pub wall_height: u32,

    /// Scheduling strategy
    pub strategy: Strategy,

    /// Cost constants for queries
    pub costs: CostModel,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl BuildConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        validate_height(args.height)?;

        let strategy = if args.parallel {
            validate_workers(args.workers)?;
            Strategy::Parallel {
                workers: args.workers,
            }
        } else {
            Strategy::Sequential
        };

        if args.foot_volume == 0 {
            return Err(ConfigError::InvalidCost {
                name: "foot volume",
                value: args.foot_volume,
            });
        }
        if args.volume_price == 0 {
            return Err(ConfigError::InvalidCost {
                name: "volume price",
                value: args.volume_price,
            });
        }

        let costs = CostModel::new(args.foot_volume, args.volume_price);
        if costs.checked_section_cost(MAX_HEIGHT).is_none() {
            return Err(ConfigError::CostOverflow {
                volume: args.foot_volume,
                price: args.volume_price,
                height: MAX_HEIGHT,
            });
        }

        Ok(Self {
            profiles_path: args.profiles.clone(),
            wall_height: args.height,
            strategy,
            costs,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Replace the strategy, validating the worker count
    pub fn with_strategy(mut self, strategy: Strategy) -> Result<Self, ConfigError> {
        if let Strategy::Parallel { workers } = strategy {
            validate_workers(workers)?;
        }
        self.strategy = strategy;
        Ok(self)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            profiles_path: PathBuf::from("data/profiles.txt"),
            wall_height: DEFAULT_WALL_HEIGHT,
            strategy: Strategy::Sequential,
            costs: CostModel::default(),
            show_progress: false,
            verbose: false,
        }
    }
}

fn validate_height(height: u32) -> Result<(), ConfigError> {
    if height == 0 || height > MAX_HEIGHT {
        return Err(ConfigError::InvalidHeight {
            height,
            max: MAX_HEIGHT,
        });
    }
    Ok(())
}

fn validate_workers(count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > MAX_WORKERS {
        return Err(ConfigError::InvalidWorkerCount {
            count,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}
