//! Wall construction scheduling
//!
//! Two strategies turn a [`Backlog`] of partitions into a [`Ledger`]:
//!
//! ```text
//!   SequentialBuilder                     ParallelBuilder
//!   every unfinished section,             fixed pool of worker slots
//!   every day, one thread                 one section per slot per day
//!                                                  │
//!                                   ┌──────────────┼──────────────┐
//!                                   │              │              │
//!                             ┌─────▼────┐   ┌─────▼────┐   ┌─────▼────┐
//!                             │ Worker 1 │   │ Worker 2 │   │ Worker N │
//!                             │ +1 foot  │   │ +1 foot  │   │ +1 foot  │
//!                             └─────┬────┘   └─────┬────┘   └─────┬────┘
//!                                   │ profile lock │              │
//!                                   ▼              ▼              ▼
//!                             ┌─────────────────────────────────────────┐
//!                             │   SharedLedger (one Mutex per profile)  │
//!                             └─────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//!                             day barrier, then reassignment
//! ```
//!
//! With at least as many workers as partitions both strategies produce the
//! same ledger and the same number of days.

pub mod parallel;
pub mod sequential;
pub mod worker;

pub use parallel::{ParallelBuilder, Schedule};
pub use sequential::SequentialBuilder;
pub use worker::{SectionReport, Worker};

use crate::config::{BuildConfig, Strategy};
use crate::error::{InputError, Result};
use crate::ledger::Ledger;
use crate::partition::{Backlog, Day, Profiles};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

/// What happened on one simulated day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStats {
    /// Day number
    pub day: Day,

    /// Sections raised by one foot
    pub sections_raised: usize,

    /// Sections that reached the wall height
    pub sections_completed: usize,
}

impl DayStats {
    /// No section was raised, so the wall is finished
    pub fn is_idle(&self) -> bool {
        self.sections_raised == 0
    }
}

/// Outcome of a complete build
#[derive(Debug)]
pub struct BuildResult {
    /// Feet added per profile per day
    pub ledger: Ledger,

    /// Number of days on which work happened
    pub days: Day,

    /// Per-day statistics, in day order
    pub timeline: Vec<DayStats>,

    /// Strategy that produced the ledger
    pub strategy: Strategy,

    /// Wall clock time the build started
    pub started_at: DateTime<Utc>,

    /// Time taken for the build
    pub duration: Duration,
}

/// Receives per-day statistics while a build runs
pub trait DayObserver {
    fn day_finished(&self, stats: &DayStats);
}

impl DayObserver for () {
    fn day_finished(&self, _stats: &DayStats) {}
}

/// A scheduling strategy
pub trait HistoryBuilder {
    /// Build every partition of `backlog` to the wall height
    fn build(&self, backlog: Backlog) -> Result<BuildResult> {
        self.build_observed(backlog, &())
    }

    /// Like [`HistoryBuilder::build`], reporting each finished day to `observer`
    fn build_observed(&self, backlog: Backlog, observer: &dyn DayObserver) -> Result<BuildResult>;
}

/// Build `profiles` with the strategy selected in `config`
pub fn build_history(config: &BuildConfig, profiles: &Profiles) -> Result<BuildResult> {
    build_history_observed(config, profiles, &())
}

/// Like [`build_history`], reporting each finished day to `observer`
pub fn build_history_observed(
    config: &BuildConfig,
    profiles: &Profiles,
    observer: &dyn DayObserver,
) -> Result<BuildResult> {
    if profiles.is_empty() {
        return Err(InputError::NoProfiles.into());
    }

    let backlog = Backlog::from_profiles(profiles);

    info!(
        strategy = config.strategy.name(),
        profiles = profiles.len(),
        sections = backlog.len(),
        feet = backlog.remaining_feet(config.wall_height),
        "Building the walls"
    );

    match config.strategy {
        Strategy::Sequential => SequentialBuilder::new(config.wall_height, config.costs)
            .build_observed(backlog, observer),
        Strategy::Parallel { workers } => {
            ParallelBuilder::new(config.wall_height, workers, config.costs)
                .build_observed(backlog, observer)
        }
    }
}
