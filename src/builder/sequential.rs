//! Sequential builder
//!
//! Every day each unfinished section is raised by one foot. There is no limit
//! on the crew, so the build takes as many days as the lowest section needs.
//! This is the reference the parallel builder must match when its pool is
//! large enough.

use crate::builder::{BuildResult, DayObserver, DayStats, HistoryBuilder};
use crate::config::Strategy;
use crate::error::Result;
use crate::ledger::{CostModel, Ledger};
use crate::partition::{Backlog, Day, Partition};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Builds all profiles at once, one foot per section per day
#[derive(Debug, Clone)]
pub struct SequentialBuilder {
    wall_height: u32,
    costs: CostModel,
}

impl SequentialBuilder {
    pub fn new(wall_height: u32, costs: CostModel) -> Self {
        Self { wall_height, costs }
    }

    /// Raise every unfinished partition once and record it for `day`
    fn sweep(&self, partitions: &mut [Partition], ledger: &mut Ledger, day: Day) -> DayStats {
        let mut stats = DayStats {
            day,
            sections_raised: 0,
            sections_completed: 0,
        };

        for partition in partitions.iter_mut() {
            if !partition.raise(self.wall_height) {
                continue;
            }

            stats.sections_raised += 1;
            if partition.is_complete(self.wall_height) {
                stats.sections_completed += 1;
            }
            ledger.record(partition.profile, day);
        }

        stats
    }
}

impl HistoryBuilder for SequentialBuilder {
    fn build_observed(&self, backlog: Backlog, observer: &dyn DayObserver) -> Result<BuildResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        let mut partitions = backlog.into_partitions();
        let mut ledger = Ledger::new(self.costs);
        let mut timeline = Vec::new();
        let mut day: Day = 1;

        loop {
            let stats = self.sweep(&mut partitions, &mut ledger, day);
            if stats.is_idle() {
                break;
            }

            debug!(
                day,
                sections = stats.sections_raised,
                completed = stats.sections_completed,
                "Day finished"
            );
            observer.day_finished(&stats);
            timeline.push(stats);
            day += 1;
        }

        let days = day - 1;
        let duration = start.elapsed();
        info!(days, feet = ledger.total_feet(), "Ready, wall was built");

        Ok(BuildResult {
            ledger,
            days,
            timeline,
            strategy: Strategy::Sequential,
            started_at,
            duration,
        })
    }
}
