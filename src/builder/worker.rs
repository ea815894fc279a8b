//! Worker threads for the parallel builder
//!
//! Each worker lives for exactly one day:
//! - Raises its assigned section by one foot (no lock, the section is its own)
//! - Records the foot in the ledger under the profile's lock
//! - Reports the new height to the builder
//! - Arrives at the day's barrier and exits

use crate::error::WorkerError;
use crate::ledger::SharedLedger;
use crate::partition::{Day, Partition, ProfileId};
use crossbeam_channel::Sender;
use std::sync::Barrier;
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::{debug, warn};

/// What a worker did on its day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    /// Worker slot (1-based)
    pub worker: usize,

    /// Day of the work
    pub day: Day,

    /// Profile of the section
    pub profile: ProfileId,

    /// Section index within the profile
    pub section: usize,

    /// Height after the day's work
    pub height: u32,

    /// Whether the section reached the wall height
    pub completed: bool,
}

/// Barrier arrival that also happens if the worker unwinds
///
/// Without it a panicking worker would leave the builder waiting forever.
struct Arrival<'a> {
    barrier: &'a Barrier,
    arrived: bool,
}

impl<'a> Arrival<'a> {
    fn new(barrier: &'a Barrier) -> Self {
        Self {
            barrier,
            arrived: false,
        }
    }

    fn wait(mut self) {
        self.arrived = true;
        self.barrier.wait();
    }
}

impl Drop for Arrival<'_> {
    fn drop(&mut self) {
        if !self.arrived {
            self.barrier.wait();
        }
    }
}

/// Single-use worker for one slot on one day
#[derive(Debug, Clone, Copy)]
pub struct Worker {
    id: usize,
    day: Day,
    wall_height: u32,
}

impl Worker {
    pub fn new(id: usize, day: Day, wall_height: u32) -> Self {
        Self {
            id,
            day,
            wall_height,
        }
    }

    /// Worker slot (1-based)
    pub fn id(&self) -> usize {
        self.id
    }

    /// Start the worker on a scoped thread
    pub fn spawn<'scope, 'env>(
        self,
        scope: &'scope Scope<'scope, 'env>,
        partition: &'scope mut Partition,
        ledger: &'scope SharedLedger,
        barrier: &'scope Barrier,
        reports: Sender<SectionReport>,
    ) -> Result<ScopedJoinHandle<'scope, Result<(), WorkerError>>, WorkerError> {
        thread::Builder::new()
            .name(format!("builder-{}", self.id))
            .spawn_scoped(scope, move || self.run(partition, ledger, barrier, &reports))
            .map_err(|e| WorkerError::SpawnFailed {
                id: self.id,
                reason: e.to_string(),
            })
    }

    /// Do the day's work on the current thread
    pub fn run(
        &self,
        partition: &mut Partition,
        ledger: &SharedLedger,
        barrier: &Barrier,
        reports: &Sender<SectionReport>,
    ) -> Result<(), WorkerError> {
        let arrival = Arrival::new(barrier);
        let result = self.extend(partition, ledger, reports);
        arrival.wait();
        result
    }

    fn extend(
        &self,
        partition: &mut Partition,
        ledger: &SharedLedger,
        reports: &Sender<SectionReport>,
    ) -> Result<(), WorkerError> {
        if !partition.raise(self.wall_height) {
            warn!(
                worker = self.id,
                profile = %partition.profile,
                section = partition.section,
                "Assigned section is already complete"
            );
            return Ok(());
        }

        debug!(
            day = self.day,
            worker = self.id,
            profile = %partition.profile,
            section = partition.section,
            height = partition.height(),
            "Extended section"
        );

        ledger.record(partition.profile, self.day)?;

        reports
            .send(SectionReport {
                worker: self.id,
                day: self.day,
                profile: partition.profile,
                section: partition.section,
                height: partition.height(),
                completed: partition.is_complete(self.wall_height),
            })
            .map_err(|_| WorkerError::ReportChannelClosed { id: self.id })
    }
}
