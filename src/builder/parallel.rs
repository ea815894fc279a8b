//! Parallel builder - a fixed pool of workers raising one section each per day
//!
//! Every day runs the same protocol:
//! 1. Reassignment: each slot whose section is finished takes the next
//!    partition from the backlog, or goes idle for good once it is empty
//! 2. If no slot is active, the wall is finished
//! 3. A barrier is sized for the active workers plus the builder
//! 4. One scoped worker thread per active slot raises its section and
//!    records the foot under the profile's lock
//! 5. The builder waits on the barrier, joins the workers and moves to the
//!    next day
//!
//! The backlog and the slots are only touched by the builder thread between
//! rounds. Workers get a mutable borrow of their own slot's partition, so the
//! height needs no lock; only the ledger is shared.

use crate::builder::worker::{SectionReport, Worker};
use crate::builder::{BuildResult, DayObserver, DayStats, HistoryBuilder};
use crate::config::Strategy;
use crate::error::{Result, WorkerError};
use crate::ledger::{CostModel, SharedLedger};
use crate::partition::{Backlog, Day, Partition};
use chrono::Utc;
use crossbeam_channel::unbounded;
use std::any::Any;
use std::sync::Barrier;
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;
use tracing::{debug, info};

/// Current assignment of every worker slot
///
/// `None` means the slot is idle: the backlog had nothing left for it.
#[derive(Debug, Clone)]
pub struct Schedule {
    slots: Vec<Option<Partition>>,
}

impl Schedule {
    /// Create `size` idle slots
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Partition held by worker `id` (1-based)
    pub fn slot(&self, id: usize) -> Option<&Partition> {
        id.checked_sub(1)
            .and_then(|idx| self.slots.get(idx))
            .and_then(Option::as_ref)
    }

    /// Slots that have a partition to work on
    pub fn active_workers(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Give every free slot the next unfinished partition from `backlog`
    ///
    /// A slot is free when it is idle or its partition reached `wall_height`.
    /// Partitions that are already complete are dropped without being assigned.
    pub fn reassign(&mut self, backlog: &mut Backlog, wall_height: u32) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let was_active = slot.is_some();
            if slot.as_ref().is_some_and(|p| !p.is_complete(wall_height)) {
                continue;
            }

            *slot = next_unfinished(backlog, wall_height);
            match slot {
                Some(partition) => info!(
                    worker = idx + 1,
                    profile = %partition.profile,
                    section = partition.section,
                    "Build worker moves to section"
                ),
                None if was_active => info!(worker = idx + 1, "Build worker is ready"),
                None => {}
            }
        }
    }
}

fn next_unfinished(backlog: &mut Backlog, wall_height: u32) -> Option<Partition> {
    while let Some(partition) = backlog.pop_next() {
        if !partition.is_complete(wall_height) {
            return Some(partition);
        }
        debug!(
            profile = %partition.profile,
            section = partition.section,
            height = partition.height(),
            "Section already at wall height"
        );
    }
    None
}

/// Builds profiles with a bounded pool of worker threads
#[derive(Debug, Clone)]
pub struct ParallelBuilder {
    wall_height: u32,
    workers: usize,
    costs: CostModel,
}

impl ParallelBuilder {
    pub fn new(wall_height: u32, workers: usize, costs: CostModel) -> Self {
        Self {
            wall_height,
            workers,
            costs,
        }
    }

    /// Run one day: spawn a worker per active slot and wait for all of them
    fn run_day(&self, schedule: &mut Schedule, ledger: &SharedLedger, day: Day) -> Result<DayStats> {
        let active = schedule.active_workers();
        let barrier = Barrier::new(active + 1);
        let (report_tx, report_rx) = unbounded::<SectionReport>();

        thread::scope(|s| -> std::result::Result<(), WorkerError> {
            let mut handles = Vec::with_capacity(active);

            for (idx, slot) in schedule.slots.iter_mut().enumerate() {
                let Some(partition) = slot.as_mut() else {
                    continue;
                };
                let worker = Worker::new(idx + 1, day, self.wall_height);
                // SpawnFailed only gets out of here when the day's first spawn
                // fails. After that, the workers already started are parked on
                // a barrier one party short, and the scope's join never returns.
                let handle = worker.spawn(s, partition, ledger, &barrier, report_tx.clone())?;
                handles.push((worker.id(), handle));
            }

            barrier.wait();
            join_workers(handles, day)
        })?;

        drop(report_tx);

        let mut stats = DayStats {
            day,
            sections_raised: 0,
            sections_completed: 0,
        };
        for report in report_rx.try_iter() {
            stats.sections_raised += 1;
            if report.completed {
                stats.sections_completed += 1;
                debug!(
                    day = report.day,
                    worker = report.worker,
                    profile = %report.profile,
                    section = report.section,
                    height = report.height,
                    "Section finished"
                );
            }
        }

        Ok(stats)
    }
}

impl HistoryBuilder for ParallelBuilder {
    fn build_observed(&self, mut backlog: Backlog, observer: &dyn DayObserver) -> Result<BuildResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        let ledger = SharedLedger::new(self.costs, backlog.profile_ids());
        let mut schedule = Schedule::new(self.workers);
        let mut timeline = Vec::new();
        let mut day: Day = 1;

        info!(workers = self.workers, "Starting worker pool");

        loop {
            schedule.reassign(&mut backlog, self.wall_height);
            let active = schedule.active_workers();
            if active == 0 {
                break;
            }

            let stats = self.run_day(&mut schedule, &ledger, day)?;
            debug!(
                day,
                active,
                sections = stats.sections_raised,
                completed = stats.sections_completed,
                "Day finished"
            );
            observer.day_finished(&stats);
            timeline.push(stats);
            day += 1;
        }

        let ledger = ledger.into_ledger();
        let days = day - 1;
        let duration = start.elapsed();
        info!(days, feet = ledger.total_feet(), "Ready, wall was built");

        Ok(BuildResult {
            ledger,
            days,
            timeline,
            strategy: Strategy::Parallel {
                workers: self.workers,
            },
            started_at,
            duration,
        })
    }
}

/// Join every worker of one day, keeping the first failure
///
/// A panic is turned into [`WorkerError::Panicked`] for that worker.
fn join_workers(
    handles: Vec<(usize, ScopedJoinHandle<'_, std::result::Result<(), WorkerError>>)>,
    day: Day,
) -> std::result::Result<(), WorkerError> {
    let mut failure = None;
    for (id, handle) in handles {
        let outcome = match handle.join() {
            Ok(result) => result,
            Err(payload) => Err(WorkerError::Panicked {
                id,
                day,
                message: panic_message(payload.as_ref()),
            }),
        };
        if let Err(e) = outcome {
            failure.get_or_insert(e);
        }
    }

    failure.map_or(Ok(()), Err)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{ProfileId, Profiles};

    fn backlog(rows: Vec<Vec<u32>>) -> Backlog {
        Backlog::from_profiles(&Profiles::from_rows(rows))
    }

    fn build(rows: Vec<Vec<u32>>, workers: usize) -> BuildResult {
        ParallelBuilder::new(30, workers, CostModel::default())
            .build(backlog(rows))
            .unwrap()
    }

    #[test]
    fn test_reassign_fills_slots_in_backlog_order() {
        let mut backlog = backlog(vec![vec![21, 25, 28], vec![17]]);
        let mut schedule = Schedule::new(2);

        schedule.reassign(&mut backlog, 30);
        assert_eq!(schedule.active_workers(), 2);
        assert_eq!(schedule.slot(1).map(|p| p.section), Some(1));
        assert_eq!(schedule.slot(2).map(|p| p.section), Some(2));
        assert!(schedule.slot(0).is_none());
        assert!(schedule.slot(3).is_none());
        assert_eq!(backlog.len(), 2);

        // Nothing finished, nothing moves
        schedule.reassign(&mut backlog, 30);
        assert_eq!(backlog.len(), 2);
    }

    #[test]
    fn test_reassign_skips_finished_sections_and_goes_idle() {
        let mut backlog = backlog(vec![vec![30, 12], vec![31]]);
        let mut schedule = Schedule::new(3);

        schedule.reassign(&mut backlog, 30);
        assert_eq!(schedule.active_workers(), 1);
        assert_eq!(schedule.slot(1).map(|p| p.height()), Some(12));
        assert!(schedule.slot(2).is_none());
        assert!(backlog.is_empty());
    }

    #[test]
    fn test_single_worker_one_foot_per_day() {
        let result = build(vec![vec![21, 25, 28], vec![17]], 1);

        assert_eq!(result.days, 29);
        assert!(result.timeline.iter().all(|d| d.sections_raised == 1));
        assert_eq!(result.ledger.increments(ProfileId::new(1), 9), 1);
        assert_eq!(result.ledger.increments(ProfileId::new(2), 16), 0);
        assert_eq!(result.ledger.increments(ProfileId::new(2), 17), 1);
        assert_eq!(result.ledger.total_feet(), 29);
    }

    #[test]
    fn test_two_workers_share_a_profile() {
        let result = build(vec![vec![21, 25, 28], vec![17], vec![17, 22, 17, 19, 17]], 2);

        assert_eq!(result.ledger.amount(ProfileId::new(1), 1), 390);
        assert_eq!(result.ledger.day_cost(1), 741_000);
        assert_eq!(result.ledger.total_cost(), 32_233_500);
    }

    #[test]
    fn test_active_workers_shrink() {
        let result = build(vec![vec![28, 29, 27]], 3);

        let raised: Vec<usize> = result.timeline.iter().map(|d| d.sections_raised).collect();
        assert_eq!(raised, vec![3, 2, 1]);
        assert_eq!(result.days, 3);
    }

    #[test]
    fn test_finished_wall_spawns_nothing() {
        let result = build(vec![vec![30], vec![30, 30]], 4);
        assert_eq!(result.days, 0);
        assert_eq!(result.ledger.total_cost(), 0);
    }

    #[test]
    fn test_join_maps_panic_to_error() {
        let err = thread::scope(|s| {
            let handles = vec![
                (1, s.spawn(|| Ok(()))),
                (
                    2,
                    s.spawn(|| -> std::result::Result<(), WorkerError> { panic!("section collapsed") }),
                ),
                (3, s.spawn(|| Err(WorkerError::ReportChannelClosed { id: 3 }))),
            ];
            join_workers(handles, 4)
        })
        .unwrap_err();

        match err {
            WorkerError::Panicked { id, day, message } => {
                assert_eq!(id, 2);
                assert_eq!(day, 4);
                assert_eq!(message, "section collapsed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_join_keeps_first_failure() {
        let err = thread::scope(|s| {
            let handles = vec![
                (1, s.spawn(|| Err(WorkerError::ReportChannelClosed { id: 1 }))),
                (2, s.spawn(|| -> std::result::Result<(), WorkerError> { panic!("late") })),
            ];
            join_workers(handles, 1)
        })
        .unwrap_err();
        assert!(matches!(err, WorkerError::ReportChannelClosed { id: 1 }));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "Worker thread panicked");
    }
}
