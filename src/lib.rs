//! wall-builder - Day-by-Day Wall Construction Simulator
//!
//! Simulates raising wall profiles one foot per section per day of labor and
//! answers questions about the finished build: how much material went into a
//! profile on a given day, what a day cost, what the whole wall cost.
//!
//! # Features
//!
//! - **Two Strategies**: an unbounded crew that works every section every
//!   day, or a fixed pool of worker threads that each take one section at a
//!   time and move on when it is finished.
//!
//! - **Per-Profile Locking**: workers on different profiles record their
//!   work without contending; workers sharing a profile serialize on its lock.
//!
//! - **Day Barrier**: no worker starts day D+1 before every worker of day D
//!   has recorded its foot.
//!
//! # Architecture
//!
//! ```text
//!  profiles file ──► input::read_profiles ──► Profiles
//!                                               │
//!                                               ▼
//!                                 Backlog (profile, section) FIFO
//!                                               │
//!                          ┌────────────────────┴───────────────────┐
//!                          ▼                                        ▼
//!                 SequentialBuilder                          ParallelBuilder
//!                                                 reassign ─► spawn workers ─► barrier
//!                          │                                        │
//!                          └────────────────────┬───────────────────┘
//!                                               ▼
//!                                   Ledger (profile → day → feet)
//!                                               │
//!                                               ▼
//!                         amount / cost / day_cost / total_cost
//! ```
//!
//! # Example
//!
//! ```bash
//! # Build with every section worked every day
//! wall-builder data/profiles.txt
//!
//! # Build with two workers and ask for the cost of day 1
//! wall-builder data/profiles.txt --parallel -w 2 cost 1
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod input;
pub mod ledger;
pub mod partition;
pub mod progress;
pub mod report;

pub use builder::{build_history, BuildResult, DayStats, HistoryBuilder, ParallelBuilder, SequentialBuilder};
pub use config::{BuildConfig, CliArgs, Query, Strategy};
pub use error::{BuilderError, Result};
pub use ledger::{CostModel, Ledger, SharedLedger};
pub use partition::{Backlog, Day, Partition, ProfileId, Profiles};
