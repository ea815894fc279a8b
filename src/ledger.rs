//! Construction ledger
//!
//! The ledger counts how many feet were added to each profile on each day.
//! Every query derives volume and cost from those raw counts through a
//! [`CostModel`], and unknown profiles or days read as zero.
//!
//! [`SharedLedger`] is the form written by parallel workers: it holds one
//! lock per profile so that workers on different profiles never contend.
//! Once all workers are joined it is turned back into a plain [`Ledger`].

use crate::error::WorkerError;
use crate::partition::{Day, ProfileId};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::trace;

/// Cubic yards of ice needed to raise one section by one foot
pub const DEFAULT_FOOT_VOLUME: u64 = 195;

/// Price of one cubic yard of ice
pub const DEFAULT_VOLUME_PRICE: u64 = 1900;

/// Feet added per day for one profile
type DayCounts = BTreeMap<Day, u64>;

/// Converts foot increments into volume and cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Volume of material per foot of one section
    pub volume_per_foot: u64,

    /// Price per unit of volume
    pub price_per_volume: u64,
}

impl CostModel {
    pub const fn new(volume_per_foot: u64, price_per_volume: u64) -> Self {
        Self {
            volume_per_foot,
            price_per_volume,
        }
    }

    /// Volume used for `feet` increments, saturating at `u64::MAX`
    pub fn volume(&self, feet: u64) -> u64 {
        feet.saturating_mul(self.volume_per_foot)
    }

    /// Cost of `feet` increments, saturating at `u64::MAX`
    pub fn price(&self, feet: u64) -> u64 {
        self.volume(feet).saturating_mul(self.price_per_volume)
    }

    /// Cost of raising one section from the ground to `height`,
    /// or `None` if it does not fit in a `u64`
    pub fn checked_section_cost(&self, height: u32) -> Option<u64> {
        u64::from(height)
            .checked_mul(self.volume_per_foot)?
            .checked_mul(self.price_per_volume)
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(DEFAULT_FOOT_VOLUME, DEFAULT_VOLUME_PRICE)
    }
}

/// Feet added per profile per day, with cost queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    profiles: BTreeMap<ProfileId, DayCounts>,
    costs: CostModel,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(costs: CostModel) -> Self {
        Self {
            profiles: BTreeMap::new(),
            costs,
        }
    }

    /// Cost model used by the queries
    pub fn costs(&self) -> CostModel {
        self.costs
    }

    /// Record one foot added to `profile` on `day`
    pub fn record(&mut self, profile: ProfileId, day: Day) {
        let count = self
            .profiles
            .entry(profile)
            .or_default()
            .entry(day)
            .or_insert(0);
        *count += 1;
        trace!(profile = %profile, day, count = *count, "Recorded increment");
    }

    /// Feet added to `profile` on `day`
    pub fn increments(&self, profile: ProfileId, day: Day) -> u64 {
        self.profiles
            .get(&profile)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Volume of material added to `profile` on `day`
    pub fn amount(&self, profile: ProfileId, day: Day) -> u64 {
        self.costs.volume(self.increments(profile, day))
    }

    /// Cost of the work on `profile` on `day`
    pub fn cost(&self, profile: ProfileId, day: Day) -> u64 {
        self.costs.price(self.increments(profile, day))
    }

    /// Cost of the work on all profiles on `day`
    pub fn day_cost(&self, day: Day) -> u64 {
        let feet = self
            .profiles
            .values()
            .filter_map(|days| days.get(&day))
            .sum();
        self.costs.price(feet)
    }

    /// Cost of the work on all profiles on days `1..=day`
    pub fn cumulative_cost(&self, day: Day) -> u64 {
        let feet = self
            .profiles
            .values()
            .flat_map(|days| days.range(..=day).map(|(_, count)| *count))
            .sum();
        self.costs.price(feet)
    }

    /// Cost of the whole build
    pub fn total_cost(&self) -> u64 {
        self.costs.price(self.total_feet())
    }

    /// Feet added over the whole build
    pub fn total_feet(&self) -> u64 {
        self.profiles.values().flat_map(|days| days.values()).sum()
    }

    /// Feet added to one profile over the whole build
    pub fn profile_total(&self, profile: ProfileId) -> u64 {
        self.profiles
            .get(&profile)
            .map(|days| days.values().sum::<u64>())
            .unwrap_or(0)
    }

    /// Last day with any recorded work, or 0 for an empty ledger
    pub fn days(&self) -> Day {
        self.profiles
            .values()
            .filter_map(|days| days.keys().next_back())
            .max()
            .copied()
            .unwrap_or(0)
    }

    /// Profiles with at least one recorded foot
    pub fn profiles(&self) -> impl Iterator<Item = ProfileId> + '_ {
        self.profiles.keys().copied()
    }

    /// Day-by-day increments for one profile, in day order
    pub fn series(&self, profile: ProfileId) -> Vec<(Day, u64)> {
        self.profiles
            .get(&profile)
            .map(|days| days.iter().map(|(day, count)| (*day, *count)).collect())
            .unwrap_or_default()
    }
}

/// Ledger written concurrently under one lock per profile
#[derive(Debug)]
pub struct SharedLedger {
    profiles: BTreeMap<ProfileId, Mutex<DayCounts>>,
    costs: CostModel,
}

impl SharedLedger {
    /// Create a ledger with a lock for each of `profiles`
    pub fn new<I>(costs: CostModel, profiles: I) -> Self
    where
        I: IntoIterator<Item = ProfileId>,
    {
        Self {
            profiles: profiles
                .into_iter()
                .map(|id| (id, Mutex::new(DayCounts::new())))
                .collect(),
            costs,
        }
    }

    /// Record one foot added to `profile` on `day`, holding only that profile's lock
    ///
    /// Returns the profile's count for the day after the write.
    pub fn record(&self, profile: ProfileId, day: Day) -> Result<u64, WorkerError> {
        let lock = self
            .profiles
            .get(&profile)
            .ok_or(WorkerError::UnknownProfile { profile })?;

        let mut days = lock.lock();
        let count = days.entry(day).or_insert(0);
        *count += 1;
        trace!(profile = %profile, day, count = *count, "Recorded increment");
        Ok(*count)
    }

    /// Release the locks once every writer is done
    pub fn into_ledger(self) -> Ledger {
        let profiles = self
            .profiles
            .into_iter()
            .map(|(id, lock)| (id, lock.into_inner()))
            .filter(|(_, days)| !days.is_empty())
            .collect();

        Ledger {
            profiles,
            costs: self.costs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn p(id: u32) -> ProfileId {
        ProfileId::new(id)
    }

    #[test]
    fn test_record_and_query() {
        let mut ledger = Ledger::new(CostModel::default());
        ledger.record(p(1), 1);
        ledger.record(p(1), 1);
        ledger.record(p(1), 2);
        ledger.record(p(2), 1);

        assert_eq!(ledger.increments(p(1), 1), 2);
        assert_eq!(ledger.amount(p(1), 1), 390);
        assert_eq!(ledger.cost(p(1), 1), 741_000);
        assert_eq!(ledger.day_cost(1), 3 * 195 * 1900);
        assert_eq!(ledger.cumulative_cost(1), 3 * 195 * 1900);
        assert_eq!(ledger.cumulative_cost(2), 4 * 195 * 1900);
        assert_eq!(ledger.total_cost(), 4 * 195 * 1900);
        assert_eq!(ledger.profile_total(p(1)), 3);
        assert_eq!(ledger.days(), 2);
        assert_eq!(ledger.series(p(1)), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_unknown_keys_are_zero() {
        let mut ledger = Ledger::new(CostModel::default());
        assert_eq!(ledger.amount(p(99), 1), 0);
        assert_eq!(ledger.cost(p(1), 999), 0);
        assert_eq!(ledger.day_cost(5), 0);
        assert_eq!(ledger.total_cost(), 0);
        assert_eq!(ledger.days(), 0);

        ledger.record(p(1), 1);
        assert_eq!(ledger.amount(p(99), 1), 0);
        assert_eq!(ledger.cost(p(1), 999), 0);
        assert!(ledger.series(p(99)).is_empty());
    }

    #[test]
    fn test_queries_are_idempotent() {
        let mut ledger = Ledger::new(CostModel::new(10, 3));
        ledger.record(p(1), 1);
        ledger.record(p(2), 2);

        let first = (ledger.amount(p(1), 1), ledger.day_cost(2), ledger.total_cost());
        let second = (ledger.amount(p(1), 1), ledger.day_cost(2), ledger.total_cost());
        assert_eq!(first, second);
        assert_eq!(first, (10, 30, 60));
    }

    #[test]
    fn test_large_constants_saturate() {
        let costs = CostModel::new(100_000_000_000, 1_000_000_000);
        let mut ledger = Ledger::new(costs);
        ledger.record(p(1), 1);
        ledger.record(p(1), 1);

        assert_eq!(ledger.amount(p(1), 1), 200_000_000_000);
        assert_eq!(ledger.cost(p(1), 1), u64::MAX);
        assert_eq!(ledger.day_cost(1), u64::MAX);
        assert_eq!(ledger.total_cost(), u64::MAX);
        assert_eq!(costs.checked_section_cost(30), None);
        assert_eq!(CostModel::default().checked_section_cost(30), Some(30 * 195 * 1900));
    }

    #[test]
    fn test_shared_ledger_concurrent_writes() {
        let shared = SharedLedger::new(CostModel::default(), [p(1), p(2)]);

        thread::scope(|s| {
            for i in 0..8u32 {
                let shared = &shared;
                s.spawn(move || {
                    let profile = p(1 + i % 2);
                    for _ in 0..100 {
                        shared.record(profile, 1).unwrap();
                    }
                });
            }
        });

        let ledger = shared.into_ledger();
        assert_eq!(ledger.increments(p(1), 1), 400);
        assert_eq!(ledger.increments(p(2), 1), 400);
    }

    #[test]
    fn test_shared_ledger_unknown_profile() {
        let shared = SharedLedger::new(CostModel::default(), [p(1)]);
        let err = shared.record(p(3), 1).unwrap_err();
        assert!(matches!(err, WorkerError::UnknownProfile { .. }));
    }

    #[test]
    fn test_into_ledger_drops_untouched_profiles() {
        let shared = SharedLedger::new(CostModel::default(), [p(1), p(2)]);
        shared.record(p(1), 1).unwrap();

        let mut expected = Ledger::new(CostModel::default());
        expected.record(p(1), 1);
        assert_eq!(shared.into_ledger(), expected);
    }
}
