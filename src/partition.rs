//! Wall profiles, partitions and the backlog of unassigned partitions
//!
//! A profile is a list of section heights. Each (profile, section) pair
//! becomes one [`Partition`]. The [`Backlog`] keeps them in
//! profile-then-section order; that order decides which partition a freed
//! worker slot picks up next, so it must stay FIFO.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Simulation day, starting at 1
pub type Day = u32;

/// Identifier of a wall profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(u32);

impl ProfileId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProfileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initial section heights keyed by profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profiles {
    profiles: BTreeMap<ProfileId, Vec<u32>>,
}

impl Profiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows of heights, numbering profiles 1, 2, 3...
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<u32>>,
    {
        rows.into_iter()
            .zip(1u32..)
            .map(|(heights, id)| (ProfileId::new(id), heights))
            .collect()
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Total number of sections over all profiles
    pub fn section_count(&self) -> usize {
        self.profiles.values().map(Vec::len).sum()
    }

    /// Heights of one profile
    pub fn get(&self, profile: ProfileId) -> Option<&[u32]> {
        self.profiles.get(&profile).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileId, &[u32])> {
        self.profiles.iter().map(|(id, heights)| (*id, heights.as_slice()))
    }
}

impl FromIterator<(ProfileId, Vec<u32>)> for Profiles {
    fn from_iter<T: IntoIterator<Item = (ProfileId, Vec<u32>)>>(iter: T) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}

/// One section of one profile and its current height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Owning profile
    pub profile: ProfileId,

    /// Section index within the profile (1-based)
    pub section: usize,

    /// Current height in feet
    height: u32,
}

impl Partition {
    pub fn new(profile: ProfileId, section: usize, height: u32) -> Self {
        Self {
            profile,
            section,
            height,
        }
    }

    /// Current height in feet
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the section has reached the target height
    pub fn is_complete(&self, target: u32) -> bool {
        self.height >= target
    }

    /// Raise the section by one foot unless it is already complete
    ///
    /// Returns `true` when a foot was added.
    pub fn raise(&mut self, target: u32) -> bool {
        if self.is_complete(target) {
            return false;
        }
        self.height += 1;
        true
    }
}

/// FIFO queue of partitions waiting for a worker
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    partitions: VecDeque<Partition>,
}

impl Backlog {
    /// Lay out every (profile, section) pair in profile-then-section order
    pub fn from_profiles(profiles: &Profiles) -> Self {
        let partitions = profiles
            .iter()
            .flat_map(|(profile, heights)| {
                heights
                    .iter()
                    .enumerate()
                    .map(move |(idx, &height)| Partition::new(profile, idx + 1, height))
            })
            .collect();

        Self { partitions }
    }

    /// Remove and return the head of the queue
    pub fn pop_next(&mut self) -> Option<Partition> {
        self.partitions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Distinct profiles, in backlog order
    pub fn profile_ids(&self) -> Vec<ProfileId> {
        let mut ids: Vec<ProfileId> = Vec::new();
        for partition in &self.partitions {
            if !ids.contains(&partition.profile) {
                ids.push(partition.profile);
            }
        }
        ids
    }

    /// Feet still needed to bring every partition to `target`
    pub fn remaining_feet(&self, target: u32) -> u64 {
        self.partitions
            .iter()
            .map(|p| u64::from(target.saturating_sub(p.height)))
            .sum()
    }

    pub fn into_partitions(self) -> Vec<Partition> {
        self.partitions.into()
    }
}
