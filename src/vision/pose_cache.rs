//! Provides the cache that hands the latest pose from the polling thread to the control loop.
//!
//! The polling thread is the only writer. Any number of readers may take a snapshot. The
//! stored value is guarded by a single mutex that is held only long enough to copy the
//! value in or out, so a reader never observes a partially written pose and never waits
//! on the pose source itself.

use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use super::pose::Pose;

#[cfg(test)]
#[path = "pose_cache_tests.rs"]
mod pose_cache_tests;

/// Describes what is known about the target pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoseState {
    /// No poll has completed yet.
    NotYetObserved,

    /// The most recent poll produced a pose.
    LastKnown {
        /// The observed pose
        pose: Pose,

        /// The time at which the pose was stored
        observed_at: Instant,
    },

    /// The most recent poll did not produce a pose, either because there was no target
    /// or because the pose source failed.
    Unavailable,
}

impl PoseState {
    /// Returns the pose if one is known.
    pub fn pose(&self) -> Option<Pose> {
        match self {
            PoseState::LastKnown { pose, .. } => Some(*pose),
            _ => None,
        }
    }

    /// Returns the pose if one is known and it was stored no longer than `max_age`
    /// before `now`.
    pub fn pose_within(&self, max_age: Duration, now: Instant) -> Option<Pose> {
        match self {
            PoseState::LastKnown { pose, observed_at } => {
                if now.saturating_duration_since(*observed_at) <= max_age {
                    Some(*pose)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// The values that are guarded by the cache mutex.
struct PoseCacheState {
    /// The most recently stored state.
    state: PoseState,

    /// The number of updates that have been stored.
    generation: u64,
}

/// Stores the most recently observed target pose.
///
/// Construct one cache per camera and share it between the polling loop and the control
/// loop with an `Arc`.
pub struct PoseCache {
    inner: Mutex<PoseCacheState>,
}

impl PoseCache {
    /// Returns the number of updates that have been stored since the cache was created.
    ///
    /// The value only ever increases, so a reader can use it to see whether a new
    /// observation arrived between two snapshots.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Acquires the cache lock. A lock poisoned by a panicking writer still holds a
    /// complete value because values are only ever copied in whole.
    #[cfg_attr(test, mutants::skip)] // Cannot easily check mutations as this is a threaded lock situation
    fn lock(&self) -> MutexGuard<'_, PoseCacheState> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Creates a new, empty, [PoseCache].
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PoseCacheState {
                state: PoseState::NotYetObserved,
                generation: 0,
            }),
        }
    }

    /// Returns the current pose, or `None` if there is no pose available.
    pub fn snapshot(&self) -> Option<Pose> {
        self.lock().state.pose()
    }

    /// Returns the current pose if it was stored no longer than `max_age` before `now`.
    ///
    /// ## Parameters
    ///
    /// * 'max_age' - The maximum age of a pose that is still considered valid
    /// * 'now' - The time against which the age of the pose is measured
    pub fn snapshot_within(&self, max_age: Duration, now: Instant) -> Option<Pose> {
        self.state().pose_within(max_age, now)
    }

    /// Returns the full state of the cache together with the generation of the update
    /// that stored it. Both are read under the same lock.
    pub fn state_with_generation(&self) -> (PoseState, u64) {
        let guard = self.lock();
        (guard.state, guard.generation)
    }

    /// Returns the full state of the cache.
    pub fn state(&self) -> PoseState {
        self.lock().state
    }

    /// Overwrites the stored pose. `None` marks the pose as unavailable.
    pub fn update(&self, pose: Option<Pose>) {
        self.update_at(pose, Instant::now());
    }

    /// Overwrites the stored pose, recording `observed_at` as the observation time.
    pub fn update_at(&self, pose: Option<Pose>, observed_at: Instant) {
        let state = match pose {
            Some(pose) => PoseState::LastKnown { pose, observed_at },
            None => PoseState::Unavailable,
        };

        let mut guard = self.lock();
        guard.state = state;
        guard.generation += 1;
    }
}

impl Default for PoseCache {
    fn default() -> Self {
        Self::new()
    }
}
