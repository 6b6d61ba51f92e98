//! Provides the tunable configuration for polling and alignment.
//!
//! All values have defaults that match the competition robot. A TOML file only needs
//! to list the values that differ:
//!
//! ```toml
//! [polling]
//! interval_ms = 20
//!
//! [align]
//! max_speed = 1.5
//! left_goal = { goal_x = -0.17, goal_z = 0.45 }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    alignment::goal::{AlignDirection, AlignGoal},
    Error,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

/// Top-level configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RobotConfig {
    /// Settings for the background polling of the camera
    #[serde(default)]
    pub polling: PollingConfig,

    /// Settings for the alignment control law and state machine
    #[serde(default)]
    pub align: AlignConfig,
}

impl RobotConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// ## Errors
    ///
    /// * [Error::Io] - Returned when the file cannot be read.
    /// * [Error::Config] - Returned when the file is not valid TOML or holds values of
    ///   the wrong type.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses the configuration from a TOML string.
    ///
    /// ## Errors
    ///
    /// * [Error::Config] - Returned when the text is not valid TOML or holds values of
    ///   the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: RobotConfig = toml::from_str(contents)?;
        Ok(config)
    }
}

/// Camera polling settings
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PollingConfig {
    /// Time between the end of one poll and the start of the next in milliseconds (default: 20)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum time a single fetch may take in milliseconds (default: 500)
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl PollingConfig {
    /// Returns the maximum time a single fetch may take.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Returns the time between polls.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

/// Alignment tuning. Distances are in meters, angles in radians, speeds in meters or
/// radians per second.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AlignConfig {
    /// Translational error below which an axis is considered aligned (default: 0.03)
    #[serde(default = "default_align_deadzone")]
    pub align_deadzone: f64,

    /// Heading error below which the robot is considered aligned (default: 5 degrees)
    #[serde(default = "default_rotation_deadzone")]
    pub rotation_deadzone: f64,

    /// Distance below which the translational speed ramps down (default: 1.0)
    #[serde(default = "default_fine_align_distance")]
    pub fine_align_distance: f64,

    /// Heading error below which the angular speed ramps down (default: 5 degrees)
    #[serde(default = "default_fine_align_rotation")]
    pub fine_align_rotation: f64,

    /// Translational speed used far away from the goal (default: 1.0)
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Angular speed used for large heading errors (default: 1.0)
    #[serde(default = "default_max_angular_speed")]
    pub max_angular_speed: f64,

    /// Lower bound of the angular speed ramp, as a fraction of the full ramp (default: 0.2)
    #[serde(default = "default_min_angular_speed")]
    pub min_angular_speed: f64,

    /// Offset from the tag for the left alignment point
    #[serde(default = "default_left_goal")]
    pub left_goal: AlignGoal,

    /// Offset from the tag for the right alignment point
    #[serde(default = "default_right_goal")]
    pub right_goal: AlignGoal,

    /// Time without a pose, or time spent aligning after the first pose, after which
    /// alignment gives up, in seconds (default: 5.0)
    #[serde(default = "default_align_timeout_secs")]
    pub align_timeout_secs: f64,

    /// Time without a pose after which the robot starts rotating to search, in seconds (default: 1.0)
    #[serde(default = "default_seek_timeout_secs")]
    pub seek_timeout_secs: f64,

    /// Angular speed used while searching for the tag (default: 5.0)
    #[serde(default = "default_seek_angular_speed")]
    pub seek_angular_speed: f64,

    /// Upper bound on the duration of one alignment, in seconds (default: none)
    #[serde(default)]
    pub command_timeout_secs: Option<f64>,

    /// Poses older than this are treated as missing, in milliseconds (default: none)
    #[serde(default)]
    pub max_pose_age_ms: Option<u64>,
}

impl AlignConfig {
    /// Returns the time without a pose, or the time spent aligning, after which alignment
    /// gives up.
    pub fn align_timeout(&self) -> Duration {
        seconds(self.align_timeout_secs)
    }

    /// Returns the upper bound on the duration of one alignment, if there is one.
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(seconds)
    }

    /// Returns the offset that belongs to the given side of the tag.
    pub fn goal(&self, direction: AlignDirection) -> AlignGoal {
        match direction {
            AlignDirection::Left => self.left_goal,
            AlignDirection::Right => self.right_goal,
        }
    }

    /// Returns the maximum age of a pose that is still used, if poses can go stale.
    pub fn max_pose_age(&self) -> Option<Duration> {
        self.max_pose_age_ms.map(Duration::from_millis)
    }

    /// Returns the time without a pose after which the robot starts searching.
    pub fn seek_timeout(&self) -> Duration {
        seconds(self.seek_timeout_secs)
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            align_deadzone: default_align_deadzone(),
            rotation_deadzone: default_rotation_deadzone(),
            fine_align_distance: default_fine_align_distance(),
            fine_align_rotation: default_fine_align_rotation(),
            max_speed: default_max_speed(),
            max_angular_speed: default_max_angular_speed(),
            min_angular_speed: default_min_angular_speed(),
            left_goal: default_left_goal(),
            right_goal: default_right_goal(),
            align_timeout_secs: default_align_timeout_secs(),
            seek_timeout_secs: default_seek_timeout_secs(),
            seek_angular_speed: default_seek_angular_speed(),
            command_timeout_secs: None,
            max_pose_age_ms: None,
        }
    }
}

/// Converts a configured number of seconds into a [Duration]. Negative or non-finite values
/// become zero.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

// Default value functions
fn default_interval_ms() -> u64 {
    20
}
fn default_fetch_timeout_ms() -> u64 {
    500
}

// Alignment defaults
fn default_align_deadzone() -> f64 {
    0.03
}
fn default_rotation_deadzone() -> f64 {
    5.0_f64.to_radians()
}
fn default_fine_align_distance() -> f64 {
    1.0
}
fn default_fine_align_rotation() -> f64 {
    5.0_f64.to_radians()
}
fn default_max_speed() -> f64 {
    1.0
}
fn default_max_angular_speed() -> f64 {
    1.0
}
fn default_min_angular_speed() -> f64 {
    0.2
}
fn default_left_goal() -> AlignGoal {
    AlignGoal::new(-0.1625, 0.457)
}
fn default_right_goal() -> AlignGoal {
    AlignGoal::new(0.1625, 0.457)
}
fn default_align_timeout_secs() -> f64 {
    5.0
}
fn default_seek_timeout_secs() -> f64 {
    1.0
}
fn default_seek_angular_speed() -> f64 {
    5.0
}
