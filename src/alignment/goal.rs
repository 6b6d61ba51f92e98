use std::fmt::Display;

use serde::Deserialize;

/// Defines which side of the tag the robot should line up with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AlignDirection {
    /// Line up with the alignment point on the left of the tag.
    Left,

    /// Line up with the alignment point on the right of the tag.
    Right,
}

impl Display for AlignDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignDirection::Left => write!(f, "left"),
            AlignDirection::Right => write!(f, "right"),
        }
    }
}

/// Stores the planar offset, in the tag frame, of the point the robot should line up with.
///
/// A goal of (0, 0) drives the camera straight onto the tag. `goal_x` moves the alignment
/// point sideways and `goal_z` keeps the robot at a distance in front of the tag.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct AlignGoal {
    /// The sideways offset in meters.
    goal_x: f64,

    /// The forward offset in meters.
    goal_z: f64,
}

impl AlignGoal {
    /// Returns the sideways offset in meters.
    pub fn goal_x(&self) -> f64 {
        self.goal_x
    }

    /// Returns the forward offset in meters.
    pub fn goal_z(&self) -> f64 {
        self.goal_z
    }

    /// Creates a new [AlignGoal] instance
    ///
    /// ## Parameters
    ///
    /// * 'goal_x' - The sideways offset from the tag in meters
    /// * 'goal_z' - The forward offset from the tag in meters
    pub fn new(goal_x: f64, goal_z: f64) -> Self {
        Self { goal_x, goal_z }
    }
}
