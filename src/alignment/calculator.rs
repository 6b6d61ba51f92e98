//! Provides the control law that turns a target pose into chassis speeds.
//!
//! The control law works in four steps:
//!
//! 1. The desired offset from the tag is rotated into the tag frame and removed from the
//!    observed position, leaving the translational error that still has to be closed.
//! 2. The error is turned into a drive direction by scaling the larger axis to 1 and the
//!    smaller axis to a matching fraction, so that a diagonal approach moves both axes
//!    together. Axes that are inside the deadzone are dropped.
//! 3. The speed is eased towards the goal: full speed outside the fine align distance and
//!    the square root of the remaining fraction inside it. The square root keeps the speed
//!    high for most of the approach and only slows down close to the goal.
//! 4. The heading error is corrected in the same way. The angular ramp has a lower bound
//!    so the command does not fade away before the heading enters the deadzone.
//!
//! All functions in this module are pure.

use nalgebra::Vector2;

use crate::{
    angle::normalize_heading, config::AlignConfig, hardware::drive_interface::ChassisSpeeds,
    vision::pose::Pose,
};

use super::goal::AlignGoal;

#[cfg(test)]
#[path = "calculator_tests.rs"]
mod calculator_tests;

/// Stores the error that remains between the robot and the alignment point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentError {
    /// The sideways error in meters, in the robot drive convention.
    x: f64,

    /// The forward error in meters.
    z: f64,

    /// The heading error in radians, inside [-PI, PI).
    yaw: f64,
}

impl AlignmentError {
    /// Returns the straight line distance to the alignment point.
    pub fn distance(&self) -> f64 {
        self.x.hypot(self.z)
    }

    /// Returns a value indicating whether all three errors are inside their deadzones,
    /// i.e. whether the control law would command zero speed.
    pub fn is_within_deadzone(&self, config: &AlignConfig) -> bool {
        self.x.abs() < config.align_deadzone
            && self.z.abs() < config.align_deadzone
            && self.yaw.abs() < config.rotation_deadzone
    }

    /// Returns the sideways error in meters.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the heading error in radians.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Returns the forward error in meters.
    pub fn z(&self) -> f64 {
        self.z
    }
}

/// Computes the error between the observed pose and the alignment point.
///
/// ## Parameters
///
/// * 'goal_x' - The sideways offset of the alignment point from the tag
/// * 'goal_z' - The forward offset of the alignment point from the tag
/// * 'pose' - The observed, robot relative, pose of the tag
pub fn alignment_error(goal_x: f64, goal_z: f64, pose: &Pose) -> AlignmentError {
    let yaw = normalize_heading(pose.yaw());
    let (sin_yaw, cos_yaw) = yaw.sin_cos();

    // The camera x axis points the other way from the robot's sideways axis
    let x = -pose.x() - (sin_yaw * goal_z + cos_yaw * goal_x);
    let z = pose.z() - (cos_yaw * goal_z + sin_yaw * goal_x);

    AlignmentError { x, z, yaw }
}

/// Computes the robot relative chassis speeds that move the robot towards the alignment point.
///
/// The same inputs always produce the same output.
///
/// ## Parameters
///
/// * 'goal_x' - The sideways offset of the alignment point from the tag
/// * 'goal_z' - The forward offset of the alignment point from the tag
/// * 'pose' - The observed, robot relative, pose of the tag
/// * 'config' - The deadzones, thresholds and speed limits
///
/// ## Example
///
/// ```
/// use swerve_auto_align::{
///     alignment::calculator::compute_speeds, config::AlignConfig, vision::pose::Pose,
/// };
///
/// // The tag is 2 meters straight ahead, so drive forward at full speed
/// let speeds = compute_speeds(0.0, 0.0, &Pose::planar(0.0, 2.0, 0.0), &AlignConfig::default());
/// assert_eq!(speeds.vx(), 1.0);
/// assert_eq!(speeds.vy(), 0.0);
/// assert_eq!(speeds.omega(), 0.0);
/// ```
pub fn compute_speeds(goal_x: f64, goal_z: f64, pose: &Pose, config: &AlignConfig) -> ChassisSpeeds {
    let error = alignment_error(goal_x, goal_z, pose);

    let direction = drive_direction(&error, config.align_deadzone);
    let translation_scale = eased_ratio(error.distance(), config.fine_align_distance);
    let speed = translation_scale * config.max_speed;

    let rotation_sign = if error.yaw.abs() < config.rotation_deadzone {
        0.0
    } else {
        error.yaw.signum()
    };
    let angular_scale = eased_angular_ratio(error.yaw.abs(), config);

    ChassisSpeeds::new(
        direction.y * speed,
        -direction.x * speed,
        -rotation_sign * angular_scale * config.max_angular_speed,
    )
}

/// Computes the chassis speeds for the given [AlignGoal].
pub fn compute_goal_speeds(goal: AlignGoal, pose: &Pose, config: &AlignConfig) -> ChassisSpeeds {
    compute_speeds(goal.goal_x(), goal.goal_z(), pose, config)
}

/// Returns a value indicating whether the pose puts the robot on either the left or the
/// right alignment point with an aligned heading. The boundaries of the deadzones count
/// as aligned.
///
/// The check compares the pose against the offsets directly, without rotating them into
/// the tag frame.
pub fn is_aligned(pose: &Pose, config: &AlignConfig) -> bool {
    let deadzone = config.align_deadzone;
    let is_at = |goal: AlignGoal| {
        (pose.x() + goal.goal_x()).abs() <= deadzone
            && (pose.z() - goal.goal_z()).abs() <= deadzone
    };

    (is_at(config.left_goal) || is_at(config.right_goal))
        && normalize_heading(pose.yaw()).abs() <= config.rotation_deadzone
}

/// Returns the unit-scale drive direction as (x, z). The axis with the largest error is
/// +/- 1, the other axis is the ratio of the errors. Axes inside the deadzone are zero.
fn drive_direction(error: &AlignmentError, deadzone: f64) -> Vector2<f64> {
    let abs_x = error.x.abs();
    let abs_z = error.z.abs();

    let mut direction = Vector2::new(1.0, 1.0);
    if abs_x > abs_z {
        direction.y = abs_z / abs_x;
    } else if abs_x < abs_z {
        direction.x = abs_x / abs_z;
    }

    if error.z < 0.0 {
        direction.y = -direction.y;
    }

    if error.x > 0.0 {
        direction.x = -direction.x;
    }

    if abs_x < deadzone {
        direction.x = 0.0;
    }

    if abs_z < deadzone {
        direction.y = 0.0;
    }

    direction
}

/// Returns the eased speed fraction for the given value: 1 at or beyond the threshold,
/// otherwise the square root of the linear ratio.
fn eased_ratio(value: f64, threshold: f64) -> f64 {
    if value >= threshold {
        1.0
    } else {
        (value / threshold).sqrt()
    }
}

/// Returns the eased angular speed fraction for the given absolute heading error.
fn eased_angular_ratio(abs_yaw: f64, config: &AlignConfig) -> f64 {
    let ratio = if abs_yaw > config.fine_align_rotation {
        1.0
    } else {
        config
            .min_angular_speed
            .max(abs_yaw / config.fine_align_rotation)
    };

    ratio.sqrt()
}
