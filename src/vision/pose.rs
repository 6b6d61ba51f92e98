//! Defines the robot relative pose of a vision target

use std::fmt::Display;

use nalgebra::Vector3;

use crate::Error;

#[cfg(test)]
#[path = "pose_tests.rs"]
mod pose_tests;

/// Stores the pose of a target relative to the robot, as observed by the camera.
///
/// The translation uses the camera convention: x points to the right, y points down and
/// z points forward, away from the robot. The rotation is stored as three angles:
///
/// * roll - rotation around the forward (z) axis
/// * pitch - rotation around the sideways (x) axis
/// * yaw - rotation around the vertical (y) axis, i.e. the heading of the target
///   relative to the robot.
///
/// The robot drives on a flat field so alignment only uses x, z and yaw. A [Pose] is
/// always complete: all six components are finite numbers when created through
/// [Pose::try_new].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// The translation from the robot to the target in meters.
    translation: Vector3<f64>,

    /// The roll angle in radians.
    roll: f64,

    /// The pitch angle in radians.
    pitch: f64,

    /// The yaw angle in radians.
    yaw: f64,
}

impl Pose {
    /// Returns a value indicating whether all components of the pose are finite.
    pub fn is_finite(&self) -> bool {
        self.translation.iter().all(|v| v.is_finite())
            && self.roll.is_finite()
            && self.pitch.is_finite()
            && self.yaw.is_finite()
    }

    /// Creates a new [Pose] without validating the components.
    ///
    /// ## Parameters
    ///
    /// * 'x' - The sideways distance to the target in meters, positive to the right
    /// * 'y' - The vertical distance to the target in meters, positive down
    /// * 'z' - The forward distance to the target in meters
    /// * 'roll' - The roll angle in radians
    /// * 'pitch' - The pitch angle in radians
    /// * 'yaw' - The yaw angle in radians
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            roll,
            pitch,
            yaw,
        }
    }

    /// Creates a pose that only has the components used for alignment.
    pub fn planar(x: f64, z: f64, yaw: f64) -> Self {
        Self::new(x, 0.0, z, 0.0, 0.0, yaw)
    }

    /// Returns the pitch angle in radians.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Returns the roll angle in radians.
    pub fn roll(&self) -> f64 {
        self.roll
    }

    /// Returns the translation from the robot to the target in meters.
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// Creates a new [Pose] and verifies that all components are finite.
    ///
    /// ## Errors
    ///
    /// * [Error::NonFinitePose] - Returned when any of the components is NaN or infinite.
    pub fn try_new(
        x: f64,
        y: f64,
        z: f64,
        roll: f64,
        pitch: f64,
        yaw: f64,
    ) -> Result<Self, Error> {
        let pose = Self::new(x, y, z, roll, pitch, yaw);
        if pose.is_finite() {
            Ok(pose)
        } else {
            Err(Error::NonFinitePose)
        }
    }

    /// Returns the sideways distance to the target in meters.
    pub fn x(&self) -> f64 {
        self.translation.x
    }

    /// Returns the vertical distance to the target in meters.
    pub fn y(&self) -> f64 {
        self.translation.y
    }

    /// Returns the yaw angle in radians.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Returns the forward distance to the target in meters.
    pub fn z(&self) -> f64 {
        self.translation.z
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pose [x: {:.3}, y: {:.3}, z: {:.3}, roll: {:.3}, pitch: {:.3}, yaw: {:.3}]",
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.roll,
            self.pitch,
            self.yaw
        )
    }
}
