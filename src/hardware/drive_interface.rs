use std::fmt::Display;

use crate::Error;

#[cfg(test)]
#[path = "drive_interface_tests.rs"]
mod drive_interface_tests;

/// Stores a velocity command for the robot chassis.
///
/// The command is given in the robot frame: `vx` points forward, `vy` points to
/// the left and `omega` is positive for a counter-clockwise rotation when seen from
/// above.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChassisSpeeds {
    /// The forward velocity in meters per second.
    vx: f64,

    /// The sideways velocity in meters per second.
    vy: f64,

    /// The angular velocity in radians per second.
    omega: f64,
}

impl ChassisSpeeds {
    /// Creates a new [ChassisSpeeds] instance
    ///
    /// ## Parameters
    ///
    /// * 'vx' - The forward velocity in meters per second
    /// * 'vy' - The sideways velocity in meters per second, positive to the left
    /// * 'omega' - The angular velocity in radians per second, positive counter-clockwise
    pub fn new(vx: f64, vy: f64, omega: f64) -> Self {
        Self { vx, vy, omega }
    }

    /// Returns the angular velocity in radians per second.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Returns the forward velocity in meters per second.
    pub fn vx(&self) -> f64 {
        self.vx
    }

    /// Returns the sideways velocity in meters per second.
    pub fn vy(&self) -> f64 {
        self.vy
    }
}

impl Display for ChassisSpeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChassisSpeeds [vx: {:.3} m/s, vy: {:.3} m/s, omega: {:.3} rad/s]",
            self.vx, self.vy, self.omega
        )
    }
}

/// Defines the interface for the drive train that moves the robot chassis.
///
/// Implementations translate the chassis level command into module states for the
/// swerve modules. That translation is not part of this crate.
pub trait DriveActuator {
    /// Commands the drive train to move with the given chassis velocity.
    ///
    /// ## Parameters
    ///
    /// * 'speeds' - The velocity command.
    /// * 'field_relative' - When `true` the command is interpreted relative to the field,
    ///   otherwise relative to the robot. Alignment always sends robot relative commands.
    fn drive(&mut self, speeds: ChassisSpeeds, field_relative: bool) -> Result<(), Error>;

    /// Commands the drive train into a stance that resists being pushed, e.g. by
    /// turning the wheels into an X pattern.
    fn brace(&mut self) -> Result<(), Error>;
}
