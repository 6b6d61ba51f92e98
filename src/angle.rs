//! Keeps angles inside a single revolution.
//!
//! Cameras report the rotation of a tag relative to the robot as an angle that is not
//! guaranteed to be inside [-PI, PI). An angle of 350 degrees and an angle of -10 degrees
//! describe the same heading, but they give opposite signs for the rotational correction.
//! Wrapping the angle into a periodic range before it is used removes that ambiguity.

use std::f64::consts::PI;

#[cfg(test)]
#[path = "angle_tests.rs"]
mod angle_tests;

/// Defines a periodic range of angles that is 2 * [PI](core::f64::consts::PI) in size and
/// wraps around at its end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularRange {
    range_start_in_radians: f64,
    range_size: f64,
}

impl AngularRange {
    /// Creates the range [-PI, PI) that is used for robot headings.
    pub fn heading() -> Self {
        Self {
            range_start_in_radians: -PI,
            range_size: 2.0 * PI,
        }
    }

    /// Returns the angle inside the range that describes the same direction as `value`.
    ///
    /// ## Example
    ///
    /// ```
    /// use core::f64::consts::PI;
    /// use swerve_auto_align::angle::AngularRange;
    ///
    /// let range = AngularRange::heading();
    /// assert_eq!(-PI, range.normalize(3.0 * PI));
    /// assert_eq!(0.5 * PI, range.normalize(0.5 * PI));
    /// ```
    pub fn normalize(&self, value: f64) -> f64 {
        if value >= self.range_start_in_radians
            && value < self.range_start_in_radians + self.range_size
        {
            return value;
        }

        let offset = (value - self.range_start_in_radians).rem_euclid(self.range_size);

        // rem_euclid can round up to the range size for tiny negative offsets
        if offset >= self.range_size {
            self.range_start_in_radians
        } else {
            self.range_start_in_radians + offset
        }
    }
}

/// Wraps a heading into [-PI, PI).
pub fn normalize_heading(value: f64) -> f64 {
    AngularRange::heading().normalize(value)
}
