#![warn(missing_docs)]

//! Vision guided auto-alignment for a swerve (4 wheel steering and 4 wheel drive) robot.
//!
//! Turns the robot relative pose of an AprilTag, as reported by a camera that is polled
//! on a background thread, into bounded chassis velocity commands that line the robot up
//! with a configurable offset from the tag.

use thiserror::Error;

/// Defines the angle helpers used to keep headings in a single revolution
pub mod angle;

/// Provides the alignment control law and the alignment state machine
pub mod alignment;

/// Provides the tunable configuration for polling and alignment
pub mod config;

/// Defines the interfaces for the drive train and the pose sources
pub mod hardware;

/// Provides the pose types, the shared pose cache and the background polling
pub mod vision;

/// Defines the different errors for the auto-align crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Returned when a pose source could not retrieve a result.
    #[error("Failed to fetch a result from the pose source: {reason}")]
    FetchFailed {
        /// A description of why the fetch failed
        reason: String,
    },

    /// Returned when the camera payload could not be decoded into a pose.
    #[error("Malformed camera payload: {reason}")]
    MalformedPayload {
        /// A description of what was wrong with the payload
        reason: String,
    },

    /// Returned when one of the pose components is NaN or infinite.
    #[error("The pose contains a non-finite component")]
    NonFinitePose,

    /// Returned when the drive train refused or failed to apply a command.
    #[error("The drive actuator failed: {reason}")]
    ActuatorFailure {
        /// A description of the actuator failure
        reason: String,
    },

    /// Returned when the background polling thread could not be created.
    #[error("Failed to spawn the polling thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// Returned when the configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Returned when the configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
