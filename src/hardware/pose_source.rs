//! Defines the interface for hardware that reports the pose of a target

use crate::{vision::pose::Pose, Error};

/// Defines the interface for a sensor, normally a camera, that reports the pose of
/// the target relative to the robot.
///
/// The [PollingLoop](crate::vision::polling::PollingLoop) calls [PoseSource::fetch] on a
/// background thread, so implementations may block for as long as their own fetch
/// timeout allows.
pub trait PoseSource {
    /// Retrieves the latest observation.
    ///
    /// Returns `Ok(Some(pose))` when a target is visible, `Ok(None)` when the sensor
    /// answered but does not see a target, and an error when the sensor could not be
    /// reached or its answer could not be understood.
    fn fetch(&mut self) -> Result<Option<Pose>, Error>;
}

impl<S: PoseSource + ?Sized> PoseSource for Box<S> {
    fn fetch(&mut self) -> Result<Option<Pose>, Error> {
        (**self).fetch()
    }
}
