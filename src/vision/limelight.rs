//! Decodes the JSON results that a Limelight camera publishes and turns them into a
//! [PoseSource].
//!
//! The camera reports every fiducial it sees. Only the first fiducial is used. Its pose
//! in robot space is stored in the `t6t_rs` array as `[x, y, z, rx, ry, rz]` with the
//! translation in meters and the rotation in degrees.
//!
//! Retrieving the payload is left to a [ResultsFetcher], normally an HTTP GET of the
//! camera's `/results` endpoint with a timeout.

use std::time::Duration;

use serde::Deserialize;

use crate::{hardware::pose_source::PoseSource, Error};

use super::pose::Pose;

#[cfg(test)]
#[path = "limelight_tests.rs"]
mod limelight_tests;

/// The number of values in a pose array.
const POSE_ARRAY_LENGTH: usize = 6;

/// The top level of a results payload. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct LimelightResults {
    #[serde(rename = "Fiducial", default)]
    fiducials: Vec<FiducialResult>,
}

/// A single fiducial detection.
#[derive(Debug, Deserialize)]
struct FiducialResult {
    #[serde(rename = "fID", default)]
    id: Option<i64>,

    /// The pose of the target in robot space.
    #[serde(rename = "t6t_rs", default)]
    target_pose_robot_space: Vec<f64>,
}

/// Decodes a results payload into the pose of the first visible target.
///
/// ## Parameters
///
/// * 'json' - The payload as returned by the camera
///
/// ## Errors
///
/// * [Error::MalformedPayload] - Returned when the payload is not valid JSON, when the
///   pose array has fewer than six values or when a value is not finite.
///
/// ## Example
///
/// ```
/// use swerve_auto_align::vision::limelight::decode_results;
///
/// let pose = decode_results(r#"{ "Fiducial": [ { "fID": 2, "t6t_rs": [0.1, 0.0, 2.0, 0.0, 90.0, 0.0] } ] }"#)
///     .unwrap()
///     .unwrap();
/// assert_eq!(pose.z(), 2.0);
/// assert!((pose.yaw() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
///
/// assert_eq!(decode_results(r#"{ "Fiducial": [] }"#).unwrap(), None);
/// ```
pub fn decode_results(json: &str) -> Result<Option<Pose>, Error> {
    let results: LimelightResults =
        serde_json::from_str(json).map_err(|e| Error::MalformedPayload {
            reason: e.to_string(),
        })?;

    let fiducial = match results.fiducials.first() {
        Some(f) => f,
        None => return Ok(None),
    };

    let values = &fiducial.target_pose_robot_space;
    if values.len() < POSE_ARRAY_LENGTH {
        return Err(Error::MalformedPayload {
            reason: format!(
                "Expected {} values in the pose of fiducial {:?}, found {}",
                POSE_ARRAY_LENGTH,
                fiducial.id,
                values.len()
            ),
        });
    }

    // rx and rz tilt the tag, ry turns it about the vertical axis
    let pose = Pose::try_new(
        values[0],
        values[1],
        values[2],
        values[5].to_radians(),
        values[3].to_radians(),
        values[4].to_radians(),
    )
    .map_err(|_| Error::MalformedPayload {
        reason: format!("The pose of fiducial {:?} is not finite", fiducial.id),
    })?;

    Ok(Some(pose))
}

/// Defines the transport that retrieves the raw results payload from the camera.
pub trait ResultsFetcher {
    /// Retrieves the latest payload.
    ///
    /// Returns `Ok(None)` when the camera answered without a body.
    ///
    /// ## Parameters
    ///
    /// * 'timeout' - The maximum time the request may take
    ///
    /// ## Errors
    ///
    /// * [Error::FetchFailed] - Returned when the camera could not be reached in time.
    fn fetch_results(&mut self, timeout: Duration) -> Result<Option<String>, Error>;
}

/// A [PoseSource] that reads poses from a Limelight camera.
pub struct LimelightSource<F: ResultsFetcher> {
    fetcher: F,
    timeout: Duration,
}

impl<F: ResultsFetcher> LimelightSource<F> {
    /// Creates a new [LimelightSource]
    ///
    /// ## Parameters
    ///
    /// * 'fetcher' - The transport used to retrieve the payload
    /// * 'timeout' - The maximum time a single fetch may take
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Returns the fetch timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<F: ResultsFetcher> PoseSource for LimelightSource<F> {
    fn fetch(&mut self) -> Result<Option<Pose>, Error> {
        match self.fetcher.fetch_results(self.timeout)? {
            Some(body) => decode_results(&body),
            None => Ok(None),
        }
    }
}
