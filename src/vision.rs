/// Defines the robot relative pose of a vision target
pub mod pose;

/// Provides the cache that hands the latest pose from the polling thread to the control loop
pub mod pose_cache;

/// Provides the background thread that polls a pose source
pub mod polling;

/// Provides the decoding of the camera result payload
pub mod limelight;
