/// Defines the interface for the drive train that executes alignment commands
pub mod drive_interface;

/// Defines the interface for the hardware that reports the pose of a target
pub mod pose_source;
