/// Defines the side of the tag the robot aligns to and the matching offsets
pub mod goal;

/// Provides the control law that turns a target pose into chassis speeds
pub mod calculator;

/// Provides the elapsed time tracking used for the seek and timeout decisions
pub mod timer;

/// Provides the per-tick alignment state machine
pub mod controller;
