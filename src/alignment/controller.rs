//! Provides the per-tick alignment state machine.
//!
//! The controller is called once per control loop tick. It takes a snapshot from the
//! [PoseCache], decides what the drive train should do and reports the outcome to the
//! caller. It never blocks and never returns an error: a missing or stale pose results
//! in no command for that tick, and an alignment that takes too long ends with
//! [AlignmentOutcome::TimedOut].
//!
//! In [AlignMode::Auto] the align timeout applies twice. It limits the time without a
//! pose, and it limits the time spent in `Aligning` and `Holding` after the first pose of
//! the run was seen, whether or not the robot is close to the goal.
//!
//! ```text
//!            pose                 within deadzones            within deadzones
//! Seeking ---------> Aligning ---------------------> Holding ------------------> Done
//!    |                  ^                               |
//!    |                  +-------------------------------+
//!    |                        outside deadzones
//!    | no pose for the align timeout, or aligning for longer than the align timeout
//!    +------------------------------------------------------------------------> TimedOut
//! ```

use std::{
    fmt::Display,
    sync::Arc,
    time::Instant,
};

use log::{debug, info, warn};

use crate::{
    config::AlignConfig,
    hardware::drive_interface::{ChassisSpeeds, DriveActuator},
    vision::{pose::Pose, pose_cache::PoseCache},
};

use super::{
    calculator::{alignment_error, compute_goal_speeds},
    goal::{AlignDirection, AlignGoal},
    timer::Timer,
};

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;

/// Defines how an alignment run ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlignMode {
    /// The run ends when the robot is aligned or when the timeout expires. The robot
    /// rotates in place to search for the tag when the tag is not visible.
    Auto,

    /// The run continues for as long as the caller keeps ticking, e.g. while the driver
    /// holds a button. There is no searching and no timeout.
    Manual,
}

/// Defines the states of the alignment state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlignmentState {
    /// No pose has been seen since the run started.
    Seeking,

    /// The robot is moving towards the alignment point.
    Aligning,

    /// The robot is at the alignment point and braced.
    Holding,

    /// The robot stayed aligned. Terminal.
    Done,

    /// The run ran out of time. Terminal.
    TimedOut,
}

impl AlignmentState {
    /// Returns a value indicating whether the state ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlignmentState::Done | AlignmentState::TimedOut)
    }
}

impl Display for AlignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlignmentState::Seeking => "Seeking",
            AlignmentState::Aligning => "Aligning",
            AlignmentState::Holding => "Holding",
            AlignmentState::Done => "Done",
            AlignmentState::TimedOut => "TimedOut",
        };
        write!(f, "{}", name)
    }
}

/// Describes what the controller did during a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlignmentOutcome {
    /// The drive train was commanded to move towards the alignment point.
    Drive(ChassisSpeeds),

    /// The drive train was commanded to rotate in place to find the tag.
    Search(ChassisSpeeds),

    /// The drive train was commanded into its braced stance.
    Brace,

    /// No command was sent this tick.
    Idle,

    /// The robot is aligned. No further commands are sent.
    Done,

    /// The alignment gave up. No further commands are sent.
    TimedOut,
}

impl AlignmentOutcome {
    /// Returns a value indicating whether the outcome ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlignmentOutcome::Done | AlignmentOutcome::TimedOut)
    }
}

/// Drives the robot onto one of the alignment points next to a tag.
///
/// One controller belongs to one alignment run at a time. Call [AlignmentController::start]
/// when the run begins and [AlignmentController::tick] on every control loop tick until
/// the outcome is terminal.
pub struct AlignmentController {
    /// The cache that holds the latest observed pose.
    cache: Arc<PoseCache>,

    /// The tuning values.
    config: AlignConfig,

    /// The side of the tag that the robot aligns to.
    direction: AlignDirection,

    /// The offset that belongs to `direction`.
    goal: AlignGoal,

    /// Defines how the run ends.
    mode: AlignMode,

    /// The current state.
    state: AlignmentState,

    /// Measures the time since the last valid pose, or since the start of the run.
    since_last_pose: Timer,

    /// The time at which the current run started.
    started_at: Option<Instant>,

    /// The time at which the current run first saw a pose.
    tracking_since: Option<Instant>,

    /// The cache generation of the sample that moved the controller into `Holding`.
    holding_generation: Option<u64>,
}

impl AlignmentController {
    /// Returns the alignment configuration.
    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Returns the side of the tag that the robot aligns to.
    pub fn direction(&self) -> AlignDirection {
        self.direction
    }

    /// Sends a command to the drive train. Failures are logged and otherwise ignored so
    /// that the control loop keeps running.
    fn send_drive<D: DriveActuator + ?Sized>(&self, drive: &mut D, speeds: ChassisSpeeds) {
        if let Err(e) = drive.drive(speeds, false) {
            warn!("Failed to send {} to the drive train: {}", speeds, e);
        }
    }

    /// Sends the brace command to the drive train. Failures are logged and otherwise ignored.
    fn send_brace<D: DriveActuator + ?Sized>(&self, drive: &mut D) {
        if let Err(e) = drive.brace() {
            warn!("Failed to brace the drive train: {}", e);
        }
    }

    /// Returns the offset that the robot aligns to.
    pub fn goal(&self) -> AlignGoal {
        self.goal
    }

    /// Returns a value indicating whether the current run has ended.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the alignment mode.
    pub fn mode(&self) -> AlignMode {
        self.mode
    }

    /// Creates a new [AlignmentController] instance
    ///
    /// ## Parameters
    ///
    /// * 'cache' - The cache that is filled by the polling loop
    /// * 'config' - The tuning values
    /// * 'direction' - The side of the tag to align to
    /// * 'mode' - Defines how the run ends
    pub fn new(
        cache: Arc<PoseCache>,
        config: AlignConfig,
        direction: AlignDirection,
        mode: AlignMode,
    ) -> Self {
        let goal = config.goal(direction);
        Self {
            cache,
            config,
            direction,
            goal,
            mode,
            state: AlignmentState::Seeking,
            since_last_pose: Timer::new(),
            started_at: None,
            tracking_since: None,
            holding_generation: None,
        }
    }

    /// Handles a tick without a usable pose.
    fn on_missing_pose<D: DriveActuator + ?Sized>(
        &mut self,
        now: Instant,
        drive: &mut D,
    ) -> AlignmentOutcome {
        if self.mode == AlignMode::Manual {
            return AlignmentOutcome::Idle;
        }

        let elapsed = self.since_last_pose.elapsed_at(now);
        if elapsed >= self.config.align_timeout() {
            warn!(
                "No pose for {:.2}s while {}, giving up on {} alignment",
                elapsed.as_secs_f64(),
                self.state,
                self.direction
            );
            self.transition(AlignmentState::TimedOut);
            return AlignmentOutcome::TimedOut;
        }

        if self.state == AlignmentState::Seeking && elapsed > self.config.seek_timeout() {
            let speeds = ChassisSpeeds::new(0.0, 0.0, self.config.seek_angular_speed);
            self.send_drive(drive, speeds);
            return AlignmentOutcome::Search(speeds);
        }

        AlignmentOutcome::Idle
    }

    /// Handles a tick with a valid pose.
    ///
    /// `Holding` only becomes `Done` on a sample with a newer cache generation than the
    /// one that started the hold. Reading the same sample again keeps the robot braced.
    fn on_pose<D: DriveActuator + ?Sized>(
        &mut self,
        pose: &Pose,
        generation: u64,
        drive: &mut D,
    ) -> AlignmentOutcome {
        let error = alignment_error(self.goal.goal_x(), self.goal.goal_z(), pose);

        if error.is_within_deadzone(&self.config) {
            if self.state == AlignmentState::Holding {
                let is_fresh = matches!(self.holding_generation, Some(held) if generation > held);
                if self.mode == AlignMode::Auto && is_fresh {
                    info!("Aligned {} of the tag at {}", self.direction, pose);
                    self.transition(AlignmentState::Done);
                    return AlignmentOutcome::Done;
                }
            } else {
                self.holding_generation = Some(generation);
            }

            self.transition(AlignmentState::Holding);
            self.send_brace(drive);
            return AlignmentOutcome::Brace;
        }

        self.holding_generation = None;
        self.transition(AlignmentState::Aligning);
        let speeds = compute_goal_speeds(self.goal, pose, &self.config);
        self.send_drive(drive, speeds);
        AlignmentOutcome::Drive(speeds)
    }

    /// Reads the pose and its cache generation, treating stale poses as missing.
    fn read_pose(&self, now: Instant) -> Option<(Pose, u64)> {
        let (state, generation) = self.cache.state_with_generation();
        let pose = match self.config.max_pose_age() {
            Some(max_age) => state.pose_within(max_age, now),
            None => state.pose(),
        };

        pose.map(|p| (p, generation))
    }

    /// Starts a new alignment run.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts a new alignment run at the given time. Any previous run is discarded.
    pub fn start_at(&mut self, now: Instant) {
        debug!(
            "Starting {:?} alignment to the {} of the tag (goal x: {:.3}, z: {:.3})",
            self.mode,
            self.direction,
            self.goal.goal_x(),
            self.goal.goal_z()
        );

        self.since_last_pose.reset_at(now);
        self.started_at = Some(now);
        self.tracking_since = None;
        self.holding_generation = None;
        self.state = AlignmentState::Seeking;
    }

    /// Returns the current state.
    pub fn state(&self) -> AlignmentState {
        self.state
    }

    /// Runs a single control tick.
    pub fn tick<D: DriveActuator + ?Sized>(&mut self, drive: &mut D) -> AlignmentOutcome {
        self.tick_at(Instant::now(), drive)
    }

    /// Runs a single control tick at the given time.
    ///
    /// A controller that was never started starts at `now`. Once the run is over every
    /// tick reports the terminal outcome and sends nothing to the drive train.
    ///
    /// ## Parameters
    ///
    /// * 'now' - The time of the tick
    /// * 'drive' - The drive train that receives the commands
    pub fn tick_at<D: DriveActuator + ?Sized>(
        &mut self,
        now: Instant,
        drive: &mut D,
    ) -> AlignmentOutcome {
        let started_at = match self.started_at {
            Some(t) => t,
            None => {
                self.start_at(now);
                now
            }
        };

        match self.state {
            AlignmentState::Done => return AlignmentOutcome::Done,
            AlignmentState::TimedOut => return AlignmentOutcome::TimedOut,
            _ => {}
        }

        if self.mode == AlignMode::Auto {
            if let Some(limit) = self.config.command_timeout() {
                if now.saturating_duration_since(started_at) >= limit {
                    warn!(
                        "{} alignment did not finish within {:.2}s",
                        self.direction,
                        limit.as_secs_f64()
                    );
                    self.transition(AlignmentState::TimedOut);
                    return AlignmentOutcome::TimedOut;
                }
            }

            if let Some(tracking_since) = self.tracking_since {
                let aligning_for = now.saturating_duration_since(tracking_since);
                if aligning_for >= self.config.align_timeout() {
                    warn!(
                        "Still {} after {:.2}s, giving up on {} alignment",
                        self.state,
                        aligning_for.as_secs_f64(),
                        self.direction
                    );
                    self.transition(AlignmentState::TimedOut);
                    return AlignmentOutcome::TimedOut;
                }
            }
        }

        match self.read_pose(now) {
            Some((pose, generation)) => {
                self.since_last_pose.reset_at(now);
                if self.tracking_since.is_none() {
                    self.tracking_since = Some(now);
                }
                self.on_pose(&pose, generation, drive)
            }
            None => self.on_missing_pose(now, drive),
        }
    }

    /// Moves to the next state and logs the change.
    fn transition(&mut self, next: AlignmentState) {
        if self.state != next {
            debug!("Alignment state {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
