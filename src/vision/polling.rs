//! Provides the background loop that keeps the [PoseCache] filled.
//!
//! Fetching a result from the camera can take longer than a control loop tick. The
//! [PollingLoop] moves the fetch onto its own thread so that the control loop only ever
//! reads the cache.

use std::{
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, trace, warn};

use crate::{config::PollingConfig, hardware::pose_source::PoseSource, Error};

use super::pose_cache::PoseCache;

#[cfg(test)]
#[path = "polling_tests.rs"]
mod polling_tests;

/// The name of the background polling thread.
const POLLING_THREAD_NAME: &str = "pose-polling";

/// Stores the shared state of the polling thread.
struct PollingState {
    /// A flag indicating whether or not the polling thread should stop.
    cancelled: bool,
}

/// Tracks the outcome of the previous poll so that repeated failures are only reported
/// once.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PollHealth {
    consecutive_failures: u64,
}

impl PollHealth {
    /// Returns the number of failed polls since the last successful poll.
    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }
}

/// Fetches a single result from the source and stores it in the cache.
///
/// Errors and non-finite poses are stored as 'no pose'. The error is never propagated
/// because the caller needs to keep polling.
///
/// ## Parameters
///
/// * 'source' - The pose source to fetch from
/// * 'cache' - The cache that receives the result
/// * 'health' - The result of the previous polls, updated in place
pub fn poll_once<S: PoseSource + ?Sized>(source: &mut S, cache: &PoseCache, health: &mut PollHealth) {
    let result = match source.fetch() {
        Ok(Some(pose)) if !pose.is_finite() => Err(Error::NonFinitePose),
        other => other,
    };

    match result {
        Ok(pose) => {
            if health.consecutive_failures > 0 {
                info!(
                    "Pose source recovered after {} failed polls",
                    health.consecutive_failures
                );
            }
            health.consecutive_failures = 0;

            match &pose {
                Some(p) => trace!("Observed {}", p),
                None => trace!("No target in view"),
            }
            cache.update(pose);
        }
        Err(e) => {
            if health.consecutive_failures == 0 {
                warn!("Failed to poll the pose source: {}", e);
            } else {
                debug!(
                    "Failed to poll the pose source ({} in a row): {}",
                    health.consecutive_failures + 1,
                    e
                );
            }
            health.consecutive_failures += 1;
            cache.update(None);
        }
    }
}

/// Polls a [PoseSource] on a background thread and writes every result into a shared
/// [PoseCache].
///
/// The loop waits `interval` between the end of one fetch and the start of the next. A
/// fetch that is in progress when the loop is stopped finishes first; its result is
/// still written to the cache.
///
/// Stopping, or dropping, the loop blocks the caller until that fetch returns. With a
/// [LimelightSource](crate::vision::limelight::LimelightSource) whose fetcher honours its
/// timeout this is at most the fetch timeout. Stop the loop outside the control loop
/// tick if that wait matters.
pub struct PollingLoop {
    /// The thread handle for the background polling thread
    background_runner: Option<JoinHandle<()>>,

    /// Wakes the background thread when the loop is stopped
    stop_sender: Sender<()>,

    /// The state shared with the background thread
    state: Arc<Mutex<PollingState>>,
}

impl PollingLoop {
    /// Marks the shared state as cancelled.
    #[cfg_attr(test, mutants::skip)] // Cannot easily check mutations as this is a threaded lock situation
    fn cancel(&self) {
        let mut guard = self.state.lock().unwrap_or_else(|err| err.into_inner());
        guard.cancelled = true;
    }

    /// Returns a value indicating whether the background thread is still polling.
    pub fn is_running(&self) -> bool {
        match &self.background_runner {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    /// Returns a value indicating whether the loop was asked to stop.
    #[cfg_attr(test, mutants::skip)] // Cannot easily check mutations as this is a threaded lock situation
    fn is_cancelled(state: &Arc<Mutex<PollingState>>) -> bool {
        let guard = state.lock().unwrap_or_else(|err| err.into_inner());
        guard.cancelled
    }

    /// Runs the polling until the loop is stopped.
    fn run<S: PoseSource>(
        mut source: S,
        cache: &PoseCache,
        state: &Arc<Mutex<PollingState>>,
        receiver: &Receiver<()>,
        interval: Duration,
    ) {
        let mut health = PollHealth::default();
        loop {
            if Self::is_cancelled(state) {
                break;
            }

            poll_once(&mut source, cache, &mut health);

            match receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("Pose polling stopped");
    }

    /// Starts polling the source on a new background thread.
    ///
    /// ## Parameters
    ///
    /// * 'source' - The pose source. It is moved onto the background thread.
    /// * 'cache' - The cache that receives every result
    /// * 'config' - The polling interval
    ///
    /// ## Errors
    ///
    /// * [Error::ThreadSpawn] - Returned when the background thread could not be created.
    pub fn start<S: PoseSource + Send + 'static>(
        source: S,
        cache: Arc<PoseCache>,
        config: &PollingConfig,
    ) -> Result<Self, Error> {
        let (stop_sender, receiver) = crossbeam_channel::bounded(1);

        let state = Arc::new(Mutex::new(PollingState { cancelled: false }));
        let state_copy = state.clone();
        let interval = config.interval();

        info!("Starting pose polling every {} ms", interval.as_millis());
        let background_runner = thread::Builder::new()
            .name(POLLING_THREAD_NAME.to_string())
            .spawn(move || {
                Self::run(source, &cache, &state_copy, &receiver, interval);
            })
            .map_err(Error::ThreadSpawn)?;

        Ok(Self {
            background_runner: Some(background_runner),
            stop_sender,
            state,
        })
    }

    /// Stops the background thread and waits for it to exit. Stopping a loop that is
    /// already stopped does nothing.
    ///
    /// The wait includes any fetch that is in progress, so this call can block for as long
    /// as a single [PoseSource::fetch] takes.
    #[cfg_attr(test, mutants::skip)] // Cannot easily check mutations as this is a threaded lock situation
    pub fn stop(&mut self) {
        let handle = match self.background_runner.take() {
            Some(handle) => handle,
            None => return,
        };

        self.cancel();

        // The channel holds a single message so a full channel already means 'stop'
        let _ = self.stop_sender.try_send(());

        if handle.join().is_err() {
            warn!("The pose polling thread panicked");
        }
    }
}

impl Drop for PollingLoop {
    /// Stops the loop. Blocks like [PollingLoop::stop].
    fn drop(&mut self) {
        self.stop();
    }
}
