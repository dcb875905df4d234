//! Mirror loop — reads brightness changes from the leader and fans them out.
//!
//! The loop is decoupled from the kernel handle through the
//! [`BrightnessSource`] trait so the state machine can be driven by a
//! scripted source in tests. It has two states: running, and stopped with a
//! [`StopReason`]. Nothing the leader emits can stop it; only the stream
//! ending, a read failure, or an external shutdown request does.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "timestamp")]
use std::time::Instant;

use crate::follower::FollowerGroup;

/// Why the mirror loop stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The leader stream reached end of stream: the virtual device was
    /// closed or removed.
    StreamEnded,
    /// A termination signal was observed while the read was blocked.
    ShutdownRequested,
    /// The leader handle failed with an unrecoverable read error.
    ReadFailed(io::Error),
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::StreamEnded => write!(f, "leader stream ended"),
            StopReason::ShutdownRequested => write!(f, "shutdown requested"),
            StopReason::ReadFailed(e) => write!(f, "leader read failed: {e}"),
        }
    }
}

/// Source of brightness change notifications.
///
/// `Ok` carries the next value; `Err` carries the reason no further value
/// will arrive. Implementations must retry reads interrupted by benign
/// signals and report [`StopReason::ShutdownRequested`] only once
/// `keep_running` has been cleared.
pub trait BrightnessSource {
    fn next_brightness(&mut self, keep_running: &AtomicBool) -> Result<i32, StopReason>;
}

/// Drives brightness values from a leader source into a follower group.
pub struct MirrorLoop<'a, S: BrightnessSource> {
    source: &'a mut S,
    group: &'a mut FollowerGroup,
    #[cfg(feature = "timestamp")]
    started: Instant,
}

impl<'a, S: BrightnessSource> MirrorLoop<'a, S> {
    pub fn new(source: &'a mut S, group: &'a mut FollowerGroup) -> Self {
        MirrorLoop {
            source,
            group,
            #[cfg(feature = "timestamp")]
            started: Instant::now(),
        }
    }

    /// Run until the source stops producing values.
    ///
    /// Every value is propagated verbatim to the whole group; per-follower
    /// write failures are handled inside [`FollowerGroup::write_all`] and
    /// never stop the loop.
    pub fn run(&mut self, keep_running: &AtomicBool) -> StopReason {
        loop {
            if !keep_running.load(Ordering::SeqCst) {
                return StopReason::ShutdownRequested;
            }
            match self.source.next_brightness(keep_running) {
                Ok(brightness) => {
                    #[cfg(feature = "timestamp")]
                    {
                        let t = self.started.elapsed();
                        println!("[{}.{:03}] {brightness}", t.as_secs(), t.subsec_millis());
                    }
                    self.group.write_all(brightness);
                }
                Err(reason) => return reason,
            }
        }
    }
}

/// Scripted brightness source for tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// What a [`ScriptedLeader`] does once its queued values run out.
    pub enum Terminal {
        /// Report end of stream.
        End,
        /// Fail with an error of this kind.
        Fail(io::ErrorKind),
    }

    /// Emits queued values, then the configured terminal outcome. Honors
    /// the shutdown flag before every read, like the real leader handle.
    pub struct ScriptedLeader {
        pub values: VecDeque<i32>,
        pub terminal: Terminal,
    }

    impl ScriptedLeader {
        pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
            ScriptedLeader {
                values: values.into_iter().collect(),
                terminal: Terminal::End,
            }
        }

        pub fn failing_after(values: impl IntoIterator<Item = i32>, kind: io::ErrorKind) -> Self {
            ScriptedLeader {
                values: values.into_iter().collect(),
                terminal: Terminal::Fail(kind),
            }
        }
    }

    impl BrightnessSource for ScriptedLeader {
        fn next_brightness(&mut self, keep_running: &AtomicBool) -> Result<i32, StopReason> {
            if !keep_running.load(Ordering::SeqCst) {
                return Err(StopReason::ShutdownRequested);
            }
            match self.values.pop_front() {
                Some(v) => Ok(v),
                None => match &self.terminal {
                    Terminal::End => Err(StopReason::StreamEnded),
                    Terminal::Fail(kind) => {
                        Err(StopReason::ReadFailed(io::Error::from(*kind)))
                    }
                },
            }
        }
    }
}
