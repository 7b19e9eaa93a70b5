//! Frame pacing and the time source.

use chrono::{Local, NaiveTime};
use circlesquared_common::ClockState;

/// Target frame time. The main loop sleeps if a frame completes early.
#[cfg(feature = "with-sdl")]
pub const FRAME_TIME: std::time::Duration = std::time::Duration::from_millis(50);

/// Where the simulator gets wall-clock time from.
#[derive(Debug, Clone, Copy)]
pub enum TimeSource {
    System,
    /// Fixed time, for screenshots and reproducible runs.
    Frozen(NaiveTime),
}

impl TimeSource {
    pub fn new(frozen: Option<NaiveTime>) -> Self { frozen.map_or(Self::System, Self::Frozen) }

    pub fn now(&self) -> ClockState {
        match self {
            Self::System => ClockState::from_time(&Local::now()),
            Self::Frozen(time) => ClockState::from_time(time),
        }
    }
}
