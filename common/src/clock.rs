//! Wall-clock state updated once per second by the host's tick.

use chrono::Timelike;

/// Current time of day as delivered by the host clock.
///
/// Values are trusted: the host only ever hands over valid times of day, so
/// no validation happens here. Layout code clamps by construction.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Hour of the day, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl ClockState {
    /// Create a clock state from raw components.
    pub const fn new(
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Self {
        Self { hour, minute, second }
    }

    /// Capture the time of day from any `chrono` time value.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }

    /// Hour on a 12-hour dial, 1-12. Midnight and noon both map to 12.
    pub const fn twelve_hour(self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
