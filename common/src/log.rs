//! Event log ring buffer.
//!
//! The watchface records lifecycle and configuration events here. The host
//! drains the buffer whenever it likes (the simulator prints each entry);
//! when nobody drains it the oldest entries are dropped.
//!
//! With the `defmt` feature every entry is also forwarded to `defmt` as it is
//! pushed.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = LogBuffer::new();
//! log.push(LogLevel::Info, clock, "Window loaded");
//! log.push_fmt(LogLevel::Debug, clock, format_args!("background {:06X}", code));
//!
//! for entry in log.drain() {
//!     println!("{} {}", entry.level.prefix(), entry.message);
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

use crate::clock::ClockState;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 48;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Message, truncated to `LOG_MSG_LEN` characters.
    pub message: String<LOG_MSG_LEN>,
    /// Watch time when the entry was recorded.
    pub stamp: ClockState,
}

/// Circular buffer of log entries, oldest first.
pub struct LogBuffer {
    entries: Deque<LogEntry, LOG_ENTRIES>,
}

impl LogBuffer {
    /// Create a new empty log buffer.
    pub const fn new() -> Self { Self { entries: Deque::new() } }

    /// Record a plain message.
    pub fn push(
        &mut self,
        level: LogLevel,
        stamp: ClockState,
        message: &str,
    ) {
        self.push_fmt(level, stamp, format_args!("{message}"));
    }

    /// Record a formatted message without allocating.
    pub fn push_fmt(
        &mut self,
        level: LogLevel,
        stamp: ClockState,
        args: fmt::Arguments<'_>,
    ) {
        let mut line = Truncating(String::new());
        // Truncating never reports an error
        line.write_fmt(args).ok();

        #[cfg(feature = "defmt")]
        defmt::info!("[{}] {=str}", level, line.0.as_str());

        if self.entries.is_full() {
            self.entries.pop_front();
        }
        self.entries
            .push_back(LogEntry {
                level,
                message: line.0,
                stamp,
            })
            .ok();
    }

    /// Iterate over entries (oldest first) without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.entries.iter() }

    /// Remove and yield all entries, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = LogEntry> + '_ { core::iter::from_fn(|| self.entries.pop_front()) }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

/// Writer that silently drops whatever does not fit.
struct Truncating(String<LOG_MSG_LEN>);

impl Write for Truncating {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
