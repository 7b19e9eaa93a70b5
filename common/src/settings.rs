//! Persistent settings.
//!
//! The watchface persists exactly one value, the background colour code,
//! under [`KEY_BACKGROUND_COLOR`]. Storage itself belongs to the host; this
//! module only defines the interface and an in-RAM implementation.

use heapless::Vec;

use crate::config::KEY_BACKGROUND_COLOR;

/// Integer key-value storage that survives restarts.
pub trait SettingsStore {
    /// Error raised when a value cannot be written.
    type Error: core::fmt::Debug;

    /// Value stored under `key`, if any.
    fn read_i32(
        &self,
        key: u32,
    ) -> Option<i32>;

    /// Store `value` under `key`, replacing any previous value.
    fn write_i32(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), Self::Error>;
}

/// Background colour code saved by a previous run.
///
/// A stored 0 reads as "unset": the watch's persistence API cannot tell a
/// missing key from a zero, and black is the default background anyway.
pub fn saved_background<S: SettingsStore>(store: &S) -> Option<i32> {
    store.read_i32(KEY_BACKGROUND_COLOR).filter(|&code| code != 0)
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Maximum number of keys held by [`MemoryStore`].
pub const MEMORY_STORE_KEYS: usize = 8;

/// Returned when [`MemoryStore`] has no room for a new key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreFull;

/// Fixed-capacity store kept in RAM. Values are lost on power-off.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    entries: Vec<(u32, i32), MEMORY_STORE_KEYS>,
}

impl MemoryStore {
    pub const fn new() -> Self { Self { entries: Vec::new() } }
}

impl SettingsStore for MemoryStore {
    type Error = StoreFull;

    fn read_i32(
        &self,
        key: u32,
    ) -> Option<i32> {
        self.entries.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
    }

    fn write_i32(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<(), StoreFull> {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
            return Ok(());
        }
        self.entries.push((key, value)).map_err(|_| StoreFull)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
