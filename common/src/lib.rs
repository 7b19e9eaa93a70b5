//! Circle Squared watchface - platform-independent core.
//!
//! This crate holds everything that does not depend on a particular watch or
//! desktop host:
//!
//! - [`app`]: lifecycle state machine and event handlers ([`Watchface`])
//! - [`clock`]: time-of-day state updated by the per-second tick
//! - [`layout`]: per-frame geometry (seconds marker, hour and minute bars)
//! - [`overlays`]: placement of the static bitmap overlays
//! - [`assets`]: the bundled 1-bit bitmaps
//! - [`render`]: drawing onto any `DrawTarget<Color = Rgb565>`
//! - [`message`]: configuration message codec
//! - [`settings`]: persistence interface for the background colour
//! - [`colors`], [`config`], [`trig`], [`log`]: supporting pieces
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p circlesquared-common
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), the library itself is
//! `no_std`.
//!
//! # Features
//!
//! - `defmt`: derive `defmt::Format` on the core types and forward every
//!   log entry to `defmt`. A `defmt` global logger only exists on target, so
//!   check it with:
//! ```bash
//! cargo check -p circlesquared-common --features defmt
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod app;
pub mod assets;
pub mod clock;
pub mod colors;
pub mod config;
pub mod layout;
pub mod log;
pub mod message;
pub mod overlays;
pub mod render;
pub mod settings;
pub mod trig;

// Re-export commonly used items
pub use app::{Phase, Watchface};
pub use clock::ClockState;
pub use colors::{DisplayKind, Palette};
pub use layout::{DrawCommand, face_commands};
pub use settings::{MemoryStore, SettingsStore};
