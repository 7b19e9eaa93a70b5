//! Layout and configuration constants.
//!
//! Every value here is measured against the reference 144x168 surface. The
//! layout functions in [`crate::layout`] and [`crate::overlays`] only derive
//! the usable width and height from the actual surface size; all other
//! offsets stay fixed.

// =============================================================================
// Display Configuration
// =============================================================================

/// Reference surface width in pixels.
pub const SCREEN_WIDTH: u32 = 144;

/// Reference surface height in pixels.
pub const SCREEN_HEIGHT: u32 = 168;

/// Margin kept free on every side of the face.
pub const PADDING: i32 = 12;

// =============================================================================
// Seconds Marker
// =============================================================================

/// Top edge of the seconds marker (just above the vertical centre).
pub const SECONDS_MARKER_Y: i32 = 84 - 10;

/// Seconds marker width in pixels.
pub const SECONDS_MARKER_WIDTH: u32 = 2;

/// Seconds marker height in pixels.
pub const SECONDS_MARKER_HEIGHT: u32 = 19;

// =============================================================================
// Hour / Minute Bars
// =============================================================================

/// Thickness of every hour and minute bar before rotation.
pub const BAR_HEIGHT: i32 = 27;

/// Hours are split into two bars at this value.
pub const HOURS_SPLIT: u8 = 6;

/// Minutes are split into two bars at this value.
pub const MINUTES_SPLIT: u8 = 30;

/// Extra length added to each hour bar so an empty bar still shows a sliver.
pub const HOUR_BAR_EXTRA: i32 = 2;

/// Extra length added to each minute bar.
pub const MINUTE_BAR_EXTRA: i32 = 1;

/// Diagonal corner inset shared by bars and overlays.
pub const CORNER_INSET: i32 = 32;

/// Rotation applied to the bars and overlays, in degrees.
pub const BAR_ANGLE: i32 = 45;

// =============================================================================
// Overlays
// =============================================================================

/// Left margin of the rotated hour and minute overlays.
pub const OVERLAY_MARGIN_X: i32 = 2;

// =============================================================================
// Configuration Channel / Persistence
// =============================================================================

/// Message and persistence key carrying the background colour.
pub const KEY_BACKGROUND_COLOR: u32 = 0;
