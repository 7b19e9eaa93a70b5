//! Per-frame geometry of the watchface.
//!
//! Everything here is a pure function of the [`ClockState`] and the size of
//! the drawing surface. [`face_commands`] is called on every redraw and emits
//! the seconds marker and the four rotated bars; the static overlays are
//! placed once per scene by [`crate::overlays`].
//!
//! # Encoding
//!
//! | Element | Range | Split |
//! |---------|-------|-------|
//! | Seconds marker | 0-59 | sweeps left to right once per minute |
//! | Hour bars | 1-12 | top-left takes 1-6, top-right takes the rest |
//! | Minute bars | 0-59 | bottom-left takes 0-30, bottom-right takes the rest |

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::clock::ClockState;
use crate::config::{
    BAR_ANGLE,
    BAR_HEIGHT,
    CORNER_INSET,
    HOUR_BAR_EXTRA,
    HOURS_SPLIT,
    MINUTE_BAR_EXTRA,
    MINUTES_SPLIT,
    PADDING,
    SECONDS_MARKER_HEIGHT,
    SECONDS_MARKER_WIDTH,
    SECONDS_MARKER_Y,
};
use crate::overlays::Overlay;
use crate::trig;

/// Number of commands emitted per frame: marker + 2 hour bars + 2 minute bars.
pub const FACE_COMMANDS: usize = 5;

// =============================================================================
// Draw Commands
// =============================================================================

/// A filled quadrilateral, corners in drawing order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    /// Axis-aligned bar anchored at the origin.
    pub const fn bar(
        length: i32,
        height: i32,
    ) -> Self {
        Self {
            points: [
                Point::new(0, 0),
                Point::new(length, 0),
                Point::new(length, height),
                Point::new(0, height),
            ],
        }
    }

    /// Rotate every corner about the origin.
    pub const fn rotated(
        self,
        degrees: i32,
    ) -> Self {
        let [a, b, c, d] = self.points;
        Self {
            points: [
                trig::rotate(a, degrees),
                trig::rotate(b, degrees),
                trig::rotate(c, degrees),
                trig::rotate(d, degrees),
            ],
        }
    }

    /// Move every corner by `offset`.
    pub fn translated(
        self,
        offset: Point,
    ) -> Self {
        Self { points: self.points.map(|p| p + offset) }
    }

    /// Smallest rectangle containing all four corners.
    pub fn bounding_box(&self) -> Rectangle { Rectangle::with_corners(self.min(), self.max()) }

    fn min(&self) -> Point { self.points.iter().fold(self.points[0], |acc, p| acc.component_min(*p)) }

    fn max(&self) -> Point { self.points.iter().fold(self.points[0], |acc, p| acc.component_max(*p)) }
}

/// One primitive handed to the drawing surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrawCommand {
    /// Filled axis-aligned rectangle.
    FillRect(Rectangle),
    /// Filled quadrilateral.
    FillQuad(Quad),
    /// Static bitmap composited at a rotation.
    Bitmap(Overlay),
}

// =============================================================================
// Value Splitting
// =============================================================================

/// Lengths of a pair of bars that together encode one value.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Split {
    pub left: u8,
    pub right: u8,
}

impl Split {
    /// Fill the left bar up to `at`, spill the remainder into the right bar.
    pub const fn at(
        value: u8,
        at: u8,
    ) -> Self {
        if value > at {
            Self { left: at, right: value - at }
        } else {
            Self { left: value, right: 0 }
        }
    }

    /// Sum of both halves.
    pub const fn total(self) -> u8 { self.left + self.right }
}

/// Hour bars on the 12-hour dial (midnight and noon count as 12).
pub const fn split_hours(clock: ClockState) -> Split { Split::at(clock.twelve_hour(), HOURS_SPLIT) }

/// Minute bars.
pub const fn split_minutes(clock: ClockState) -> Split { Split::at(clock.minute, MINUTES_SPLIT) }

// =============================================================================
// Surface Metrics
// =============================================================================

/// Usable width `W` (surface width minus padding on both sides).
pub const fn usable_width(size: Size) -> i32 { size.width as i32 - 2 * PADDING }

/// Usable height `H` (surface height minus padding on both sides).
pub const fn usable_height(size: Size) -> i32 { size.height as i32 - 2 * PADDING }

// =============================================================================
// Face Geometry
// =============================================================================

/// Left edge of the seconds marker.
pub const fn second_marker_x(
    second: u8,
    size: Size,
) -> i32 {
    (second as i32 * usable_width(size)) / 60 + PADDING
}

/// The seconds marker rectangle.
pub const fn second_marker(
    second: u8,
    size: Size,
) -> Rectangle {
    Rectangle::new(
        Point::new(second_marker_x(second, size), SECONDS_MARKER_Y),
        Size::new(SECONDS_MARKER_WIDTH, SECONDS_MARKER_HEIGHT),
    )
}

/// Length of an hour bar holding `hours` (0-6).
pub const fn hour_bar_length(
    hours: u8,
    size: Size,
) -> i32 {
    hours as i32 * usable_width(size) / 12 + HOUR_BAR_EXTRA
}

/// Length of a minute bar holding `minutes` (0-30).
pub const fn minute_bar_length(
    minutes: u8,
    size: Size,
) -> i32 {
    minutes as i32 * usable_width(size) / 60 + MINUTE_BAR_EXTRA
}

/// Top-left and top-right hour bars.
pub fn hour_bars(
    clock: ClockState,
    size: Size,
) -> [Quad; 2] {
    let split = split_hours(clock);
    let w = usable_width(size);
    [
        Quad::bar(hour_bar_length(split.left, size), BAR_HEIGHT)
            .rotated(-BAR_ANGLE)
            .translated(Point::new(3, CORNER_INSET + PADDING)),
        Quad::bar(hour_bar_length(split.right, size), BAR_HEIGHT)
            .rotated(BAR_ANGLE)
            .translated(Point::new(w - CORNER_INSET + 8, 1)),
    ]
}

/// Bottom-left and bottom-right minute bars.
pub fn minute_bars(
    clock: ClockState,
    size: Size,
) -> [Quad; 2] {
    let split = split_minutes(clock);
    let (w, h) = (usable_width(size), usable_height(size));
    [
        Quad::bar(minute_bar_length(split.left, size), BAR_HEIGHT)
            .rotated(BAR_ANGLE)
            .translated(Point::new(PADDING + 10, h - CORNER_INSET - 11)),
        Quad::bar(minute_bar_length(split.right, size), BAR_HEIGHT)
            .rotated(-BAR_ANGLE)
            .translated(Point::new(w - CORNER_INSET - PADDING + 1, h)),
    ]
}

/// Everything drawn in the fill colour for one frame, in paint order.
pub fn face_commands(
    clock: ClockState,
    size: Size,
) -> Vec<DrawCommand, FACE_COMMANDS> {
    let [hours_left, hours_right] = hour_bars(clock, size);
    let [mins_left, mins_right] = minute_bars(clock, size);

    Vec::from_array([
        DrawCommand::FillRect(second_marker(clock.second, size)),
        DrawCommand::FillQuad(hours_left),
        DrawCommand::FillQuad(hours_right),
        DrawCommand::FillQuad(mins_left),
        DrawCommand::FillQuad(mins_right),
    ])
}

// =============================================================================
// Unit Tests
// =============================================================================
