//! Placement of the static bitmap overlays.
//!
//! Overlays are positioned once when the scene is created and never move.
//! A rotated overlay occupies a square frame whose side is the bitmap's
//! diagonal; the bitmap is rotated about its centre into the frame centre.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::assets::{Bitmaps, ImageId, MonoBitmap};
use crate::config::{BAR_ANGLE, CORNER_INSET, OVERLAY_MARGIN_X, PADDING};
use crate::layout::{usable_height, usable_width};

/// Number of overlays on the face.
pub const OVERLAY_COUNT: usize = 5;

/// A bitmap placed on the surface at a fixed rotation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Overlay {
    /// Image to composite.
    pub image: ImageId,
    /// Rotation in degrees, clockwise.
    pub angle: i32,
    /// Area the rotated image is centred in and clipped to.
    pub frame: Rectangle,
}

impl Overlay {
    /// Unrotated image centred in `frame`.
    pub const fn fixed(
        image: ImageId,
        frame: Rectangle,
    ) -> Self {
        Self { image, angle: 0, frame }
    }

    /// Rotated image whose square frame has its top-left corner at `origin`.
    pub const fn rotated(
        image: ImageId,
        bitmap: &MonoBitmap,
        angle: i32,
        origin: Point,
    ) -> Self {
        let side = rotated_side(bitmap);
        Self {
            image,
            angle,
            frame: Rectangle::new(origin, Size::new(side, side)),
        }
    }
}

/// Side of the square frame holding a rotated bitmap (its integer diagonal).
pub const fn rotated_side(bitmap: &MonoBitmap) -> u32 {
    let (w, h) = (bitmap.width(), bitmap.height());
    (w * w + h * h).isqrt()
}

/// Positions of every overlay for a surface of `size`, in paint order.
pub fn overlay_layout(
    bitmaps: &Bitmaps,
    size: Size,
) -> [Overlay; OVERLAY_COUNT] {
    let (w, h) = (usable_width(size), usable_height(size));
    let right_x = w - CORNER_INSET - PADDING;
    let bottom_y = h - CORNER_INSET - PADDING;
    let hours = bitmaps.get(ImageId::UnaryHours);
    let minutes = bitmaps.get(ImageId::TernaryMinutes);

    [
        Overlay::fixed(
            ImageId::SecondsTernary,
            Rectangle::new(Point::new(PADDING, 0), Size::new((w + 1) as u32, size.height)),
        ),
        Overlay::rotated(ImageId::UnaryHours, hours, -BAR_ANGLE, Point::new(OVERLAY_MARGIN_X, 0)),
        Overlay::rotated(ImageId::UnaryHours, hours, BAR_ANGLE, Point::new(right_x, 0)),
        Overlay::rotated(
            ImageId::TernaryMinutes,
            minutes,
            BAR_ANGLE,
            Point::new(OVERLAY_MARGIN_X, bottom_y),
        ),
        Overlay::rotated(ImageId::TernaryMinutes, minutes, -BAR_ANGLE, Point::new(right_x, bottom_y)),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
