//! Drawing primitives for the watchface.
//!
//! All functions are generic over `DrawTarget<Color = Rgb565>` so the same
//! code paints the simulator window, a test framebuffer or a real panel.
//! Target errors are ignored: a failed blit is simply not retried.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, PrimitiveStyle, Triangle};

use crate::assets::{Bitmaps, MonoBitmap};
use crate::colors::Palette;
use crate::layout::{DrawCommand, Quad};
use crate::overlays::Overlay;
use crate::trig;

/// Paint one command. Shapes use the palette fill, bitmaps the palette ink.
pub fn draw_command<D>(
    display: &mut D,
    command: &DrawCommand,
    palette: Palette,
    bitmaps: &Bitmaps,
) where
    D: DrawTarget<Color = Rgb565>,
{
    match command {
        DrawCommand::FillRect(rect) => {
            rect.into_styled(PrimitiveStyle::with_fill(palette.fill())).draw(display).ok();
        }
        DrawCommand::FillQuad(quad) => fill_quad(display, quad, palette.fill()),
        DrawCommand::Bitmap(overlay) => {
            draw_overlay(display, overlay, bitmaps.get(overlay.image), palette.ink());
        }
    }
}

/// Fill a quadrilateral as two triangles sharing the 0-2 diagonal.
pub fn fill_quad<D>(
    display: &mut D,
    quad: &Quad,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let [a, b, c, d] = quad.points;
    let style = PrimitiveStyle::with_fill(color);
    Triangle::new(a, b, c).into_styled(style).draw(display).ok();
    Triangle::new(a, c, d).into_styled(style).draw(display).ok();
}

/// Composite the set pixels of `bitmap` into the overlay frame.
///
/// Every frame pixel is mapped back into the bitmap (rotation about the
/// bitmap centre), so rotated output has no holes. Clear pixels are left
/// untouched.
pub fn draw_overlay<D>(
    display: &mut D,
    overlay: &Overlay,
    bitmap: &MonoBitmap,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let frame = overlay.frame;
    let frame_center = Point::new(frame.size.width as i32 / 2, frame.size.height as i32 / 2);
    let bitmap_center = Point::new(bitmap.width() as i32 / 2, bitmap.height() as i32 / 2);
    let inverse = -overlay.angle;

    let pixels = frame.points().filter_map(|p| {
        let local = p - frame.top_left - frame_center;
        let src = trig::rotate(local, inverse) + bitmap_center;
        bitmap.pixel(src.x, src.y).then_some(Pixel(p, color))
    });
    display.draw_iter(pixels).ok();
}

// =============================================================================
// Unit Tests
// =============================================================================
