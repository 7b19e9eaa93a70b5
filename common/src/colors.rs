//! Colour constants and display-dependent colour selection.
//!
//! The face is drawn in Rgb565. Colour panels the watchface targets only show
//! 64 colours (two bits per channel), so background codes received from the
//! configuration channel are quantised before use. Monochrome panels fall
//! back to black or white.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Default background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Overlay ink and monochrome fill.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Fill for the seconds marker and the hour/minute bars.
pub const RED: Rgb565 = Rgb565::RED;

// =============================================================================
// Display Kind
// =============================================================================

/// Colour capability of the panel being drawn to.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayKind {
    /// 64-colour panel.
    #[default]
    Color,
    /// Black and white panel.
    Monochrome,
}

/// Colours used to draw the face on a given display kind.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Palette {
    kind: DisplayKind,
}

impl Palette {
    /// Create a palette for the given display kind.
    pub const fn new(kind: DisplayKind) -> Self { Self { kind } }

    /// Display kind this palette was created for.
    pub const fn kind(self) -> DisplayKind { self.kind }

    /// Fill for the dynamic shapes: red, or white when the panel lacks colour.
    pub const fn fill(self) -> Rgb565 {
        match self.kind {
            DisplayKind::Color => RED,
            DisplayKind::Monochrome => WHITE,
        }
    }

    /// Ink for the static bitmap overlays.
    pub const fn ink(self) -> Rgb565 { WHITE }

    /// Background used before any colour has been configured.
    pub const fn default_background(self) -> Rgb565 { BLACK }

    /// Decode a packed `0xRRGGBB` colour code for this display.
    pub fn background(
        self,
        code: i32,
    ) -> Rgb565 {
        let rgb = unpack_rgb(code);
        match self.kind {
            DisplayKind::Color => Rgb565::from(quantize_rgb222(rgb)),
            DisplayKind::Monochrome => {
                if luma(rgb) >= 128 {
                    WHITE
                } else {
                    BLACK
                }
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Split a packed colour code into channels. Bits above 24 are ignored.
pub const fn unpack_rgb(code: i32) -> Rgb888 {
    let code = code as u32;
    Rgb888::new((code >> 16) as u8, (code >> 8) as u8, code as u8)
}

/// Reduce each channel to its top two bits, expanded back to 0/85/170/255.
pub fn quantize_rgb222(rgb: Rgb888) -> Rgb888 {
    const fn level(c: u8) -> u8 { (c >> 6) * 85 }
    Rgb888::new(level(rgb.r()), level(rgb.g()), level(rgb.b()))
}

/// Integer luma approximation (BT.601 weights), 0..=255.
fn luma(rgb: Rgb888) -> u32 { (u32::from(rgb.r()) * 299 + u32::from(rgb.g()) * 587 + u32::from(rgb.b()) * 114) / 1000 }

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_falls_back_to_white() {
        assert_eq!(Palette::new(DisplayKind::Color).fill(), RED);
        assert_eq!(Palette::new(DisplayKind::Monochrome).fill(), WHITE);
    }

    #[test]
    fn test_unpack_rgb_ignores_high_bits() {
        assert_eq!(unpack_rgb(0x12_34_56), Rgb888::new(0x12, 0x34, 0x56));
        assert_eq!(unpack_rgb(0x7F_12_34_56), Rgb888::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_quantize_levels() {
        let q = quantize_rgb222(Rgb888::new(0x3F, 0x40, 0xFF));
        assert_eq!(q, Rgb888::new(0, 85, 255));
        let q = quantize_rgb222(Rgb888::new(0x80, 0xBF, 0xC0));
        assert_eq!(q, Rgb888::new(170, 170, 255));
    }

    #[test]
    fn test_color_background_primaries() {
        let palette = Palette::new(DisplayKind::Color);
        assert_eq!(palette.background(0xFF0000), Rgb565::RED);
        assert_eq!(palette.background(0x00FF00), Rgb565::GREEN);
        assert_eq!(palette.background(0x0000FF), Rgb565::BLUE);
        assert_eq!(palette.background(0x000000), BLACK);
        assert_eq!(palette.background(0xFFFFFF), WHITE);
    }

    #[test]
    fn test_monochrome_background_threshold() {
        let palette = Palette::new(DisplayKind::Monochrome);
        assert_eq!(palette.background(0xFFFF00), WHITE);
        assert_eq!(palette.background(0x0000AA), BLACK);
        assert_eq!(palette.background(0x555555), BLACK);
        assert_eq!(palette.background(0xAAAAAA), WHITE);
    }
}
