//! Fixed-point trigonometry for rotating paths and bitmaps.
//!
//! Angles are whole degrees. Ratios are Q16 (`TRIG_ONE` == 1.0). The screen
//! is y-down, so a positive angle turns clockwise.
//!
//! Mirrors the watch SDK's integer `sin_lookup`/`cos_lookup` with
//! truncating division, so rotated bars land on the same pixels.

use embedded_graphics::prelude::Point;

/// Fixed-point 1.0.
pub const TRIG_ONE: i32 = 1 << 16;

/// `sin(d) * TRIG_ONE` for d in 0..=90, rounded.
#[rustfmt::skip]
const SIN_Q16: [i32; 91] = [
    0, 1144, 2287, 3430, 4572, 5712, 6850, 7987,
    9121, 10252, 11380, 12505, 13626, 14742, 15855, 16962,
    18064, 19161, 20252, 21336, 22415, 23486, 24550, 25607,
    26656, 27697, 28729, 29753, 30767, 31772, 32768, 33754,
    34729, 35693, 36647, 37590, 38521, 39441, 40348, 41243,
    42126, 42995, 43852, 44695, 45525, 46341, 47143, 47930,
    48703, 49461, 50203, 50931, 51643, 52339, 53020, 53684,
    54332, 54963, 55578, 56175, 56756, 57319, 57865, 58393,
    58903, 59396, 59870, 60326, 60764, 61183, 61584, 61966,
    62328, 62672, 62997, 63303, 63589, 63856, 64104, 64332,
    64540, 64729, 64898, 65048, 65177, 65287, 65376, 65446,
    65496, 65526, 65536,
];

/// Sine of an angle in degrees, Q16.
pub const fn sin(degrees: i32) -> i32 {
    let d = degrees.rem_euclid(360) as usize;
    match d {
        0..=90 => SIN_Q16[d],
        91..=180 => SIN_Q16[180 - d],
        181..=270 => -SIN_Q16[d - 180],
        _ => -SIN_Q16[360 - d],
    }
}

/// Cosine of an angle in degrees, Q16.
pub const fn cos(degrees: i32) -> i32 { sin(degrees + 90) }

/// Rotate `point` about the origin by `degrees`.
///
/// Products are divided back with truncation towards zero.
pub const fn rotate(
    point: Point,
    degrees: i32,
) -> Point {
    let (s, c) = (sin(degrees), cos(degrees));
    Point::new(
        (point.x * c - point.y * s) / TRIG_ONE,
        (point.x * s + point.y * c) / TRIG_ONE,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_angles() {
        assert_eq!(sin(0), 0);
        assert_eq!(sin(90), TRIG_ONE);
        assert_eq!(sin(180), 0);
        assert_eq!(sin(270), -TRIG_ONE);
        assert_eq!(cos(0), TRIG_ONE);
        assert_eq!(cos(180), -TRIG_ONE);
    }

    #[test]
    fn test_negative_angles_mirror() {
        for d in 0..=360 {
            assert_eq!(sin(-d), -sin(d), "angle {d}");
            assert_eq!(cos(-d), cos(d), "angle {d}");
        }
    }

    #[test]
    fn test_rotate_quarter_turn_is_clockwise() {
        // x axis turns onto the (downward) y axis
        assert_eq!(rotate(Point::new(10, 0), 90), Point::new(0, 10));
        assert_eq!(rotate(Point::new(10, 0), -90), Point::new(0, -10));
    }

    #[test]
    fn test_rotate_45() {
        assert_eq!(rotate(Point::new(100, 0), 45), Point::new(70, 70));
        assert_eq!(rotate(Point::new(100, 0), -45), Point::new(70, -70));
        assert_eq!(rotate(Point::new(0, 27), 45), Point::new(-19, 19));
    }
}
