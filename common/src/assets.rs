//! Static 1-bit bitmaps composited over the face.
//!
//! The images are generated at compile time and live in flash. A running
//! scene acquires them through [`Bitmaps::load`] and lets go of them when the
//! scene is dropped.
//!
//! # Images
//!
//! - [`ImageId::SecondsTernary`]: 121x60 strip, one tick per second position,
//!   mirrored above and below the seconds marker band. Ticks grow with the
//!   ternary weight of the second (multiples of 3, 9 and 27).
//! - [`ImageId::UnaryHours`]: 62x27 outline of six equal hour cells.
//! - [`ImageId::TernaryMinutes`]: 61x27 comb with one tick per minute.

/// Identifies one of the bundled images.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageId {
    SecondsTernary,
    UnaryHours,
    TernaryMinutes,
}

/// A packed 1-bit image: row-major, MSB first, rows padded to whole bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MonoBitmap {
    width: u32,
    height: u32,
    data: &'static [u8],
}

impl MonoBitmap {
    /// Wrap packed pixel data. `data` must hold `stride(width) * height` bytes.
    pub const fn new(
        width: u32,
        height: u32,
        data: &'static [u8],
    ) -> Self {
        Self { width, height, data }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// Whether the pixel at (x, y) is set. Out-of-bounds pixels are clear.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = y as usize * stride(self.width) + x as usize / 8;
        self.data.get(idx).is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> u32 { self.data.iter().map(|b| b.count_ones()).sum() }
}

/// The three images used by the face, acquired together.
#[derive(Debug)]
pub struct Bitmaps {
    seconds: MonoBitmap,
    hours: MonoBitmap,
    minutes: MonoBitmap,
}

impl Bitmaps {
    /// Acquire all bundled images.
    pub const fn load() -> Self {
        Self {
            seconds: SECONDS_TERNARY,
            hours: UNARY_HOURS,
            minutes: TERNARY_MINUTES,
        }
    }

    /// Look up an image by id.
    pub const fn get(
        &self,
        id: ImageId,
    ) -> &MonoBitmap {
        match id {
            ImageId::SecondsTernary => &self.seconds,
            ImageId::UnaryHours => &self.hours,
            ImageId::TernaryMinutes => &self.minutes,
        }
    }
}

// =============================================================================
// Image Data
// =============================================================================

const SECONDS_W: u32 = 121;
const SECONDS_H: u32 = 60;
/// Rows 20..40 stay clear for the seconds marker.
const SECONDS_BAND_TOP: u32 = 19;
const SECONDS_BAND_BOTTOM: u32 = 40;

const HOURS_W: u32 = 62;
const HOURS_H: u32 = 27;

const MINUTES_W: u32 = 61;
const MINUTES_H: u32 = 27;

const fn stride(width: u32) -> usize { width.div_ceil(8) as usize }

const SECONDS_LEN: usize = stride(SECONDS_W) * SECONDS_H as usize;
const HOURS_LEN: usize = stride(HOURS_W) * HOURS_H as usize;
const MINUTES_LEN: usize = stride(MINUTES_W) * MINUTES_H as usize;

const SECONDS_DATA: [u8; SECONDS_LEN] = seconds_ternary();
const HOURS_DATA: [u8; HOURS_LEN] = unary_hours();
const MINUTES_DATA: [u8; MINUTES_LEN] = ternary_minutes();

pub const SECONDS_TERNARY: MonoBitmap = MonoBitmap::new(SECONDS_W, SECONDS_H, &SECONDS_DATA);
pub const UNARY_HOURS: MonoBitmap = MonoBitmap::new(HOURS_W, HOURS_H, &HOURS_DATA);
pub const TERNARY_MINUTES: MonoBitmap = MonoBitmap::new(MINUTES_W, MINUTES_H, &MINUTES_DATA);

/// Ternary weight of a tick: how many times 3 divides it, capped at 3.
/// The first tick of a scale is always full weight.
const fn ternary_weight(mut n: u32) -> u32 {
    if n == 0 {
        return 3;
    }
    let mut weight = 0;
    while weight < 3 && n % 3 == 0 {
        n /= 3;
        weight += 1;
    }
    weight
}

const fn set<const N: usize>(
    buf: &mut [u8; N],
    width: u32,
    x: u32,
    y: u32,
) {
    buf[y as usize * stride(width) + x as usize / 8] |= 0x80 >> (x % 8);
}

const fn seconds_ternary() -> [u8; SECONDS_LEN] {
    let mut buf = [0u8; SECONDS_LEN];
    let mut s = 0;
    while s <= 60 {
        let x = s * (SECONDS_W - 1) / 60;
        let len = 5 + 5 * ternary_weight(s);
        let mut i = 0;
        while i < len {
            set(&mut buf, SECONDS_W, x, SECONDS_BAND_TOP - i);
            set(&mut buf, SECONDS_W, x, SECONDS_BAND_BOTTOM + i);
            i += 1;
        }
        s += 1;
    }
    buf
}

const fn unary_hours() -> [u8; HOURS_LEN] {
    let mut buf = [0u8; HOURS_LEN];
    let mut x = 0;
    while x < HOURS_W {
        set(&mut buf, HOURS_W, x, 0);
        set(&mut buf, HOURS_W, x, HOURS_H - 1);
        x += 1;
    }
    let mut y = 0;
    while y < HOURS_H {
        set(&mut buf, HOURS_W, 0, y);
        set(&mut buf, HOURS_W, HOURS_W - 1, y);
        // one divider per hour, matching hour bar lengths (10px per hour + 2)
        let mut h = 1;
        while h < 6 {
            set(&mut buf, HOURS_W, h * 10 + 1, y);
            h += 1;
        }
        y += 1;
    }
    buf
}

const fn ternary_minutes() -> [u8; MINUTES_LEN] {
    let mut buf = [0u8; MINUTES_LEN];
    let mut x = 0;
    while x < MINUTES_W {
        set(&mut buf, MINUTES_W, x, 0);
        set(&mut buf, MINUTES_W, x, MINUTES_H - 1);
        x += 1;
    }
    let mut m = 0;
    while m <= 30 {
        let x = m * 2;
        let len = 3 + 3 * ternary_weight(m);
        let mut i = 0;
        while i < len {
            set(&mut buf, MINUTES_W, x, i);
            set(&mut buf, MINUTES_W, x, MINUTES_H - 1 - i);
            i += 1;
        }
        m += 1;
    }
    buf
}

// =============================================================================
// Unit Tests
// =============================================================================
