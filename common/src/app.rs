//! Watchface lifecycle and event handling.
//!
//! The host drives a [`Watchface`] through three states:
//!
//! ```text
//! Uninitialized --load()--> Running(Scene) --unload()--> Destroyed
//! ```
//!
//! While running, the host forwards two kinds of events:
//! - a once-per-second tick ([`Watchface::tick`] / [`Watchface::update_time`])
//! - configuration messages from the companion app ([`Watchface::on_message`])
//!
//! Both only update state and mark the face dirty. Drawing happens later in
//! [`Watchface::render`], at the host's discretion.
//!
//! # Resources
//!
//! Bitmaps and overlay placements live in the [`Scene`] owned by the
//! `Running` state. Leaving `Running` drops the scene, whether through
//! [`Watchface::unload`] or by dropping the whole `Watchface`.

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::assets::Bitmaps;
use crate::clock::ClockState;
use crate::colors::Palette;
use crate::config::KEY_BACKGROUND_COLOR;
use crate::layout::{DrawCommand, face_commands};
use crate::log::{LogBuffer, LogLevel};
use crate::message::{DictError, Dictionary};
use crate::overlays::{OVERLAY_COUNT, Overlay, overlay_layout};
use crate::render::draw_command;
use crate::settings::{SettingsStore, saved_background};

// =============================================================================
// Lifecycle
// =============================================================================

/// Resources held while the face is on screen.
#[derive(Debug)]
pub struct Scene {
    size: Size,
    bitmaps: Bitmaps,
    overlays: [Overlay; OVERLAY_COUNT],
}

impl Scene {
    /// Acquire bitmaps and place the overlays for a surface of `size`.
    pub fn acquire(size: Size) -> Self {
        let bitmaps = Bitmaps::load();
        let overlays = overlay_layout(&bitmaps, size);
        Self { size, bitmaps, overlays }
    }

    /// Surface size the scene was laid out for.
    pub const fn size(&self) -> Size { self.size }

    /// Overlay placement commands, in paint order.
    pub fn overlay_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.overlays.iter().copied().map(DrawCommand::Bitmap)
    }
}

/// Lifecycle state together with the resources it owns.
#[derive(Debug)]
pub enum Lifecycle {
    Uninitialized,
    Running(Scene),
    Destroyed,
}

/// Lifecycle state without its payload, for inspection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Uninitialized,
    Running,
    Destroyed,
}

impl Lifecycle {
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Uninitialized => Phase::Uninitialized,
            Self::Running(_) => Phase::Running,
            Self::Destroyed => Phase::Destroyed,
        }
    }
}

/// A lifecycle transition was requested from the wrong state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LifecycleError {
    /// State the watchface was in.
    pub from: Phase,
    /// State that was requested.
    pub to: Phase,
}

impl fmt::Display for LifecycleError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "cannot move from {:?} to {:?}", self.from, self.to)
    }
}

impl core::error::Error for LifecycleError {}

// =============================================================================
// Watchface
// =============================================================================

/// The watchface application state, owned by the host's event loop.
pub struct Watchface<S: SettingsStore> {
    lifecycle: Lifecycle,
    clock: ClockState,
    palette: Palette,
    background: Rgb565,
    store: S,
    dirty: bool,
    log: LogBuffer,
}

impl<S: SettingsStore> Watchface<S> {
    /// Create an unloaded watchface persisting its settings in `store`.
    pub fn new(
        store: S,
        palette: Palette,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            clock: ClockState::default(),
            palette,
            background: palette.default_background(),
            store,
            dirty: false,
            log: LogBuffer::new(),
        }
    }

    /// Put the face on screen.
    ///
    /// Acquires the scene, restores a saved background colour and shows
    /// `now` right away.
    pub fn load(
        &mut self,
        size: Size,
        now: ClockState,
    ) -> Result<(), LifecycleError> {
        self.expect_phase(Phase::Uninitialized, Phase::Running)?;

        self.clock = now;
        self.lifecycle = Lifecycle::Running(Scene::acquire(size));
        self.log
            .push_fmt(LogLevel::Info, now, format_args!("Loaded {}x{}", size.width, size.height));

        if let Some(code) = saved_background(&self.store) {
            self.background = self.palette.background(code);
            self.log
                .push_fmt(LogLevel::Debug, now, format_args!("Restored background {code:06X}"));
        }

        self.dirty = true;
        Ok(())
    }

    /// Take the face off screen and release its resources.
    pub fn unload(&mut self) -> Result<(), LifecycleError> {
        self.expect_phase(Phase::Running, Phase::Destroyed)?;
        self.lifecycle = Lifecycle::Destroyed;
        self.dirty = false;
        self.log.push(LogLevel::Info, self.clock, "Unloaded");
        Ok(())
    }

    /// Store the current time and request a redraw. Ignored once destroyed.
    pub fn update_time(
        &mut self,
        hour: u8,
        minute: u8,
        second: u8,
    ) {
        self.tick(ClockState::new(hour, minute, second));
    }

    /// Tick handler: store `now` and request a redraw. Ignored once destroyed.
    pub fn tick(
        &mut self,
        now: ClockState,
    ) {
        if self.lifecycle.phase() == Phase::Destroyed {
            return;
        }
        self.clock = now;
        self.dirty = true;
    }

    /// Handle a packed configuration message.
    ///
    /// Returns whether a background colour was applied. A message without
    /// an integer background tuple is ignored.
    pub fn on_message(
        &mut self,
        bytes: &[u8],
    ) -> Result<bool, DictError> {
        if self.lifecycle.phase() == Phase::Destroyed {
            return Ok(false);
        }
        let dict = match Dictionary::parse(bytes) {
            Ok(dict) => dict,
            Err(err) => {
                self.log
                    .push_fmt(LogLevel::Warn, self.clock, format_args!("Bad message: {err}"));
                return Err(err);
            }
        };
        self.log.push(LogLevel::Debug, self.clock, "Message received");

        match dict.find(KEY_BACKGROUND_COLOR).and_then(|t| t.value.as_i32()) {
            Some(code) => {
                self.set_background_color(code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply a packed `0xRRGGBB` background colour and persist it.
    ///
    /// The colour is shown even if persisting fails.
    pub fn set_background_color(
        &mut self,
        code: i32,
    ) {
        self.background = self.palette.background(code);
        self.dirty = true;
        self.log
            .push_fmt(LogLevel::Info, self.clock, format_args!("Background {code:06X}"));

        if let Err(err) = self.store.write_i32(KEY_BACKGROUND_COLOR, code) {
            self.log
                .push_fmt(LogLevel::Warn, self.clock, format_args!("Persist failed: {err:?}"));
        }
    }

    /// Redraw the face if anything changed since the last call.
    ///
    /// Paint order: background, hands, overlays. Returns whether anything
    /// was drawn.
    pub fn render<D>(
        &mut self,
        display: &mut D,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Lifecycle::Running(scene) = &self.lifecycle else {
            return false;
        };
        if !self.dirty {
            return false;
        }

        display.clear(self.background).ok();
        for command in face_commands(self.clock, scene.size()).iter() {
            draw_command(display, command, self.palette, &scene.bitmaps);
        }
        for command in scene.overlay_commands() {
            draw_command(display, &command, self.palette, &scene.bitmaps);
        }

        self.dirty = false;
        true
    }

    /// Draw commands for the current state: hands first, then overlays.
    /// Empty unless running.
    pub fn commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        let scene = match &self.lifecycle {
            Lifecycle::Running(scene) => Some(scene),
            _ => None,
        };
        let hands = scene.map(|s| face_commands(self.clock, s.size())).unwrap_or_default();
        hands.into_iter().chain(scene.into_iter().flat_map(|s| s.overlay_commands()))
    }

    #[inline]
    pub const fn phase(&self) -> Phase { self.lifecycle.phase() }

    #[inline]
    pub const fn clock(&self) -> ClockState { self.clock }

    #[inline]
    pub const fn background(&self) -> Rgb565 { self.background }

    #[inline]
    pub const fn is_dirty(&self) -> bool { self.dirty }

    /// Settings store, e.g. to inspect what was persisted.
    pub const fn store(&self) -> &S { &self.store }

    /// Give the store back, consuming the watchface.
    pub fn into_store(self) -> S { self.store }

    /// Event log, for the host to drain.
    pub fn log_mut(&mut self) -> &mut LogBuffer { &mut self.log }

    fn expect_phase(
        &self,
        from: Phase,
        to: Phase,
    ) -> Result<(), LifecycleError> {
        let current = self.lifecycle.phase();
        if current == from {
            Ok(())
        } else {
            Err(LifecycleError { from: current, to })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::colors::{BLACK, DisplayKind, RED, WHITE};
    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::layout::FACE_COMMANDS;
    use crate::message::{DictionaryBuilder, TupleValue};
    use crate::settings::MemoryStore;

    const SCREEN: Size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    /// Framebuffer the size of the watch screen.
    struct Screen {
        pixels: std::vec::Vec<Rgb565>,
    }

    impl Screen {
        fn new() -> Self { Self { pixels: vec![Rgb565::new(1, 2, 3); (SCREEN_WIDTH * SCREEN_HEIGHT) as usize] } }

        fn at(
            &self,
            x: i32,
            y: i32,
        ) -> Rgb565 {
            self.pixels[(y as u32 * SCREEN_WIDTH + x as u32) as usize]
        }
    }

    impl OriginDimensions for Screen {
        fn size(&self) -> Size { SCREEN }
    }

    impl DrawTarget for Screen {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if self.bounding_box().contains(p) {
                    self.pixels[(p.y as u32 * SCREEN_WIDTH + p.x as u32) as usize] = color;
                }
            }
            Ok(())
        }
    }

    /// Store whose writes always fail, like a full flash sector.
    struct ReadOnlyStore;

    impl SettingsStore for ReadOnlyStore {
        type Error = ();

        fn read_i32(
            &self,
            _key: u32,
        ) -> Option<i32> {
            None
        }

        fn write_i32(
            &mut self,
            _key: u32,
            _value: i32,
        ) -> Result<(), ()> {
            Err(())
        }
    }

    fn color_face() -> Watchface<MemoryStore> { Watchface::new(MemoryStore::new(), Palette::new(DisplayKind::Color)) }

    fn background_message(code: i32) -> DictionaryBuilder<32> {
        let mut builder = DictionaryBuilder::new();
        builder.push_int(KEY_BACKGROUND_COLOR, code).unwrap();
        builder
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut face = color_face();
        assert_eq!(face.phase(), Phase::Uninitialized);
        assert_eq!(
            face.unload(),
            Err(LifecycleError {
                from: Phase::Uninitialized,
                to: Phase::Destroyed
            })
        );

        face.load(SCREEN, ClockState::new(1, 2, 3)).unwrap();
        assert_eq!(face.phase(), Phase::Running);
        assert!(face.load(SCREEN, ClockState::default()).is_err());

        face.unload().unwrap();
        assert_eq!(face.phase(), Phase::Destroyed);
        assert!(face.load(SCREEN, ClockState::default()).is_err());
        assert!(face.unload().is_err());
    }

    #[test]
    fn test_load_marks_dirty_with_start_time() {
        let mut face = color_face();
        assert!(!face.is_dirty());
        face.load(SCREEN, ClockState::new(15, 45, 30)).unwrap();
        assert!(face.is_dirty());
        assert_eq!(face.clock(), ClockState::new(15, 45, 30));
    }

    #[test]
    fn test_tick_marks_dirty_without_drawing() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        let mut screen = Screen::new();
        assert!(face.render(&mut screen));
        assert!(!face.is_dirty());
        assert!(!face.render(&mut screen));

        face.update_time(8, 9, 10);
        assert!(face.is_dirty());
        assert_eq!(face.clock(), ClockState::new(8, 9, 10));
    }

    #[test]
    fn test_render_before_load_draws_nothing() {
        let mut face = color_face();
        face.tick(ClockState::new(1, 1, 1));
        let mut display = MockDisplay::<Rgb565>::new();
        assert!(!face.render(&mut display));
        assert_eq!(display.affected_area().size, Size::zero());
    }

    #[test]
    fn test_render_paints_background_and_marker() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::new(15, 45, 30)).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);

        assert_eq!(screen.at(0, 167), BLACK);
        // seconds marker at x = 72, rows 74..93, beneath no overlay pixel
        assert_eq!(screen.at(72, 84), RED);
        assert_eq!(screen.at(73, 84), RED);
    }

    #[test]
    fn test_render_paints_seconds_strip() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::new(0, 0, 0)).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);
        // full-length tick for second 0, above the marker band
        assert_eq!(screen.at(12, 60), WHITE);
        assert_eq!(screen.at(12, 80), RED);
    }

    #[test]
    fn test_configuration_message_applies_and_persists() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);

        let msg = background_message(0x0000FF);
        assert_eq!(face.on_message(msg.as_bytes()), Ok(true));
        assert!(face.is_dirty());
        assert_eq!(face.background(), Rgb565::BLUE);
        assert_eq!(face.store().read_i32(KEY_BACKGROUND_COLOR), Some(0x0000FF));

        face.render(&mut screen);
        assert_eq!(screen.at(0, 167), Rgb565::BLUE);
    }

    #[test]
    fn test_message_without_key_is_noop() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);

        let mut builder = DictionaryBuilder::<32>::new();
        builder.push_int(KEY_BACKGROUND_COLOR + 1, 0xFF0000).unwrap();
        assert_eq!(face.on_message(builder.as_bytes()), Ok(false));
        assert!(!face.is_dirty());
        assert_eq!(face.background(), BLACK);
        assert_eq!(face.store().read_i32(KEY_BACKGROUND_COLOR), None);
    }

    #[test]
    fn test_non_integer_background_is_ignored() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);

        let mut builder = DictionaryBuilder::<32>::new();
        builder.push(KEY_BACKGROUND_COLOR, TupleValue::Str("FF0000")).unwrap();
        assert_eq!(face.on_message(builder.as_bytes()), Ok(false));
        assert!(!face.is_dirty());
        assert_eq!(face.background(), BLACK);
        assert_eq!(face.store().read_i32(KEY_BACKGROUND_COLOR), None);
    }

    #[test]
    fn test_failed_persist_still_applies_and_warns() {
        let mut face = Watchface::new(ReadOnlyStore, Palette::new(DisplayKind::Color));
        face.load(SCREEN, ClockState::default()).unwrap();
        face.log_mut().drain().for_each(drop);

        face.set_background_color(0xFF0000);
        assert_eq!(face.background(), RED);
        assert!(face.is_dirty());
        let last = face.log_mut().drain().last().unwrap();
        assert_eq!(last.level, LogLevel::Warn);

        let mut screen = Screen::new();
        assert!(face.render(&mut screen));
        assert_eq!(screen.at(0, 167), RED);
    }

    #[test]
    fn test_malformed_message_reported_and_logged() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        face.log_mut().drain().for_each(drop);

        assert_eq!(face.on_message(&[1, 0]), Err(DictError::Truncated));
        let entry = face.log_mut().drain().next().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
    }

    #[test]
    fn test_background_survives_restart() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        face.set_background_color(0xFF0000);
        face.unload().unwrap();

        let mut restarted = Watchface::new(face.into_store(), Palette::new(DisplayKind::Color));
        assert_eq!(restarted.background(), BLACK);
        restarted.load(SCREEN, ClockState::default()).unwrap();
        assert_eq!(restarted.background(), RED);
        assert_eq!(restarted.store().read_i32(KEY_BACKGROUND_COLOR), Some(0xFF0000));
    }

    #[test]
    fn test_saved_black_restores_default() {
        let mut store = MemoryStore::new();
        store.write_i32(KEY_BACKGROUND_COLOR, 0).unwrap();
        let mut face = Watchface::new(store, Palette::new(DisplayKind::Color));
        face.load(SCREEN, ClockState::default()).unwrap();
        assert_eq!(face.background(), BLACK);

        let mut screen = Screen::new();
        face.render(&mut screen);
        assert_eq!(screen.at(0, 167), BLACK);
    }

    #[test]
    fn test_destroyed_ignores_events() {
        let mut face = color_face();
        face.load(SCREEN, ClockState::default()).unwrap();
        face.unload().unwrap();

        face.tick(ClockState::new(5, 5, 5));
        assert!(!face.is_dirty());
        let msg = background_message(0x00FF00);
        assert_eq!(face.on_message(msg.as_bytes()), Ok(false));
        assert_eq!(face.commands().count(), 0);
    }

    #[test]
    fn test_commands_hands_then_overlays() {
        let mut face = color_face();
        assert_eq!(face.commands().count(), 0);
        face.load(SCREEN, ClockState::new(10, 20, 30)).unwrap();

        let commands: std::vec::Vec<_> = face.commands().collect();
        assert_eq!(commands.len(), FACE_COMMANDS + OVERLAY_COUNT);
        assert!(commands[..FACE_COMMANDS].iter().all(|c| !matches!(c, DrawCommand::Bitmap(_))));
        assert!(commands[FACE_COMMANDS..].iter().all(|c| matches!(c, DrawCommand::Bitmap(_))));
    }

    #[test]
    fn test_monochrome_fill() {
        let mut face = Watchface::new(MemoryStore::new(), Palette::new(DisplayKind::Monochrome));
        face.load(SCREEN, ClockState::new(15, 45, 30)).unwrap();
        let mut screen = Screen::new();
        face.render(&mut screen);
        assert_eq!(screen.at(72, 84), WHITE);
    }
}
