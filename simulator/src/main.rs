//! Circle Squared desktop simulator.
//!
//! Hosts the watchface on a 144x168 simulated display. Settings persist to a
//! TOML file between runs, like the watch's persistent storage.
//!
//! Headless use:
//!
//! ```text
//! simulator --time 15:45:30 --background 0000AA --screenshot face.png
//! ```
//!
//! The interactive window needs the `with-sdl` feature.

mod args;
mod companion;
mod store;
mod timing;
#[cfg(feature = "with-sdl")]
mod window;

use anyhow::{Context, Result};
use circlesquared_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use circlesquared_common::{DisplayKind, Palette, SettingsStore, Watchface};
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};

use crate::args::Args;
use crate::companion::send_background;
use crate::store::FileStore;
use crate::timing::TimeSource;

fn main() -> Result<()> {
    let args = Args::parse();

    let settings_path = match &args.settings {
        Some(path) => path.clone(),
        None => FileStore::default_path()?,
    };
    let store = FileStore::open(&settings_path)?;
    println!("Settings: {}", store.path().display());

    let kind = if args.monochrome { DisplayKind::Monochrome } else { DisplayKind::Color };
    let mut face = Watchface::new(store, Palette::new(kind));
    let time = TimeSource::new(args.time);

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    face.load(display.size(), time.now())?;

    if let Some(code) = args.background {
        send_background(&mut face, code)?;
    }
    print_log(&mut face);

    let output_settings = OutputSettingsBuilder::new().scale(args.scale).build();

    if let Some(path) = &args.screenshot {
        face.render(&mut display);
        display
            .to_rgb_output_image(&output_settings)
            .save_png(path)
            .with_context(|| format!("write {}", path.display()))?;
        face.unload()?;
        print_log(&mut face);
        println!("Saved {}", path.display());
        return Ok(());
    }

    run_window(&mut face, &mut display, time, &output_settings)
}

#[cfg(feature = "with-sdl")]
fn run_window<S: SettingsStore>(
    face: &mut Watchface<S>,
    display: &mut SimulatorDisplay<Rgb565>,
    time: TimeSource,
    output_settings: &embedded_graphics_simulator::OutputSettings,
) -> Result<()> {
    window::run(face, display, time, output_settings)
}

#[cfg(not(feature = "with-sdl"))]
fn run_window<S: SettingsStore>(
    face: &mut Watchface<S>,
    _display: &mut SimulatorDisplay<Rgb565>,
    _time: TimeSource,
    _output_settings: &embedded_graphics_simulator::OutputSettings,
) -> Result<()> {
    face.unload()?;
    print_log(face);
    anyhow::bail!("built without the `with-sdl` feature; pass --screenshot <png> or rebuild with --features with-sdl")
}

/// Print and clear the face's log buffer.
pub(crate) fn print_log<S: SettingsStore>(face: &mut Watchface<S>) {
    for entry in face.log_mut().drain() {
        println!(
            "[{:02}:{:02}:{:02}] {} {}",
            entry.stamp.hour,
            entry.stamp.minute,
            entry.stamp.second,
            entry.level.prefix(),
            entry.message
        );
    }
}
