//! Interactive SDL window.
//!
//! Keys:
//! - `B` sends the next preset background colour
//! - `Escape` or closing the window unloads the face and exits

use std::thread;
use std::time::Instant;

use anyhow::Result;
use circlesquared_common::{SettingsStore, Watchface};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettings, SimulatorDisplay, SimulatorEvent, Window};

use crate::companion::send_background;
use crate::print_log;
use crate::timing::{FRAME_TIME, TimeSource};

/// Colours cycled by the `B` key.
const BACKGROUND_PRESETS: [i32; 6] = [0x000000, 0x0000AA, 0x005500, 0x550055, 0xAAAAAA, 0xFFFFFF];

/// Run the window until the user quits, then unload the face.
pub fn run<S: SettingsStore>(
    face: &mut Watchface<S>,
    display: &mut SimulatorDisplay<Rgb565>,
    time: TimeSource,
    output_settings: &OutputSettings,
) -> Result<()> {
    let mut window = Window::new("Circle Squared", output_settings);
    let mut last = time.now();
    let mut preset = 0;

    face.render(display);
    window.update(display);

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown {
                    keycode, repeat: false, ..
                } => match keycode {
                    Keycode::Escape => break 'running,
                    Keycode::B => {
                        preset = (preset + 1) % BACKGROUND_PRESETS.len();
                        send_background(face, BACKGROUND_PRESETS[preset])?;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        let now = time.now();
        if now != last {
            face.tick(now);
            last = now;
        }

        face.render(display);
        window.update(display);
        print_log(face);

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    face.unload()?;
    print_log(face);
    Ok(())
}
