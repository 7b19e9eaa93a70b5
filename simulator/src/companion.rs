//! Stand-in for the phone-side companion app.
//!
//! Configuration reaches the face the same way it would on a watch: as a
//! packed dictionary handed to [`Watchface::on_message`].

use anyhow::Result;
use circlesquared_common::config::KEY_BACKGROUND_COLOR;
use circlesquared_common::message::DictionaryBuilder;
use circlesquared_common::{SettingsStore, Watchface};

/// Header plus one integer tuple.
const MESSAGE_CAPACITY: usize = 16;

/// Encode a background colour configuration message.
pub fn background_message(code: i32) -> Result<DictionaryBuilder<MESSAGE_CAPACITY>> {
    let mut msg = DictionaryBuilder::new();
    msg.push_int(KEY_BACKGROUND_COLOR, code)?;
    Ok(msg)
}

/// Deliver a background colour to `face` as a configuration message.
pub fn send_background<S: SettingsStore>(
    face: &mut Watchface<S>,
    code: i32,
) -> Result<bool> {
    let msg = background_message(code)?;
    Ok(face.on_message(msg.as_bytes())?)
}
