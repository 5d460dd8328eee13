//! Computer keyboard to MIDI.
//!
//! Key presses are resolved to notes through a [`KeyToNoteMap`], encoded to
//! MIDI note numbers and sent as note-on/note-off pairs to a
//! [`DeviceChannel`]. The [`Controller`] keeps exactly one note-on per press
//! and one note-off per release, whatever the OS key repeat does.

pub mod controller;
pub mod device;
pub mod error;
pub mod instrument;
pub mod key_state;
pub mod keymap;
pub mod midi;
pub mod note;
pub mod oscillator;
pub mod pitch;
pub mod settings;
pub mod synth;
pub mod volume;

#[cfg(feature = "midi-out")]
pub mod midir_driver;
#[cfg(feature = "audio")]
pub mod synth_driver;

#[cfg(test)]
mod testing;

pub use controller::{Controller, KeyEvent, Transition};
pub use device::{DeviceChannel, MidiDriver};
pub use error::DeviceError;
pub use instrument::Instrument;
pub use key_state::KeyState;
pub use keymap::KeyToNoteMap;
pub use midi::{MidiEvent, NoteCommand, ShortMessage};
pub use note::SimpleNote;
pub use pitch::{encode, NoteNumber, Pitch};
