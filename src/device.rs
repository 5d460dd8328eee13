//! Output device session.
//!
//! [`MidiDriver`] is the boundary to whatever actually makes sound: a
//! hardware port, a virtual port or the built-in synthesizer. A
//! [`DeviceChannel`] owns one driver and layers the session rules on top:
//! opening selects the default instrument, sends while closed are dropped,
//! and no driver failure ever escapes as an error.

use crate::error::Result;
use crate::instrument::Instrument;
use crate::midi::{NoteCommand, ShortMessage};
use crate::note::{SimpleNote, Velocity};
use crate::pitch::{encode, Pitch};

pub trait MidiDriver {
    fn device_count(&self) -> usize;

    fn device_name(&self, _index: usize) -> Option<String> {
        None
    }

    fn open(&mut self, index: usize) -> Result<()>;

    fn send_short_message(&mut self, message: ShortMessage) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

impl<D: MidiDriver + ?Sized> MidiDriver for Box<D> {
    fn device_count(&self) -> usize {
        (**self).device_count()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        (**self).device_name(index)
    }

    fn open(&mut self, index: usize) -> Result<()> {
        (**self).open(index)
    }

    fn send_short_message(&mut self, message: ShortMessage) -> Result<()> {
        (**self).send_short_message(message)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

pub struct DeviceChannel<D: MidiDriver> {
    driver: D,
    is_open: bool,
    selected_device: usize,
    selected_instrument: Instrument,
}

impl<D: MidiDriver> DeviceChannel<D> {
    pub fn new(driver: D) -> Self {
        log::info!("{} MIDI output device(s)", driver.device_count());
        DeviceChannel {
            driver,
            is_open: false,
            selected_device: 0,
            selected_instrument: Instrument::default(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn device_count(&self) -> usize {
        self.driver.device_count()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn selected_device(&self) -> usize {
        self.selected_device
    }

    pub fn selected_instrument(&self) -> Instrument {
        self.selected_instrument
    }

    /// Claims device `index` and selects the default instrument.
    ///
    /// Returns `false` if the index is out of range or the driver refuses.
    /// Opening while already open keeps the current session.
    pub fn open(&mut self, index: usize) -> bool {
        if self.is_open {
            log::debug!("device {} already open", self.selected_device);
            return true;
        }
        let count = self.driver.device_count();
        if index >= count {
            log::error!("cannot open device {}: {} device(s) available", index, count);
            return false;
        }
        if let Err(e) = self.driver.open(index) {
            log::error!("cannot open device {}: {}", index, e);
            return false;
        }

        self.selected_device = index;
        self.is_open = true;
        log::info!(
            "opened device {} ({})",
            index,
            self.driver.device_name(index).as_deref().unwrap_or("unnamed")
        );
        self.set_instrument(Instrument::ACOUSTIC_GRAND_PIANO);
        true
    }

    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        match self.driver.close() {
            Ok(()) => log::info!("closed device {}", self.selected_device),
            Err(e) => log::warn!("closing device {}: {}", self.selected_device, e),
        }
    }

    /// Returns `true` if the driver accepted the message.
    pub fn send_note(
        &mut self,
        command: NoteCommand,
        pitch: Pitch,
        octave: i8,
        velocity: Velocity,
    ) -> bool {
        if !self.is_open || pitch.is_rest() {
            return false;
        }
        let note = encode(pitch, octave);
        if note.is_rest() {
            log::debug!("{}{} has no MIDI note, dropped", pitch, octave);
            return false;
        }
        self.send(ShortMessage::note(command, note, velocity))
    }

    pub fn play_note(&mut self, note: &SimpleNote) -> bool {
        self.send_note(NoteCommand::NoteOn, note.pitch(), note.octave(), note.velocity())
    }

    pub fn stop_note(&mut self, note: &SimpleNote) -> bool {
        self.send_note(NoteCommand::NoteOff, note.pitch(), note.octave(), note.velocity())
    }

    pub fn set_instrument(&mut self, instrument: Instrument) {
        if !self.is_open {
            return;
        }
        let instrument = instrument.playable();
        self.selected_instrument = instrument;
        if self.send(ShortMessage::program_change(instrument)) {
            log::info!("instrument set to program {}", instrument.id());
        }
    }

    pub fn send_raw(&mut self, message: ShortMessage) {
        if self.is_open {
            self.send(message);
        }
    }

    fn send(&mut self, message: ShortMessage) -> bool {
        match self.driver.send_short_message(message) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("send failed: {}", e);
                false
            }
        }
    }
}

impl<D: MidiDriver> Drop for DeviceChannel<D> {
    fn drop(&mut self) {
        self.close();
    }
}
