use crate::instrument::Instrument;
use crate::note::Velocity;
use crate::pitch::NoteNumber;

const PROGRAM_CHANGE: u8 = 0xC0;
const CHANNEL_PRESSURE: u8 = 0xD0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NoteCommand {
    NoteOn = 0x90,
    NoteOff = 0x80,
}

/// A channel voice message packed into the low 24 bits of a word:
/// status in bits 0-7, first data byte in 8-15, second data byte in 16-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortMessage(u32);

impl ShortMessage {
    pub fn from_raw(raw: u32) -> Self {
        ShortMessage(raw & 0x00FF_FFFF)
    }

    pub fn note(command: NoteCommand, note: NoteNumber, velocity: Velocity) -> Self {
        Self::pack(command as u8, note.get(), velocity)
    }

    pub fn program_change(instrument: Instrument) -> Self {
        Self::pack(PROGRAM_CHANGE, instrument.id(), 0)
    }

    fn pack(status: u8, data1: u8, data2: u8) -> Self {
        ShortMessage(
            (u32::from(data2 & 0x7F) << 16) + (u32::from(data1 & 0x7F) << 8) + u32::from(status),
        )
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn status(self) -> u8 {
        self.0 as u8
    }

    pub fn data1(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn data2(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Bytes as they go on the wire. Program change and channel pressure
    /// carry a single data byte.
    pub fn to_bytes(self) -> Vec<u8> {
        match self.status() & 0xF0 {
            PROGRAM_CHANGE | CHANNEL_PRESSURE => vec![self.status(), self.data1()],
            _ => vec![self.status(), self.data1(), self.data2()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOff(NoteNumber),
    NoteOn(NoteNumber, Velocity),
    ProgramChange(Instrument),
}

impl MidiEvent {
    /// Decodes the messages a synthesizer cares about, on any channel.
    pub fn decode(message: ShortMessage) -> Option<MidiEvent> {
        let note = || NoteNumber::new(message.data1());
        match message.status() & 0xF0 {
            0x80 => note().map(MidiEvent::NoteOff),
            0x90 if message.data2() == 0 => note().map(MidiEvent::NoteOff),
            0x90 => note().map(|n| MidiEvent::NoteOn(n, message.data2())),
            PROGRAM_CHANGE => Instrument::new(message.data1()).map(MidiEvent::ProgramChange),
            _ => None,
        }
    }
}
