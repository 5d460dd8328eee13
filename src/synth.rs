//! Built-in polyphonic synthesizer.
//!
//! The synth lives on the audio thread and is fed decoded [`MidiEvent`]s
//! through a lock free single producer queue.

use std::time::Duration;

use lockfree::prelude::spsc;

use super::midi::MidiEvent;
use super::note::MAX_VELOCITY;
use super::oscillator::{Oscillator, Waveform};
use super::pitch::NoteNumber;
use super::volume::{Volume, VolumeError};
use f32 as Frame;

#[derive(Debug)]
struct Voice {
    note: NoteNumber,
    freq: f32,
    gain: f32,
    start: u64,
    end: Option<u64>,
}

pub struct Synthesiser {
    sample_rate: u32,
    oscillators: Vec<Oscillator>,
    voices: Vec<Voice>,
    rx: spsc::Receiver<MidiEvent>,
    volume: Volume,
    clock: u64,
}

impl Synthesiser {
    pub fn new(sample_rate: u32, rx: spsc::Receiver<MidiEvent>) -> Self {
        Synthesiser {
            sample_rate,
            oscillators: Vec::new(),
            voices: Vec::new(),
            rx,
            volume: Volume::FULL,
            clock: 0,
        }
    }

    /// One main oscillator thickened by a detuned pair.
    pub fn with_default_voice(
        sample_rate: u32,
        rx: spsc::Receiver<MidiEvent>,
    ) -> Result<Self, VolumeError> {
        let mut synth = Synthesiser::new(sample_rate, rx);
        synth.add_oscillator(Oscillator::new(Volume::new(0.5)?));
        synth.add_oscillator(Oscillator::detuned(Volume::new(0.15)?, 0.5));
        synth.add_oscillator(Oscillator::detuned(Volume::new(0.15)?, -0.5));
        synth.set_volume(0.8)?;
        Ok(synth)
    }

    pub fn add_oscillator(&mut self, oscillator: Oscillator) {
        self.oscillators.push(oscillator);
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), VolumeError> {
        self.volume.set_volume(volume)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn process_messages(&mut self) {
        while let Ok(event) = self.rx.recv() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn(note, velocity) => {
                self.voices.retain(|v| v.note != note);
                self.voices.push(Voice {
                    note,
                    freq: note.hz(),
                    gain: velocity as f32 / MAX_VELOCITY as f32,
                    start: self.clock,
                    end: None,
                });
            }
            MidiEvent::NoteOff(note) => {
                for voice in self.voices.iter_mut().filter(|v| v.note == note && v.end.is_none()) {
                    voice.end = Some(self.clock);
                }
            }
            MidiEvent::ProgramChange(instrument) => {
                let waveform = Waveform::for_instrument(instrument);
                for oscillator in &mut self.oscillators {
                    oscillator.set_waveform(waveform);
                }
            }
        }
    }

    fn elapsed(&self, since: u64) -> Duration {
        self.elapsed_between(since, self.clock)
    }

    fn elapsed_between(&self, from: u64, to: u64) -> Duration {
        Duration::from_secs_f64((to - from) as f64 / self.sample_rate as f64)
    }

    fn release_tail(&self) -> Duration {
        let longest = self.oscillators.iter().map(Oscillator::release).fold(0.0, f32::max);
        Duration::from_secs_f32(longest)
    }

    pub fn next_sample(&mut self) -> Frame {
        let tail = self.release_tail();
        let mut frame = 0.0;
        for voice in &self.voices {
            let t = self.elapsed(voice.start);
            let end = voice.end.map(|e| self.elapsed_between(voice.start, e));
            for oscillator in &self.oscillators {
                frame += oscillator.make_sample(t, end.as_ref(), voice.freq) * voice.gain;
            }
        }

        let clock = self.clock;
        let sample_rate = self.sample_rate as f64;
        self.voices.retain(|v| match v.end {
            Some(end) => Duration::from_secs_f64((clock - end) as f64 / sample_rate) <= tail,
            None => true,
        });
        self.clock += 1;

        frame * self.volume.get_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Instrument;
    use crate::pitch::{encode, Pitch};

    const RATE: u32 = 8_000;

    fn synth() -> (spsc::Sender<MidiEvent>, Synthesiser) {
        let (tx, rx) = spsc::create();
        (tx, Synthesiser::with_default_voice(RATE, rx).unwrap())
    }

    fn peak(synth: &mut Synthesiser, samples: usize) -> f32 {
        (0..samples).map(|_| synth.next_sample().abs()).fold(0.0, f32::max)
    }

    #[test]
    fn silent_without_notes() {
        let (_tx, mut synth) = synth();
        synth.process_messages();
        assert_eq!(peak(&mut synth, 1000), 0.0);
    }

    #[test]
    fn note_on_sounds_and_note_off_fades_out() {
        let (mut tx, mut synth) = synth();
        let a4 = encode(Pitch::A, 4);
        assert!(tx.send(MidiEvent::NoteOn(a4, 127)).is_ok());
        synth.process_messages();
        assert_eq!(synth.active_voices(), 1);
        assert!(peak(&mut synth, 1000) > 0.1);

        assert!(tx.send(MidiEvent::NoteOff(a4)).is_ok());
        synth.process_messages();
        // release is 0.3s
        peak(&mut synth, RATE as usize / 2);
        assert_eq!(synth.active_voices(), 0);
        assert_eq!(peak(&mut synth, 100), 0.0);
    }

    #[test]
    fn retriggering_a_note_reuses_its_voice() {
        let (mut tx, mut synth) = synth();
        let c4 = encode(Pitch::C, 4);
        assert!(tx.send(MidiEvent::NoteOn(c4, 100)).is_ok());
        assert!(tx.send(MidiEvent::NoteOn(c4, 100)).is_ok());
        assert!(tx.send(MidiEvent::NoteOn(encode(Pitch::E, 4), 100)).is_ok());
        synth.process_messages();
        assert_eq!(synth.active_voices(), 2);
    }

    #[test]
    fn program_change_switches_waveform() {
        let (mut tx, mut synth) = synth();
        assert!(tx.send(MidiEvent::ProgramChange(Instrument::new(19).unwrap())).is_ok());
        synth.process_messages();
        assert!(synth.oscillators.iter().all(|o| o.waveform() == Waveform::Square));
    }
}
