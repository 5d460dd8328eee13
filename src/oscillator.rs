use std::f64::consts::PI;
use std::time::Duration;

use super::instrument::Instrument;
use super::volume::Volume;
use f32 as Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    /// Rough timbre for a General-MIDI family.
    pub fn for_instrument(instrument: Instrument) -> Self {
        match instrument.family() {
            // organ, brass, reed, synth lead
            2 | 7 | 8 | 10 => Waveform::Square,
            // pipe, synth pad
            9 | 11 => Waveform::Sine,
            _ => Waveform::Triangle,
        }
    }
}

pub trait Envelope {
    fn get_envelope(&self, duration: Duration, end: Option<&Duration>) -> f32;
}

#[derive(Debug, Clone, Copy)]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Envelope for Adsr {
    fn get_envelope(&self, duration: Duration, end: Option<&Duration>) -> f32 {
        let current_time = duration.as_secs_f32();
        let calc = |t: f32| {
            if t < self.attack {
                t / self.attack
            } else if t < self.attack + self.decay {
                1.0 - (t - self.attack) / self.decay * (1.0 - self.sustain)
            } else {
                self.sustain
            }
        };
        match end {
            Some(end) => {
                let end_time = end.as_secs_f32();
                if current_time < end_time {
                    calc(current_time)
                } else if current_time - end_time < self.release {
                    (1.0 - (current_time - end_time) / self.release) * calc(end_time)
                } else {
                    0.0
                }
            }
            None => calc(current_time),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    volume: Volume,
    amp: Adsr,
    freq_offset: f32,
}

const DEFAULT_ADSR: Adsr = Adsr {
    attack: 0.01,
    decay: 1.0,
    sustain: 0.5,
    release: 0.3,
};

impl Oscillator {
    pub fn new(volume: Volume) -> Self {
        Oscillator {
            waveform: Waveform::Triangle,
            volume,
            amp: DEFAULT_ADSR,
            freq_offset: 0.0,
        }
    }

    /// An oscillator detuned by `freq_offset` Hz, for thickening the main one.
    pub fn detuned(volume: Volume, freq_offset: f32) -> Self {
        Oscillator {
            freq_offset,
            ..Oscillator::new(volume)
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn release(&self) -> f32 {
        self.amp.release
    }

    fn waveform_make_sample(&self, duration: Duration, freq: f32) -> Frame {
        let phase = duration.as_secs_f64() * freq as f64 * 2.0 * PI;
        match self.waveform {
            Waveform::Sine => phase.sin() as f32,
            Waveform::Square => {
                if phase.sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => (phase.sin().asin() * 2.0 / PI) as f32,
        }
    }

    pub fn make_sample(&self, duration: Duration, end: Option<&Duration>, freq: f32) -> Frame {
        self.waveform_make_sample(duration, freq + self.freq_offset)
            * self.amp.get_envelope(duration, end)
            * self.volume.get_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADSR: Adsr = Adsr {
        attack: 0.1,
        decay: 0.1,
        sustain: 0.5,
        release: 0.2,
    };

    #[test]
    fn envelope_stages() {
        let at = Duration::from_secs_f32;
        assert!((ADSR.get_envelope(at(0.05), None) - 0.5).abs() < 1e-4);
        assert!((ADSR.get_envelope(at(0.1), None) - 1.0).abs() < 1e-4);
        assert!((ADSR.get_envelope(at(0.5), None) - 0.5).abs() < 1e-4);

        let end = at(0.5);
        assert!((ADSR.get_envelope(at(0.6), Some(&end)) - 0.25).abs() < 1e-4);
        assert_eq!(ADSR.get_envelope(at(0.8), Some(&end)), 0.0);
    }

    #[test]
    fn waveforms_stay_in_range() {
        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Square] {
            let mut osc = Oscillator::new(Volume::FULL);
            osc.set_waveform(waveform);
            for i in 0..200 {
                let t = Duration::from_secs_f32(0.2 + i as f32 / 1000.0);
                let s = osc.make_sample(t, None, 110.0);
                assert!((-1.0..=1.0).contains(&s), "{waveform:?} {s}");
            }
        }
    }

    #[test]
    fn instrument_families_pick_waveforms() {
        assert_eq!(
            Waveform::for_instrument(Instrument::ACOUSTIC_GRAND_PIANO),
            Waveform::Triangle
        );
        assert_eq!(Waveform::for_instrument(Instrument::new(19).unwrap()), Waveform::Square);
        assert_eq!(Waveform::for_instrument(Instrument::new(89).unwrap()), Waveform::Sine);
    }
}
