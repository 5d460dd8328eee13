use std::fmt;

use crate::pitch::{encode, NoteNumber, Pitch};

pub type Velocity = u8;

pub const MAX_VELOCITY: Velocity = 0x7F;

/// A note as resolved from a key press: spelling, octave and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleNote {
    pitch: Pitch,
    octave: i8,
    velocity: Velocity,
}

impl SimpleNote {
    pub fn new(pitch: Pitch, octave: i8) -> Self {
        SimpleNote {
            pitch,
            octave,
            velocity: MAX_VELOCITY,
        }
    }

    /// The note of a key with nothing mapped to it.
    pub fn rest() -> Self {
        SimpleNote::new(Pitch::Rest, 0)
    }

    pub fn with_velocity(self, velocity: Velocity) -> Self {
        SimpleNote {
            velocity: velocity.min(MAX_VELOCITY),
            ..self
        }
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_rest()
    }

    pub fn number(&self) -> NoteNumber {
        encode(self.pitch, self.octave)
    }
}

impl Default for SimpleNote {
    fn default() -> Self {
        SimpleNote::rest()
    }
}

impl fmt::Display for SimpleNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch.as_str().replace('-', " "), self.octave)
    }
}
