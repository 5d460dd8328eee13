use std::fmt;

use pitch_calc::Step;

/// Lowest octave the encoder understands.
pub const OCTAVE_MIN: i8 = -1;
/// Highest octave the encoder understands.
pub const OCTAVE_MAX: i8 = 9;

const SEMITONES_PER_OCTAVE: i16 = 12;

/// A pitch spelling as written on a key label.
///
/// Every spelling has a fixed two character form (`"C-"`, `"C#"`, `"Db"`, ...)
/// where `-` marks a natural. Enharmonic spellings are kept apart so that
/// `Cb` and `B#` can cross the octave boundary the way they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pitch {
    BSharp,
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    FFlat,
    ESharp,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
    CFlat,
    Rest,
}

impl Pitch {
    /// Every sounding spelling, in enharmonic table order.
    pub const ALL: [Pitch; 21] = [
        Pitch::BSharp,
        Pitch::C,
        Pitch::CSharp,
        Pitch::DFlat,
        Pitch::D,
        Pitch::DSharp,
        Pitch::EFlat,
        Pitch::E,
        Pitch::FFlat,
        Pitch::ESharp,
        Pitch::F,
        Pitch::FSharp,
        Pitch::GFlat,
        Pitch::G,
        Pitch::GSharp,
        Pitch::AFlat,
        Pitch::A,
        Pitch::ASharp,
        Pitch::BFlat,
        Pitch::B,
        Pitch::CFlat,
    ];

    /// Parses a spelling. Matching is case-sensitive and anything that is not
    /// one of the known spellings is a rest.
    pub fn parse(spelling: &str) -> Pitch {
        match spelling {
            "B#" => Pitch::BSharp,
            "C-" => Pitch::C,
            "C#" => Pitch::CSharp,
            "Db" => Pitch::DFlat,
            "D-" => Pitch::D,
            "D#" => Pitch::DSharp,
            "Eb" => Pitch::EFlat,
            "E-" => Pitch::E,
            "Fb" => Pitch::FFlat,
            "E#" => Pitch::ESharp,
            "F-" => Pitch::F,
            "F#" => Pitch::FSharp,
            "Gb" => Pitch::GFlat,
            "G-" => Pitch::G,
            "G#" => Pitch::GSharp,
            "Ab" => Pitch::AFlat,
            "A-" => Pitch::A,
            "A#" => Pitch::ASharp,
            "Bb" => Pitch::BFlat,
            "B-" => Pitch::B,
            "Cb" => Pitch::CFlat,
            _ => Pitch::Rest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pitch::BSharp => "B#",
            Pitch::C => "C-",
            Pitch::CSharp => "C#",
            Pitch::DFlat => "Db",
            Pitch::D => "D-",
            Pitch::DSharp => "D#",
            Pitch::EFlat => "Eb",
            Pitch::E => "E-",
            Pitch::FFlat => "Fb",
            Pitch::ESharp => "E#",
            Pitch::F => "F-",
            Pitch::FSharp => "F#",
            Pitch::GFlat => "Gb",
            Pitch::G => "G-",
            Pitch::GSharp => "G#",
            Pitch::AFlat => "Ab",
            Pitch::A => "A-",
            Pitch::ASharp => "A#",
            Pitch::BFlat => "Bb",
            Pitch::B => "B-",
            Pitch::CFlat => "Cb",
            Pitch::Rest => "R-",
        }
    }

    pub fn is_rest(self) -> bool {
        self == Pitch::Rest
    }

    /// Position inside the octave, 1 for C through 12 for B. `None` for a rest.
    pub fn semitone(self) -> Option<u8> {
        let n = match self {
            Pitch::BSharp | Pitch::C => 1,
            Pitch::CSharp | Pitch::DFlat => 2,
            Pitch::D => 3,
            Pitch::DSharp | Pitch::EFlat => 4,
            Pitch::E | Pitch::FFlat => 5,
            Pitch::ESharp | Pitch::F => 6,
            Pitch::FSharp | Pitch::GFlat => 7,
            Pitch::G => 8,
            Pitch::GSharp | Pitch::AFlat => 9,
            Pitch::A => 10,
            Pitch::ASharp | Pitch::BFlat => 11,
            Pitch::B | Pitch::CFlat => 12,
            Pitch::Rest => return None,
        };
        Some(n)
    }

    /// Octave correction for spellings that sit across the B/C boundary.
    fn octave_shift(self) -> i16 {
        match self {
            Pitch::CFlat => -1,
            Pitch::BSharp => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A MIDI note number in `0..=127`, where 0 doubles as "rest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NoteNumber(u8);

impl NoteNumber {
    pub const REST: NoteNumber = NoteNumber(0);
    pub const MAX: NoteNumber = NoteNumber(127);

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX.0).then_some(NoteNumber(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_rest(self) -> bool {
        self == Self::REST
    }

    /// Equal tempered frequency of the note.
    pub fn hz(self) -> f32 {
        Step(self.0 as f32).to_hz().hz()
    }
}

impl From<NoteNumber> for u8 {
    fn from(note: NoteNumber) -> Self {
        note.0
    }
}

/// Encodes a pitch and octave into a note number.
///
/// Octaves are clamped to [`OCTAVE_MIN`]..=[`OCTAVE_MAX`]. Spellings that
/// land outside the MIDI range (`G#9` and above, `Cb-1`) encode as a rest,
/// as does the rest spelling itself.
pub fn encode(pitch: Pitch, octave: i8) -> NoteNumber {
    let Some(semitone) = pitch.semitone() else {
        return NoteNumber::REST;
    };
    let n = i16::from(semitone) - 1;
    let o = i16::from(octave.clamp(OCTAVE_MIN, OCTAVE_MAX)) + 1 + pitch.octave_shift();
    let value = n + o * SEMITONES_PER_OCTAVE;

    match u8::try_from(value).ok().and_then(NoteNumber::new) {
        Some(note) => note,
        None => {
            log::debug!("{}{} is outside the MIDI note range", pitch, octave);
            NoteNumber::REST
        }
    }
}
