/// A General-MIDI program id, `0..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instrument(u8);

impl Instrument {
    pub const ACOUSTIC_GRAND_PIANO: Instrument = Instrument(1);
    pub const OVERDRIVEN_GUITAR: Instrument = Instrument(30);
    pub const DISTORTION_GUITAR: Instrument = Instrument(31);

    pub fn new(id: u8) -> Option<Self> {
        (id <= 0x7F).then_some(Instrument(id))
    }

    pub fn id(self) -> u8 {
        self.0
    }

    /// The instrument actually sent to the device. Distortion guitar is
    /// swapped for the overdriven one.
    pub fn playable(self) -> Self {
        if self == Self::DISTORTION_GUITAR {
            Self::OVERDRIVEN_GUITAR
        } else {
            self
        }
    }

    /// General-MIDI family, eight programs each (pianos, chromatic
    /// percussion, organs, guitars, ...).
    pub fn family(self) -> u8 {
        self.0 / 8
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::ACOUSTIC_GRAND_PIANO
    }
}
