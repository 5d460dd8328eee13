use std::collections::HashMap;
use std::hash::Hash;

use crate::note::{SimpleNote, Velocity};
use crate::pitch::Pitch;

/// Static table from an input key to the note it plays.
#[derive(Debug, Clone)]
pub struct KeyToNoteMap<K> {
    notes: HashMap<K, SimpleNote>,
}

impl<K: Eq + Hash + Copy> KeyToNoteMap<K> {
    pub fn new() -> Self {
        KeyToNoteMap {
            notes: HashMap::new(),
        }
    }

    pub fn with(mut self, key: K, note: SimpleNote) -> Self {
        self.notes.insert(key, note);
        self
    }

    /// The note for `key`, or a rest when nothing is mapped to it.
    pub fn resolve(&self, key: K) -> SimpleNote {
        self.notes.get(&key).copied().unwrap_or_default()
    }

    /// Applies one velocity to every mapped note.
    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        for note in self.notes.values_mut() {
            *note = note.with_velocity(velocity);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl<K: Eq + Hash + Copy> Default for KeyToNoteMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

const QWERTY: [(char, Pitch, i8); 25] = [
    ('z', Pitch::C, 3),
    ('s', Pitch::CSharp, 3),
    ('x', Pitch::D, 3),
    ('d', Pitch::DSharp, 3),
    ('c', Pitch::E, 3),
    ('v', Pitch::F, 3),
    ('g', Pitch::FSharp, 3),
    ('b', Pitch::G, 3),
    ('h', Pitch::GSharp, 3),
    ('n', Pitch::A, 3),
    ('j', Pitch::ASharp, 3),
    ('m', Pitch::B, 3),
    ('q', Pitch::C, 4),
    ('2', Pitch::CSharp, 4),
    ('w', Pitch::D, 4),
    ('3', Pitch::DSharp, 4),
    ('e', Pitch::E, 4),
    ('r', Pitch::F, 4),
    ('5', Pitch::FSharp, 4),
    ('t', Pitch::G, 4),
    ('6', Pitch::GSharp, 4),
    ('y', Pitch::A, 4),
    ('7', Pitch::ASharp, 4),
    ('u', Pitch::B, 4),
    ('i', Pitch::C, 5),
];

impl KeyToNoteMap<char> {
    /// Two chromatic octaves on the lower and upper letter rows, from C3,
    /// plus C5 on `i`. Keys are lowercase characters.
    pub fn qwerty() -> Self {
        QWERTY
            .iter()
            .fold(KeyToNoteMap::new(), |map, &(key, pitch, octave)| {
                map.with(key, SimpleNote::new(pitch, octave))
            })
    }
}
