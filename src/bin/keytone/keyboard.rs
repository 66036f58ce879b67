//! Computer keyboard to note mapping and held-key state

use std::collections::BTreeSet;

use keytone::tuning::MAX_OCTAVE;
use keytone::NoteDescriptor;

/// Four keyboard rows, three columns per octave:
///
///   1 2 3 | 4 5 6 | 7 8 9
///   q w e | r t y | u i o
///   a s d | f g h | j k l
///   z x c | v b n | m , .
///   oct 3 | oct 4 | oct 5
///
/// Walking each column top to bottom, left to right, gives the chromatic scale.
const KEY_MAP: [(char, &str); 36] = [
    ('1', "Cn3"),
    ('q', "Cs3"),
    ('a', "Dn3"),
    ('z', "Ds3"),
    ('2', "En3"),
    ('w', "Fn3"),
    ('s', "Fs3"),
    ('x', "Gn3"),
    ('3', "Gs3"),
    ('e', "An3"),
    ('d', "As3"),
    ('c', "Bn3"),
    ('4', "Cn4"),
    ('r', "Cs4"),
    ('f', "Dn4"),
    ('v', "Ds4"),
    ('5', "En4"),
    ('t', "Fn4"),
    ('g', "Fs4"),
    ('b', "Gn4"),
    ('6', "Gs4"),
    ('y', "An4"),
    ('h', "As4"),
    ('n', "Bn4"),
    ('7', "Cn5"),
    ('u', "Cs5"),
    ('j', "Dn5"),
    ('m', "Ds5"),
    ('8', "En5"),
    ('i', "Fn5"),
    ('k', "Fs5"),
    (',', "Gn5"),
    ('9', "Gs5"),
    ('o', "An5"),
    ('l', "As5"),
    ('.', "Bn5"),
];

const LOWEST_MAPPED_OCTAVE: i32 = 3;
const HIGHEST_MAPPED_OCTAVE: i32 = 5;

/// Octave shift range that keeps every mapped key inside single-digit octaves.
pub const MIN_OCTAVE_SHIFT: i32 = -LOWEST_MAPPED_OCTAVE;
pub const MAX_OCTAVE_SHIFT: i32 = MAX_OCTAVE as i32 - HIGHEST_MAPPED_OCTAVE;

pub fn note_for(key: char) -> Option<NoteDescriptor> {
    let key = key.to_ascii_lowercase();
    KEY_MAP
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, note)| note.parse().ok())
}

/// Keys currently held plus the octave shift, owned by the input loop.
#[derive(Debug, Default)]
pub struct KeyboardState {
    /// Ordered by character code, which fixes chord order.
    held: BTreeSet<char>,
    octave_shift: i32,
}

impl KeyboardState {
    pub fn new(octave_shift: i32) -> Self {
        Self {
            held: BTreeSet::new(),
            octave_shift: octave_shift.clamp(MIN_OCTAVE_SHIFT, MAX_OCTAVE_SHIFT),
        }
    }

    /// Returns true when a mapped key goes from up to down.
    pub fn press(&mut self, key: char) -> bool {
        let key = key.to_ascii_lowercase();
        note_for(key).is_some() && self.held.insert(key)
    }

    /// Returns true when a held key goes up.
    pub fn release(&mut self, key: char) -> bool {
        self.held.remove(&key.to_ascii_lowercase())
    }

    pub fn shift_octave(&mut self, delta: i32) {
        self.octave_shift = (self.octave_shift + delta).clamp(MIN_OCTAVE_SHIFT, MAX_OCTAVE_SHIFT);
    }

    pub fn octave_shift(&self) -> i32 {
        self.octave_shift
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Notes for the held keys, lowest character code first.
    pub fn chord(&self) -> Vec<NoteDescriptor> {
        self.held
            .iter()
            .filter_map(|&key| note_for(key))
            .filter_map(|note| note.transpose_octaves(self.octave_shift))
            .collect()
    }
}
