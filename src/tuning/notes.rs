#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/*
Note Descriptors
================

A descriptor is (letter, accidental, octave), written compactly as three
characters: "Cn3" is C natural in octave 3, "As4" is A sharp in octave 4.

Each letter has a fixed octave-0 base frequency, just below the audible range:

  C 16.351598   D 18.354048   E 20.601722   F 21.826765
  G 24.499715   A 27.5        B 30.867706

Octave n doubles the base n times:      f = base * 2^n
A sharp raises by one semitone:         f = f * 2^(1/12)

So A3 = 27.5 * 8 = 220 Hz and A#3 = 220 * 1.0594630... ≈ 233.08 Hz.

Only sharps exist. Any accidental character other than 's'/'S' reads as
natural. A letter outside C..B resolves to 0 Hz instead of failing, which keeps
a chord aligned with the keys that produced it.
*/

/// Multiplicative step between adjacent equal-tempered pitches, 2^(1/12).
pub const SEMITONE_RATIO: f64 = 1.059463077981413;

/// Highest octave a descriptor can carry (single digit).
pub const MAX_OCTAVE: u8 = 9;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
}

impl Accidental {
    pub fn from_char(c: char) -> Self {
        match c {
            's' | 'S' => Accidental::Sharp,
            _ => Accidental::Natural,
        }
    }

    fn as_char(self) -> char {
        match self {
            Accidental::Natural => 'n',
            Accidental::Sharp => 's',
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteDescriptor {
    pub letter: char,
    pub accidental: Accidental,
    pub octave: u8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteParseError {
    #[error("note descriptor must be three characters, got {0:?}")]
    Length(String),

    #[error("octave must be a single digit, got {0:?}")]
    Octave(char),
}

impl NoteDescriptor {
    pub const fn new(letter: char, accidental: Accidental, octave: u8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    pub const fn natural(letter: char, octave: u8) -> Self {
        Self::new(letter, Accidental::Natural, octave)
    }

    pub const fn sharp(letter: char, octave: u8) -> Self {
        Self::new(letter, Accidental::Sharp, octave)
    }

    /// Fundamental frequency in Hz, or 0.0 for an unknown letter.
    pub fn frequency(&self) -> f64 {
        let Some(base) = base_frequency(self.letter) else {
            return 0.0;
        };

        let tone = base * 2.0_f64.powi(self.octave as i32);
        match self.accidental {
            Accidental::Natural => tone,
            Accidental::Sharp => tone * SEMITONE_RATIO,
        }
    }

    /// Shift by whole octaves. `None` if the result leaves `0..=MAX_OCTAVE`.
    pub fn transpose_octaves(self, delta: i32) -> Option<Self> {
        let octave = self.octave as i32 + delta;
        if (0..=MAX_OCTAVE as i32).contains(&octave) {
            Some(Self {
                octave: octave as u8,
                ..self
            })
        } else {
            None
        }
    }
}

fn base_frequency(letter: char) -> Option<f64> {
    let base = match letter {
        'C' => 16.351598,
        'D' => 18.354048,
        'E' => 20.601722,
        'F' => 21.826765,
        'G' => 24.499715,
        'A' => 27.5,
        'B' => 30.867706,
        _ => return None,
    };
    Some(base)
}

impl FromStr for NoteDescriptor {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(letter), Some(accidental), Some(octave), None) =
            (chars.next(), chars.next(), chars.next(), chars.next())
        else {
            return Err(NoteParseError::Length(s.to_string()));
        };

        let octave = octave
            .to_digit(10)
            .ok_or(NoteParseError::Octave(octave))? as u8;

        Ok(Self::new(letter, Accidental::from_char(accidental), octave))
    }
}

impl fmt::Display for NoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter, self.accidental.as_char(), self.octave)
    }
}

/// Resolve descriptors to frequencies, one output per input, in order.
pub fn resolve(descriptors: &[NoteDescriptor]) -> Vec<f64> {
    descriptors.iter().map(NoteDescriptor::frequency).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn a3_is_220() {
        let freqs = resolve(&[NoteDescriptor::natural('A', 3)]);
        assert_relative_eq!(freqs[0], 220.0);
    }

    #[test]
    fn a_sharp_3_is_one_semitone_up() {
        let freqs = resolve(&[NoteDescriptor::sharp('A', 3)]);
        assert_relative_eq!(freqs[0], 220.0 * SEMITONE_RATIO);
        assert_relative_eq!(freqs[0], 233.08, epsilon = 0.01);
    }

    #[test]
    fn octaves_double() {
        let c3 = NoteDescriptor::natural('C', 3).frequency();
        let c4 = NoteDescriptor::natural('C', 4).frequency();
        assert_relative_eq!(c4, c3 * 2.0);
        assert_relative_eq!(NoteDescriptor::natural('C', 0).frequency(), 16.351598);
    }

    #[test]
    fn semitone_ratio_is_twelfth_root_of_two() {
        assert_relative_eq!(SEMITONE_RATIO.powi(12), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_letter_keeps_alignment() {
        let freqs = resolve(&[
            NoteDescriptor::natural('C', 4),
            NoteDescriptor::sharp('H', 4),
            NoteDescriptor::natural('E', 4),
        ]);
        assert_eq!(freqs.len(), 3);
        assert_eq!(freqs[1], 0.0);
        assert!(freqs[0] > 0.0 && freqs[2] > 0.0);
    }

    #[test]
    fn parses_three_character_form() {
        let note: NoteDescriptor = "Cs3".parse().unwrap();
        assert_eq!(note, NoteDescriptor::sharp('C', 3));

        let note: NoteDescriptor = "An4".parse().unwrap();
        assert_eq!(note, NoteDescriptor::natural('A', 4));

        // anything but s/S is natural
        let note: NoteDescriptor = "Gx5".parse().unwrap();
        assert_eq!(note.accidental, Accidental::Natural);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "C3".parse::<NoteDescriptor>(),
            Err(NoteParseError::Length("C3".into()))
        );
        assert_eq!(
            "Cn34".parse::<NoteDescriptor>(),
            Err(NoteParseError::Length("Cn34".into()))
        );
        assert_eq!(
            "Cnx".parse::<NoteDescriptor>(),
            Err(NoteParseError::Octave('x'))
        );
    }

    #[test]
    fn display_matches_parse_form() {
        assert_eq!(NoteDescriptor::sharp('F', 4).to_string(), "Fs4");
        assert_eq!(NoteDescriptor::natural('B', 5).to_string(), "Bn5");
    }

    #[test]
    fn transpose_stays_within_single_digit_octaves() {
        let c3 = NoteDescriptor::natural('C', 3);
        assert_eq!(c3.transpose_octaves(2), Some(NoteDescriptor::natural('C', 5)));
        assert_eq!(c3.transpose_octaves(-3), Some(NoteDescriptor::natural('C', 0)));
        assert_eq!(c3.transpose_octaves(-4), None);
        assert_eq!(c3.transpose_octaves(7), None);
    }
}
