use crate::{EngineError, Result, MAX_CHORD_SIZE};

/// Fixed-capacity list of simultaneously sounding frequencies.
///
/// Index 0 is the reference frequency: it sets how fast the shared phase
/// advances while the chord plays. Stored inline so a chord can cross to the
/// audio thread by copy, with no allocation on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    frequencies: [f64; MAX_CHORD_SIZE],
    len: usize,
}

impl Chord {
    pub fn new(frequencies: &[f64]) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(EngineError::EmptyChord);
        }
        if frequencies.len() > MAX_CHORD_SIZE {
            return Err(EngineError::ChordTooLarge(frequencies.len()));
        }
        if let Some(&bad) = frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(EngineError::InvalidFrequency(bad));
        }

        let mut stored = [0.0; MAX_CHORD_SIZE];
        stored[..frequencies.len()].copy_from_slice(frequencies);
        Ok(Self {
            frequencies: stored,
            len: frequencies.len(),
        })
    }

    pub fn reference(&self) -> f64 {
        self.frequencies[0]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.frequencies[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a chord with no frequencies.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl TryFrom<&[f64]> for Chord {
    type Error = EngineError;

    fn try_from(frequencies: &[f64]) -> Result<Self> {
        Self::new(frequencies)
    }
}

/// A queued request to sound a chord for a fixed number of output samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEvent {
    chord: Chord,
    samples_remaining: u64,
    /// Chord voice that fills the next output slot.
    next_voice: usize,
}

impl ToneEvent {
    pub fn new(chord: Chord, samples: u64) -> Self {
        Self {
            chord,
            samples_remaining: samples,
            next_voice: 0,
        }
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn samples_remaining(&self) -> u64 {
        self.samples_remaining
    }

    pub fn is_finished(&self) -> bool {
        self.samples_remaining == 0
    }

    pub(crate) fn next_voice(&self) -> usize {
        self.next_voice
    }

    /// Record `produced` samples, leaving the voice cursor at `next_voice`.
    pub(crate) fn consume(&mut self, produced: u64, next_voice: usize) {
        debug_assert!(produced <= self.samples_remaining);
        self.samples_remaining -= produced;
        self.next_voice = next_voice;
    }
}
