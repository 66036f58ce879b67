//! Note names to fundamental frequencies.
//!
//! Everything here is pure and allocation-light, safe to call from any thread.

pub mod notes;

pub use notes::{resolve, Accidental, NoteDescriptor, NoteParseError, MAX_OCTAVE, SEMITONE_RATIO};
