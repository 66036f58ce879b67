pub mod config;
pub mod dsp;
pub mod synth; // Tone queue, engine and the cross-thread bridge
pub mod tuning; // Note names to frequencies

pub use config::EngineConfig;
pub use synth::{engine::ToneEngine, event::Chord, event::ToneEvent};
pub use tuning::{resolve, Accidental, NoteDescriptor};

/// Largest block the front-end renders per callback slice.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Maximum number of simultaneously sounding frequencies in one tone event.
pub const MAX_CHORD_SIZE: usize = 16;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_AMPLITUDE: i16 = 24_000;

/// Errors raised by the tone engine and its control handle.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("a tone needs at least one frequency")]
    EmptyChord,

    #[error("chord of {0} frequencies exceeds the limit of {MAX_CHORD_SIZE}")]
    ChordTooLarge(usize),

    #[error("frequency {0} Hz is not a finite, non-negative value")]
    InvalidFrequency(f64),

    #[error("tone queue is full ({0} events)")]
    QueueFull(usize),

    #[error("command ring is full")]
    CommandQueueFull,
}

pub type Result<T> = std::result::Result<T, EngineError>;
