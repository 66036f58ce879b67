//! Low-level DSP primitives used by the tone engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the engine that runs on the audio thread.

/// Sign-of-sine square oscillator and its shared phase accumulator.
pub mod oscillator;

pub use oscillator::SquareOscillator;
