use std::f64::consts::TAU;

/*
Sign-of-Sine Square Oscillator
==============================

The instrument's only timbre: a sinusoid hard-clipped to its sign.

  +A ┐  ┌───┐   ┌───┐
     │  │   │   │   │
  -A └──┘   └───┘   └──→ time

Phase
-----

`phase` counts reference cycles of sample time. After k samples of a tone with
reference frequency f0, phase has grown by k * f0, so

    angle = phase * 2π / sample_rate * (f / f0)
          = 2π * f * (k / sample_rate)

which is the textbook sine argument for frequency f. Every voice of a chord
reads the same accumulator through its own ratio f / f0.

The accumulator is never wrapped and never reset between tones, so the waveform
stays continuous across buffer boundaries and note changes. f64 keeps the
precision loss negligible over an interactive session.

The angle is evaluated left to right exactly as written above. At half-cycle
points sin() lands within an ulp of zero, so a reordered product (say a
precomputed 2π / sample_rate) flips the sign of those samples.

Output
------

sin(angle) > 0  → +amplitude
otherwise       → -amplitude   (so phase 0 starts low)

A zero frequency, either the voice or the reference, is a silent placeholder
and renders 0.
*/

pub struct SquareOscillator {
    phase: f64,
    sample_rate: f64,
    amplitude: i16,
}

impl SquareOscillator {
    pub fn new(sample_rate: u32, amplitude: i16) -> Self {
        Self {
            phase: 0.0,
            sample_rate: sample_rate as f64,
            amplitude,
        }
    }

    /// Sample for `frequency` against the chord's `reference` at the current phase.
    #[inline]
    pub fn sample(&self, frequency: f64, reference: f64) -> i16 {
        if frequency == 0.0 || reference == 0.0 {
            return 0;
        }

        let angle = self.phase * TAU / self.sample_rate * (frequency / reference);
        if angle.sin() > 0.0 {
            self.amplitude
        } else {
            -self.amplitude
        }
    }

    /// Move the shared phase forward by one sample of the reference frequency.
    #[inline]
    pub fn advance(&mut self, reference: f64) {
        self.phase += reference;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn amplitude(&self) -> i16 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn starts_low_at_zero_phase() {
        let osc = SquareOscillator::new(44_100, 100);
        assert_eq!(osc.sample(440.0, 440.0), -100);
    }

    #[test]
    fn follows_sign_of_sine() {
        let sample_rate = 48_000;
        let freq = 1_000.0;
        let mut osc = SquareOscillator::new(sample_rate, 1);

        for n in 0..96 {
            let phase = n as f64 * freq;
            let expected = (phase * 2.0 * PI / sample_rate as f64 * (freq / freq)).sin();
            let expected = if expected > 0.0 { 1 } else { -1 };
            assert_eq!(osc.sample(freq, freq), expected, "sample {n}");
            osc.advance(freq);
        }
    }

    #[test]
    fn half_cycle_points_match_textbook_formula() {
        // 440 Hz at 44.1kHz: slot 11025 lands on exactly 110 whole cycles
        let mut osc = SquareOscillator::new(44_100, 1);
        for _ in 0..11_025 {
            osc.advance(440.0);
        }
        let expected = (osc.phase() * 2.0 * PI / 44_100.0 * 1.0).sin();
        let expected = if expected > 0.0 { 1 } else { -1 };
        assert_eq!(osc.sample(440.0, 440.0), expected);
    }

    #[test]
    fn advance_accumulates_reference() {
        let mut osc = SquareOscillator::new(44_100, 1);
        osc.advance(220.0);
        osc.advance(220.0);
        assert_eq!(osc.phase(), 440.0);
    }

    #[test]
    fn zero_frequency_is_silent() {
        let mut osc = SquareOscillator::new(44_100, 1000);
        osc.advance(123.0);
        assert_eq!(osc.sample(0.0, 440.0), 0);
        assert_eq!(osc.sample(440.0, 0.0), 0);
    }
}
