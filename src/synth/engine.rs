use std::collections::VecDeque;

use crate::{
    config::EngineConfig,
    dsp::SquareOscillator,
    synth::{
        event::{Chord, ToneEvent},
        message::ToneCommand,
    },
    EngineError, Result,
};

/*
Tone Engine
===========

A FIFO of tone events drained by a pull-based audio callback.

    enqueue_tone ──→ [ head | e1 | e2 | ... ] ──→ generate(out)
                        ↑
    clear_pending ──────┘ (drops the head only)

Each `generate` call fills its buffer exactly:

    ┌─ head: n samples ─┬─ next: m samples ─┬─ silence ──────┐
    └───────────────────┴───────────────────┴────────────────┘

Events are consumed in order. The head's remaining count goes down by however
many slots it filled; it is popped the moment it reaches zero. An empty queue
fills the rest of the buffer with 0.

Chords
------

A chord of k voices does not mix. Each output slot takes ONE voice, cycling
through the chord, and every slot advances the shared phase by the reference
(first) frequency:

    slot:   0    1    2    3    4    5
    voice:  f0   f1   f0   f1   f0   f1      (k = 2)
    phase:  0    f0   2f0  3f0  4f0  5f0

Each voice is therefore heard at 1/k of the output rate. The voice cursor lives
on the event so the pattern continues across buffer boundaries.

Realtime rules
--------------

`generate` never allocates and never blocks. Events are `Copy`, the deque is
sized once at construction, and `push` refuses to grow it.
*/

pub struct ToneEngine {
    config: EngineConfig,
    queue: VecDeque<ToneEvent>,
    osc: SquareOscillator,
}

impl ToneEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            queue: VecDeque::with_capacity(config.queue_capacity),
            osc: SquareOscillator::new(config.sample_rate, config.amplitude),
        })
    }

    /// Queue `frequencies` to sound for `duration_seconds`, after everything
    /// already queued.
    pub fn enqueue_tone(&mut self, frequencies: &[f64], duration_seconds: f64) -> Result<()> {
        let chord = Chord::new(frequencies)?;
        self.push(self.event(chord, duration_seconds))
    }

    /// Build an event sized for this engine's sample rate.
    pub fn event(&self, chord: Chord, duration_seconds: f64) -> ToneEvent {
        ToneEvent::new(chord, self.config.samples_for(duration_seconds))
    }

    pub fn push(&mut self, event: ToneEvent) -> Result<()> {
        if self.queue.len() >= self.config.queue_capacity {
            return Err(EngineError::QueueFull(self.config.queue_capacity));
        }
        self.queue.push_back(event);
        Ok(())
    }

    /// Cut the head event short, whatever it has left. Later events stay.
    pub fn clear_pending(&mut self) {
        self.queue.pop_front();
    }

    pub fn clear_all(&mut self) {
        self.queue.clear();
    }

    /// Apply a control command. Only a push can fail (queue full).
    pub fn apply(&mut self, command: ToneCommand) -> Result<()> {
        match command {
            ToneCommand::Enqueue(event) => self.push(event),
            ToneCommand::ClearPending => {
                self.clear_pending();
                Ok(())
            }
            ToneCommand::Retrigger(event) => {
                self.clear_pending();
                self.push(event)
            }
            ToneCommand::ClearAll => {
                self.clear_all();
                Ok(())
            }
        }
    }

    /// Fill `out` completely from the queue, padding with silence.
    pub fn generate(&mut self, out: &mut [i16]) {
        let mut pos = 0;

        while pos < out.len() {
            let Some(head) = self.queue.front_mut() else {
                out[pos..].fill(0);
                return;
            };

            if head.is_finished() {
                self.queue.pop_front();
                continue;
            }

            let owed = usize::try_from(head.samples_remaining()).unwrap_or(usize::MAX);
            let n = (out.len() - pos).min(owed);

            let voices = head.chord().as_slice();
            let reference = head.chord().reference();
            let mut voice = head.next_voice();

            for slot in &mut out[pos..pos + n] {
                *slot = self.osc.sample(voices[voice], reference);
                self.osc.advance(reference);
                voice = (voice + 1) % voices.len();
            }

            head.consume(n as u64, voice);
            pos += n;

            if head.is_finished() {
                self.queue.pop_front();
            }
        }
    }

    /// Shared oscillator phase, in reference cycles of sample time.
    pub fn phase(&self) -> f64 {
        self.osc.phase()
    }

    /// Number of queued events, including a partially played head.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn head(&self) -> Option<&ToneEvent> {
        self.queue.front()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn engine() -> ToneEngine {
        ToneEngine::new(EngineConfig::default()).unwrap()
    }

    fn non_silent(buffer: &[i16]) -> usize {
        buffer.iter().filter(|&&s| s != 0).count()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig::default().with_sample_rate(0);
        assert!(ToneEngine::new(config).is_err());
    }

    #[test]
    fn idle_generate_is_silent_and_keeps_phase() {
        let mut engine = engine();
        let mut buffer = vec![7i16; 512];

        for _ in 0..3 {
            engine.generate(&mut buffer);
            assert!(buffer.iter().all(|&s| s == 0));
            assert_eq!(engine.phase(), 0.0);
        }
    }

    #[test]
    fn drains_tone_across_buffers() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 0.1).unwrap();
        assert_eq!(engine.head().unwrap().samples_remaining(), 4410);

        let mut buffer = vec![0i16; 2048];
        engine.generate(&mut buffer);
        assert_eq!(non_silent(&buffer), 2048);
        engine.generate(&mut buffer);
        assert_eq!(non_silent(&buffer), 2048);
        assert_eq!(engine.head().unwrap().samples_remaining(), 314);

        let mut tail = vec![0i16; 314];
        engine.generate(&mut tail);
        assert_eq!(non_silent(&tail), 314);
        assert!(engine.is_idle());

        let mut after = vec![1i16; 100];
        engine.generate(&mut after);
        assert!(after.iter().all(|&s| s == 0));
    }

    #[test]
    fn tone_shorter_than_buffer_is_padded() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 100.0 / 44_100.0).unwrap();

        let mut buffer = vec![0i16; 256];
        engine.generate(&mut buffer);
        assert_eq!(non_silent(&buffer[..100]), 100);
        assert!(buffer[100..].iter().all(|&s| s == 0));
        assert!(engine.is_idle());
    }

    #[test]
    fn consecutive_events_play_back_to_back() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 10.0 / 44_100.0).unwrap();
        engine.enqueue_tone(&[880.0], 20.0 / 44_100.0).unwrap();

        let mut buffer = vec![0i16; 64];
        engine.generate(&mut buffer);
        assert_eq!(non_silent(&buffer[..30]), 30);
        assert!(buffer[30..].iter().all(|&s| s == 0));
        assert_eq!(engine.phase(), 10.0 * 440.0 + 20.0 * 880.0);
    }

    #[test]
    fn zero_duration_event_is_skipped() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 0.0).unwrap();
        engine.enqueue_tone(&[440.0], -1.0).unwrap();
        assert_eq!(engine.pending(), 2);

        let mut buffer = vec![5i16; 32];
        engine.generate(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0));
        assert!(engine.is_idle());
        assert_eq!(engine.phase(), 0.0);
    }

    #[test]
    fn clear_pending_drops_only_the_head() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 0.1).unwrap();
        engine.enqueue_tone(&[880.0], 0.1).unwrap();

        let mut buffer = vec![0i16; 100];
        engine.generate(&mut buffer);
        engine.clear_pending();

        assert_eq!(engine.pending(), 1);
        assert_eq!(engine.head().unwrap().chord().reference(), 880.0);
        assert_eq!(engine.head().unwrap().samples_remaining(), 4410);
    }

    #[test]
    fn clear_pending_on_empty_queue_is_noop() {
        let mut engine = engine();
        engine.clear_pending();
        assert!(engine.is_idle());
        assert_eq!(engine.phase(), 0.0);
    }

    #[test]
    fn retrigger_replaces_head_and_keeps_phase() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0], 0.1).unwrap();
        let mut buffer = vec![0i16; 64];
        engine.generate(&mut buffer);
        let phase = engine.phase();

        let event = engine.event(Chord::new(&[330.0]).unwrap(), 0.1);
        engine.apply(ToneCommand::Retrigger(event)).unwrap();
        assert_eq!(engine.pending(), 1);
        assert_eq!(engine.head().unwrap().chord().reference(), 330.0);

        engine.generate(&mut buffer);
        assert_eq!(engine.phase(), phase + 64.0 * 330.0);
    }

    #[test]
    fn queue_never_grows_past_capacity() {
        let config = EngineConfig::default().with_queue_capacity(2);
        let mut engine = ToneEngine::new(config).unwrap();
        engine.enqueue_tone(&[440.0], 0.1).unwrap();
        engine.enqueue_tone(&[440.0], 0.1).unwrap();
        assert_eq!(
            engine.enqueue_tone(&[440.0], 0.1),
            Err(EngineError::QueueFull(2))
        );
        assert_eq!(engine.pending(), 2);
    }

    #[test]
    fn enqueue_rejects_empty_chord() {
        let mut engine = engine();
        assert_eq!(engine.enqueue_tone(&[], 0.1), Err(EngineError::EmptyChord));
        assert!(engine.is_idle());
    }

    #[test]
    fn chord_interleaves_voices_per_slot() {
        let mut engine = engine();
        engine.enqueue_tone(&[220.0, 440.0], 0.05).unwrap();

        let mut buffer = vec![0i16; 1024];
        engine.generate(&mut buffer);

        let amplitude = 24_000;
        let mut phase = 0.0f64;
        for (i, &sample) in buffer.iter().enumerate() {
            let f = if i % 2 == 0 { 220.0 } else { 440.0 };
            let expected = if (phase * 2.0 * PI / 44_100.0 * (f / 220.0)).sin() > 0.0 {
                amplitude
            } else {
                -amplitude
            };
            assert_eq!(sample, expected, "slot {i}");
            phase += 220.0;
        }
    }

    #[test]
    fn chord_voice_cursor_survives_odd_buffer_split() {
        let mut split = engine();
        let mut whole = engine();
        for engine in [&mut split, &mut whole] {
            engine.enqueue_tone(&[220.0, 330.0, 440.0], 0.05).unwrap();
        }

        let mut a = vec![0i16; 7];
        let mut b = vec![0i16; 13];
        split.generate(&mut a);
        split.generate(&mut b);

        let mut c = vec![0i16; 20];
        whole.generate(&mut c);

        assert_eq!([a, b].concat(), c);
    }

    #[test]
    fn placeholder_voice_is_silent_but_counts() {
        let mut engine = engine();
        engine.enqueue_tone(&[440.0, 0.0], 8.0 / 44_100.0).unwrap();

        let mut buffer = vec![1i16; 8];
        engine.generate(&mut buffer);
        for (i, &sample) in buffer.iter().enumerate() {
            if i % 2 == 1 {
                assert_eq!(sample, 0);
            } else {
                assert_ne!(sample, 0);
            }
        }
        assert!(engine.is_idle());
    }

    #[test]
    fn phase_never_decreases() {
        let mut engine = engine();
        let mut last = engine.phase();
        let mut buffer = vec![0i16; 300];

        for (i, freq) in [110.0, 220.0, 55.0].into_iter().enumerate() {
            engine.enqueue_tone(&[freq], 0.01 * (i + 1) as f64).unwrap();
            for _ in 0..4 {
                engine.generate(&mut buffer);
                assert!(engine.phase() >= last);
                last = engine.phase();
            }
            engine.clear_pending();
        }
    }
}
