use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::{debug, trace, warn};

use crate::{
    config::EngineConfig,
    synth::{
        engine::ToneEngine,
        event::{Chord, ToneEvent},
        message::ToneCommand,
        renderer::ToneRenderer,
    },
    EngineError, Result,
};

/// Build an engine and split it into a control handle and an audio renderer
/// joined by a lock-free command ring of `command_capacity` slots.
pub fn channel(
    config: EngineConfig,
    command_capacity: usize,
) -> Result<(ToneHandle, ToneRenderer<Consumer<ToneCommand>>)> {
    let engine = ToneEngine::new(config)?;
    if command_capacity == 0 {
        return Err(EngineError::InvalidConfig("command capacity must be non-zero"));
    }

    let (tx, rx) = RingBuffer::<ToneCommand>::new(command_capacity);
    let renderer = ToneRenderer::new(engine, rx);
    let handle = ToneHandle {
        tx,
        config,
        dropped: renderer.dropped_counter(),
        dropped_seen: 0,
    };

    debug!(
        sample_rate = config.sample_rate,
        queue_capacity = config.queue_capacity,
        command_capacity,
        "tone engine ready"
    );
    Ok((handle, renderer))
}

/// Application-thread side of the engine. Never blocks.
pub struct ToneHandle {
    tx: Producer<ToneCommand>,
    config: EngineConfig,
    dropped: Arc<AtomicU64>,
    dropped_seen: u64,
}

impl ToneHandle {
    pub fn enqueue_tone(&mut self, frequencies: &[f64], duration_seconds: f64) -> Result<()> {
        let event = self.event(frequencies, duration_seconds)?;
        trace!(?frequencies, samples = event.samples_remaining(), "enqueue tone");
        self.send(ToneCommand::Enqueue(event))
    }

    pub fn clear_pending(&mut self) -> Result<()> {
        trace!("clear pending tone");
        self.send(ToneCommand::ClearPending)
    }

    /// Cut the sounding tone and start `frequencies` in its place, as one step.
    pub fn retrigger(&mut self, frequencies: &[f64], duration_seconds: f64) -> Result<()> {
        let event = self.event(frequencies, duration_seconds)?;
        trace!(?frequencies, samples = event.samples_remaining(), "retrigger tone");
        self.send(ToneCommand::Retrigger(event))
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.send(ToneCommand::ClearAll)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Commands the audio thread had to drop so far.
    pub fn dropped_commands(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn event(&self, frequencies: &[f64], duration_seconds: f64) -> Result<ToneEvent> {
        let chord = Chord::new(frequencies)?;
        Ok(ToneEvent::new(chord, self.config.samples_for(duration_seconds)))
    }

    fn send(&mut self, command: ToneCommand) -> Result<()> {
        let dropped = self.dropped_commands();
        if dropped > self.dropped_seen {
            warn!(
                dropped = dropped - self.dropped_seen,
                capacity = self.config.queue_capacity,
                "tone queue full, commands dropped"
            );
            self.dropped_seen = dropped;
        }

        match self.tx.push(command) {
            Ok(()) => Ok(()),
            Err(PushError::Full(_)) => {
                warn!("command ring full, tone command rejected");
                Err(EngineError::CommandQueueFull)
            }
        }
    }
}
