use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::synth::{engine::ToneEngine, message::CommandReceiver};

/// Audio-thread side of the engine.
///
/// Owns the [`ToneEngine`] outright; the only way to reach it from another
/// thread is through commands on the receiver.
pub struct ToneRenderer<R: CommandReceiver> {
    engine: ToneEngine,
    rx: R,
    dropped: Arc<AtomicU64>,
}

impl<R: CommandReceiver> ToneRenderer<R> {
    pub fn new(engine: ToneEngine, rx: R) -> Self {
        Self {
            engine,
            rx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Apply every pending command, then fill `out` completely.
    pub fn render(&mut self, out: &mut [i16]) {
        while let Some(command) = self.rx.pop() {
            if self.engine.apply(command).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.engine.generate(out);
    }

    pub fn engine(&self) -> &ToneEngine {
        &self.engine
    }

    /// Commands the engine refused because its queue was full.
    pub fn dropped_commands(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[cfg(feature = "rtrb")]
    pub(crate) fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}
