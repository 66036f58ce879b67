#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::event::ToneEvent;

/// Control messages sent from the application thread to the audio thread.
///
/// Each command is applied whole between two `generate` calls, so a
/// `Retrigger` is never observed half done.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ToneCommand {
    Enqueue(ToneEvent),
    ClearPending,
    /// Drop the head, then enqueue: the key-down path.
    Retrigger(ToneEvent),
    ClearAll,
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<ToneCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<ToneCommand> {
    fn pop(&mut self) -> Option<ToneCommand> {
        Consumer::pop(self).ok()
    }
}
