// Purpose: tone queue, sample generation, and the control/audio thread bridge
// The engine itself is single-threaded; the handle/renderer pair splits it
// across threads with a lock-free command ring.

pub mod engine;
pub mod event;
#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod renderer;

#[cfg(feature = "rtrb")]
pub use handle::{channel, ToneHandle};
pub use message::{CommandReceiver, ToneCommand};
pub use renderer::ToneRenderer;
