//! keytone - play square-wave tones from the computer keyboard
//!
//! Run with: cargo run -- --duration 0.1

mod app;
mod keyboard;
mod ui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult};
use tracing_subscriber::EnvFilter;

use app::{Keytone, Settings};

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Play square-wave tones from the computer keyboard.",
    long_about = "Play square-wave tones from the computer keyboard.\n\n\
        Keys: 1 - C3, q - C#3, a - D3, z - D#3, 2 - E3, etc.\n\
        The notes go up to B5 on the '.' key. Up/Down shift the octave.\n\
        Press Esc to exit."
)]
struct Cli {
    /// Seconds a key press sounds for unless released or retriggered first.
    #[clap(long, default_value_t = 0.1)]
    duration: f64,

    /// Peak sample magnitude, out of 32767.
    #[clap(long, default_value_t = keytone::DEFAULT_AMPLITUDE)]
    amplitude: i16,

    /// Initial octave shift applied to every key.
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    octave: i32,

    /// Maximum number of queued tone events.
    #[clap(long, default_value_t = 64)]
    queue_capacity: usize,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    // stderr only, and quiet by default: stdout belongs to the TUI
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !(cli.duration.is_finite() && cli.duration > 0.0) {
        return Err(eyre!("--duration must be a positive number of seconds"));
    }

    let settings = Settings {
        duration: cli.duration,
        amplitude: cli.amplitude,
        octave_shift: cli.octave,
        queue_capacity: cli.queue_capacity,
    };

    let mut terminal = ratatui::init();
    let res = Keytone::new(settings).run(&mut terminal);
    ratatui::restore();
    res
}
