//! TUI for keytone
//!
//! Status line, the notes currently sounding, an oscilloscope of the output,
//! and the usage instructions.

mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use status::{render_notes, render_status};
use waveform::render_waveform;

/// Scope window, in samples
pub const SCOPE_LEN: usize = 1024;

/// Everything one frame needs, borrowed from the input loop
pub struct View<'a> {
    pub sample_rate: u32,
    pub amplitude: i16,
    pub octave_shift: i32,
    pub sounding: &'a [(String, f64)],
    pub dropped: u64,
    pub release_events: bool,
    pub scope: &'a [f32],
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Length(3), // Sounding notes
            Constraint::Min(8),    // Waveform
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    render_status(frame, chunks[0], view);
    render_notes(frame, chunks[1], view.sounding);
    render_waveform(frame, chunks[2], view.scope, view.amplitude, view.sample_rate);

    let help = Paragraph::new(
        " Keys: 1 - C3, q - C#3, a - D3, z - D#3, 2 - E3, etc. up to B5 on '.'\n \
         [Up/Down] Octave  [Esc] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
