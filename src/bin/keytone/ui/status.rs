//! Status bar and sounding-notes widgets

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

/// Sample rate, octave shift, key-release support, dropped commands
pub fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" keytone ").borders(Borders::ALL);

    // e.g. 44100 -> "44.1kHz"
    let sample_rate_khz = view.sample_rate as f64 / 1000.0;

    let (mode, mode_color) = if view.release_events {
        ("held keys sustain", Color::Green)
    } else {
        ("momentary (no key-up)", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            format!(" {sample_rate_khz:.1}kHz  "),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Octave {:+}  ", view.octave_shift),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{mode}  "), Style::default().fg(mode_color)),
    ];

    if view.dropped > 0 {
        spans.push(Span::styled(
            format!("{} dropped", view.dropped),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// The chord last sent to the engine, reference frequency first
pub fn render_notes(frame: &mut Frame, area: Rect, sounding: &[(String, f64)]) {
    let block = Block::default().title(" Notes ").borders(Borders::ALL);

    let line = if sounding.is_empty() {
        Line::from(Span::styled(" -", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(
            sounding
                .iter()
                .enumerate()
                .map(|(i, (name, freq))| {
                    let color = if i == 0 { Color::LightYellow } else { Color::LightCyan };
                    Span::styled(format!(" {name} {freq:.2}Hz "), Style::default().fg(color))
                })
                .collect::<Vec<_>>(),
        )
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}
