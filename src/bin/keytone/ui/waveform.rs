//! Output oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Plot the newest output samples, scaled so the square wave's peaks sit
/// just inside the frame.
pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    scope: &[f32],
    amplitude: i16,
    sample_rate: u32,
) {
    let window_ms = scope.len() as f64 * 1000.0 / sample_rate as f64;
    let block = Block::default()
        .title(format!(" Output ({window_ms:.0} ms) "))
        .borders(Borders::ALL);

    let peak = (amplitude as f64 / i16::MAX as f64) * 1.1;

    let data: Vec<(f64, f64)> = scope
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, scope.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-peak, peak])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
