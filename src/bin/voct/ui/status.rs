//! Status bar - pitch, envelope, hold state and audio levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{AudioStatus, SessionInfo};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &SessionInfo,
    cv_volts: f32,
    gate: bool,
    status: &AudioStatus,
    stats: &AudioStats,
) {
    let block = Block::default().title(" voct ").borders(Borders::ALL);

    let gate_style = Style::default().fg(if gate { Color::Green } else { Color::DarkGray });
    let hold_style = Style::default().fg(if status.holding {
        Color::Yellow
    } else {
        Color::DarkGray
    });

    let line = Line::from(vec![
        Span::styled(
            format!(" CV {cv_volts:+.3}V → {:+.3}V  ", status.quantized_volts),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{:.2} Hz  ", status.frequency),
            Style::default().fg(Color::White),
        ),
        Span::styled(if gate { "● GATE  " } else { "○ gate  " }, gate_style),
        Span::styled(if status.holding { "■ HOLD  " } else { "□ hold  " }, hold_style),
        Span::styled(
            format!("Env: {:.2}  ", status.envelope_level),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(
            format!(
                "{:.1}kHz {}ch /{}  ",
                session.sample_rate / 1000.0,
                session.channels,
                session.block_size
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_full_scale_square() {
        let stats = AudioStats::from_buffer(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(stats.peak, 1.0);
        assert!((stats.rms - 1.0).abs() < 1e-6);

        let empty = AudioStats::from_buffer(&[]);
        assert_eq!(empty.peak, 0.0);
    }
}
