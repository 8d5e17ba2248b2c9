//! Terminal UI for `voct play`
//!
//! Keyboard CV and buttons go to the audio thread through lock-free queues;
//! output samples and a status snapshot come back the same way.

pub mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use voct_dsp::patch::{control::PatchHandle, ButtonId};

pub use state::{AudioStatus, KeyboardCv, SessionInfo};

use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// UI-side ends of the control queues.
pub struct Controls {
    pub cv_tx: Producer<f32>,
    pub quantizer: PatchHandle,
    pub oscillator: PatchHandle,
}

pub struct UiApp {
    session: SessionInfo,
    controls: Controls,
    audio_rx: Consumer<f32>,
    status_rx: Consumer<AudioStatus>,
    status: AudioStatus,
    audio_buffer: Vec<f32>,
    cv: KeyboardCv,
    gate: bool,
    hold: bool,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        session: SessionInfo,
        controls: Controls,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<AudioStatus>,
    ) -> Self {
        Self {
            session,
            controls,
            audio_rx,
            status_rx,
            status: AudioStatus::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            cv: KeyboardCv::default(),
            gate: false,
            hold: false,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE output samples.
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => self.step_cv(1),
            KeyCode::Down => self.step_cv(-1),
            KeyCode::Right => self.step_cv(12),
            KeyCode::Left => self.step_cv(-12),
            KeyCode::Char(' ') => {
                if self.controls.oscillator.button(ButtonId::A, !self.gate) {
                    self.gate = !self.gate;
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                if self.controls.quantizer.button(ButtonId::A, !self.hold) {
                    self.hold = !self.hold;
                }
            }
            _ => {}
        }
    }

    /// The displayed CV only moves once the audio thread has been sent it.
    fn step_cv(&mut self, semitones: i32) {
        let mut next = self.cv;
        next.step(semitones);
        if self.controls.cv_tx.push(next.volts()).is_ok() {
            self.cv = next;
        } else {
            log::debug!("cv queue full, dropping update");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Scope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(
            frame,
            chunks[0],
            &self.session,
            self.cv.volts(),
            self.gate,
            &self.status,
            &stats,
        );

        render_waveform(
            frame,
            chunks[1],
            &self.audio_buffer,
            self.status.envelope_level,
        );

        let help = Paragraph::new(
            " [Q] Quit  [↑/↓] Semitone  [←/→] Octave  [Space] Gate  [H] Hold",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;
    use voct_dsp::patch::{control::SharedPatch, OscillatorPatch, QuantizerPatch};

    fn app_with_cv_queue(capacity: usize) -> (UiApp, Consumer<f32>) {
        let (cv_tx, cv_rx) = RingBuffer::<f32>::new(capacity);
        let (_quantizer, quantizer) = SharedPatch::new(QuantizerPatch::default());
        let (_oscillator, oscillator) = SharedPatch::new(OscillatorPatch::new(48_000.0));
        let (_, audio_rx) = RingBuffer::<f32>::new(1);
        let (_, status_rx) = RingBuffer::<AudioStatus>::new(1);

        let session = SessionInfo {
            sample_rate: 48_000.0,
            channels: 2,
            block_size: 128,
        };
        let controls = Controls {
            cv_tx,
            quantizer,
            oscillator,
        };
        (UiApp::new(session, controls, audio_rx, status_rx), cv_rx)
    }

    #[test]
    fn cv_only_advances_when_the_update_is_queued() {
        let (mut app, mut cv_rx) = app_with_cv_queue(1);

        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert!((app.cv.volts() - 1.0 / 12.0).abs() < 1e-6);

        assert_eq!(cv_rx.pop().ok(), Some(1.0 / 12.0));
        app.handle_key(KeyCode::Right);
        assert!((app.cv.volts() - 13.0 / 12.0).abs() < 1e-6);
        assert_eq!(cv_rx.pop().ok(), Some(13.0 / 12.0));
    }
}
