//! Keytone - audio setup and the input loop

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use keytone::{
    resolve,
    synth::{channel, ToneCommand, ToneHandle, ToneRenderer},
    EngineConfig, MAX_BLOCK_SIZE, MAX_CHORD_SIZE,
};

use super::keyboard::KeyboardState;
use super::ui::{self, SCOPE_LEN};

/// Command ring slots between the input loop and the audio callback.
const COMMAND_CAPACITY: usize = 64;
/// Scope ring capacity, in samples.
const SCOPE_RING_LEN: usize = SCOPE_LEN * 16;

/// Options fixed for the session
pub struct Settings {
    pub duration: f64,
    pub amplitude: i16,
    pub octave_shift: i32,
    pub queue_capacity: usize,
}

pub struct Keytone {
    settings: Settings,
}

impl Keytone {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Open the audio device and play until Esc
    pub fn run(self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = supported.sample_rate().0;
        let config = EngineConfig::default()
            .with_sample_rate(sample_rate)
            .with_amplitude(self.settings.amplitude)
            .with_queue_capacity(self.settings.queue_capacity);
        let (handle, renderer) =
            channel(config, COMMAND_CAPACITY).wrap_err("invalid engine configuration")?;

        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_LEN);
        let stream_config: cpal::StreamConfig = supported.config();

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, renderer, scope_tx),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, renderer, scope_tx),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, renderer, scope_tx),
            other => Err(eyre!("unsupported sample format {other:?}")),
        }?;
        stream.play().wrap_err("failed to start output stream")?;

        info!(
            sample_rate,
            channels = stream_config.channels,
            "audio stream started"
        );

        // Key-up events need the kitty keyboard protocol
        let release_events = supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            debug!("terminal reports no key releases, tones run for their full duration");
        }

        let mut session = Session {
            handle,
            keyboard: KeyboardState::new(self.settings.octave_shift),
            duration: self.settings.duration,
            release_events,
            scope_rx,
            scope: vec![0.0; SCOPE_LEN],
            sounding: Vec::new(),
            should_quit: false,
        };
        let res = session.run(terminal, sample_rate);

        if release_events {
            execute!(std::io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        drop(stream);
        res
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: ToneRenderer<Consumer<ToneCommand>>,
    mut scope_tx: Producer<f32>,
) -> EyreResult<cpal::Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let channels = config.channels as usize;
    // Buffer reused by the audio callback
    let mut render_buf = vec![0i16; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_remaining = total_frames - frames_written;
                    let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    renderer.render(block);

                    // Duplicate mono to all channels and write to device
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let value = T::from_sample(s);
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = value;
                        }
                    }

                    // Feed the scope, dropping the remainder if the UI falls behind
                    for &s in block.iter() {
                        if let Err(PushError::Full(_)) = scope_tx.push(f32::from_sample(s)) {
                            break;
                        }
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    Ok(stream)
}

/// Input loop state
struct Session {
    handle: ToneHandle,
    keyboard: KeyboardState,
    duration: f64,
    release_events: bool,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    /// Notes and frequencies of the last chord sent
    sounding: Vec<(String, f64)>,
    should_quit: bool,
}

impl Session {
    fn run(&mut self, terminal: &mut DefaultTerminal, sample_rate: u32) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| {
                ui::render(
                    frame,
                    &ui::View {
                        sample_rate,
                        amplitude: self.handle.config().amplitude,
                        octave_shift: self.keyboard.octave_shift(),
                        sounding: &self.sounding,
                        dropped: self.handle.dropped_commands(),
                        release_events: self.release_events,
                        scope: &self.scope,
                    },
                )
            })?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        // Leave nothing ringing after exit
        if let Err(err) = self.handle.clear_all() {
            warn!(%err, "could not silence tones on exit");
        }
        Ok(())
    }

    /// Keep the newest SCOPE_LEN samples
    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_LEN {
            let excess = self.scope.len() - SCOPE_LEN;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.kind) {
            (KeyCode::Esc, KeyEventKind::Press) => self.should_quit = true,
            (KeyCode::Up, KeyEventKind::Press) => self.shift_octave(1),
            (KeyCode::Down, KeyEventKind::Press) => self.shift_octave(-1),
            (KeyCode::Char(c), KeyEventKind::Press) => {
                if !self.release_events {
                    // Momentary: sound the key alone for its full duration
                    if self.keyboard.press(c) {
                        self.play_held();
                        self.keyboard.release(c);
                    }
                } else if self.keyboard.press(c) {
                    self.play_held();
                }
            }
            // Held keys keep the tone going
            (KeyCode::Char(_), KeyEventKind::Repeat) => self.play_held(),
            (KeyCode::Char(c), KeyEventKind::Release) => {
                if self.keyboard.release(c) {
                    self.key_up();
                }
            }
            _ => {}
        }
    }

    fn shift_octave(&mut self, delta: i32) {
        self.keyboard.shift_octave(delta);
        if !self.keyboard.is_empty() {
            self.play_held();
        }
    }

    fn key_up(&mut self) {
        if !self.keyboard.is_empty() {
            // retrigger replaces the head in one command
            self.play_held();
            return;
        }

        if let Err(err) = self.handle.clear_pending() {
            warn!(%err, "could not cut tone");
        }
        self.sounding.clear();
    }

    /// Resolve the held chord and replace whatever is sounding with it
    fn play_held(&mut self) {
        let mut notes = self.keyboard.chord();
        if notes.is_empty() {
            return;
        }
        if notes.len() > MAX_CHORD_SIZE {
            warn!(held = notes.len(), "chord truncated to {MAX_CHORD_SIZE} notes");
            notes.truncate(MAX_CHORD_SIZE);
        }

        let frequencies = resolve(&notes);
        match self.handle.retrigger(&frequencies, self.duration) {
            Ok(()) => {
                self.sounding = notes
                    .iter()
                    .map(ToString::to_string)
                    .zip(frequencies)
                    .collect();
            }
            Err(err) => warn!(%err, "tone not queued"),
        }
    }
}
