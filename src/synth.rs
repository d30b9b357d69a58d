//! Small procedural synthesizer: oscillators with a gain envelope, mixed
//! into whatever buffer the output stream hands us.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};
use strum_macros::{Display, EnumIter};

/// Voices beyond this are dropped oldest-first.
pub const MAX_VOICES: usize = 48;

/// C4 E4 G4 C5 G4 E4
pub const MELODY: [f32; 6] = [261.63, 329.63, 392.00, 523.25, 392.00, 329.63];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

impl Waveform {
    /// Sample at `phase` in `[0, 1)`.
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// Linear rise from silence to `peak` over `attack`, then an exponential
/// fall to `floor` at `duration`. Silent before zero and after `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub peak: f32,
    pub floor: f32,
    pub duration: f32,
}

impl Envelope {
    pub fn gain(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration || self.peak <= 0.0 {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * t / self.attack;
        }
        let decay = (self.duration - self.attack).max(f32::EPSILON);
        let progress = (t - self.attack) / decay;
        self.peak * (self.floor.max(f32::EPSILON) / self.peak).powf(progress)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_freq: f32,
    pub end_freq: f32,
    pub envelope: Envelope,
    pub delay: f32,
    elapsed: f32,
    phase: f32,
}

impl Voice {
    pub fn new(waveform: Waveform, freq: f32, envelope: Envelope) -> Self {
        Self {
            waveform,
            start_freq: freq,
            end_freq: freq,
            envelope,
            delay: 0.0,
            elapsed: 0.0,
            phase: 0.0,
        }
    }

    /// Exponential frequency glide to `end_freq` over the voice's duration.
    pub fn sweep_to(mut self, end_freq: f32) -> Self {
        self.end_freq = end_freq;
        self
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Pointer click: pitch and loudness follow the wheel's speed.
    pub fn tick(pitch_hz: f32, intensity: f32) -> Self {
        Voice::new(
            Waveform::Sine,
            pitch_hz,
            Envelope {
                attack: 0.0,
                peak: 0.08 * intensity.clamp(0.0, 1.0),
                floor: 0.01,
                duration: 0.05,
            },
        )
        .sweep_to(40.0)
    }

    /// One plucky note of the spinning arpeggio.
    pub fn chiptune_note(freq: f32) -> Self {
        Voice::new(
            Waveform::Square,
            freq,
            Envelope {
                attack: 0.0,
                peak: 0.04,
                floor: 0.001,
                duration: 0.12,
            },
        )
    }

    /// A4 C#5 E5 A5 arpeggio played when a winner is picked.
    pub fn fanfare() -> Vec<Voice> {
        [(440.0, 0.0, 0.2), (554.37, 0.15, 0.2), (659.25, 0.3, 0.2), (880.0, 0.45, 0.6)]
            .iter()
            .map(|&(freq, delay, duration)| {
                Voice::new(
                    Waveform::Triangle,
                    freq,
                    Envelope {
                        attack: 0.05,
                        peak: 0.2,
                        floor: 0.01,
                        duration,
                    },
                )
                .delayed(delay)
            })
            .collect()
    }

    pub fn frequency_at(&self, t: f32) -> f32 {
        if self.start_freq == self.end_freq || self.start_freq <= 0.0 || self.end_freq <= 0.0 {
            return self.start_freq;
        }
        let progress = (t / self.envelope.duration).clamp(0.0, 1.0);
        self.start_freq * (self.end_freq / self.start_freq).powf(progress)
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let t = self.elapsed - self.delay;
        self.elapsed += 1.0 / sample_rate;
        if t < 0.0 {
            return 0.0;
        }
        let value = self.waveform.sample(self.phase) * self.envelope.gain(t);
        self.phase = (self.phase + self.frequency_at(t) / sample_rate).fract();
        value
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.envelope.duration
    }
}

struct MixerState {
    voices: Vec<Voice>,
    volume: f32,
    muted: bool,
}

/// Shared voice pool. Clones refer to the same pool.
#[derive(Clone)]
pub struct Mixer {
    state: Arc<Mutex<MixerState>>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MixerState {
                voices: Vec::new(),
                volume: 1.0,
                muted: false,
            })),
        }
    }
}

impl Mixer {
    pub fn play(&self, voice: Voice) {
        match self.state.lock() {
            Ok(mut state) => {
                if state.muted {
                    return;
                }
                if state.voices.len() >= MAX_VOICES {
                    state.voices.remove(0);
                }
                state.voices.push(voice);
            }
            Err(e) => log::error!("Failed to lock mixer: {}", e),
        }
    }

    pub fn play_all(&self, voices: impl IntoIterator<Item = Voice>) {
        for voice in voices {
            self.play(voice);
        }
    }

    pub fn set_volume(&self, volume: f32) {
        if let Ok(mut state) = self.state.lock() {
            state.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn set_muted(&self, muted: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.muted = muted;
            if muted {
                state.voices.clear();
            }
        }
    }

    pub fn active_voices(&self) -> usize {
        self.state.lock().map(|state| state.voices.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.voices.clear();
        }
    }

    /// Fills an interleaved buffer, writing the same signal to every channel.
    pub fn render(&self, data: &mut [f32], channels: usize, sample_rate: f32) {
        let channels = channels.max(1);
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to lock mixer: {}", e);
                data.fill(0.0);
                return;
            }
        };
        let volume = state.volume;
        for frame in data.chunks_mut(channels) {
            let mixed: f32 = state
                .voices
                .iter_mut()
                .map(|voice| voice.next_sample(sample_rate))
                .sum();
            let value = (mixed * volume).clamp(-1.0, 1.0);
            frame.fill(value);
        }
        state.voices.retain(|voice| !voice.is_finished());
    }
}
