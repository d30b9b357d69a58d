//! Side effects bound to the spin lifecycle: pointer clicks, the music loop
//! while spinning, and the fanfare on a win.

use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread::{spawn, JoinHandle},
    time::{Duration, Instant},
};

use crate::{
    settings::AudioSettings,
    spin::{SpinObserver, SpinResult, TickEvent},
    synth::{Mixer, Voice, MELODY},
};

/// How long the pointer stays deflected after a click.
pub const POINTER_FLICK: Duration = Duration::from_millis(50);
/// Pointer deflection in degrees while flicked.
pub const POINTER_FLICK_DEG: f32 = -15.0;

/// Background thread queueing one melody note per interval until stopped.
/// Dropping it stops the thread.
#[derive(Default)]
pub struct MusicLoop {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MusicLoop {
    pub fn start(&mut self, mixer: Mixer, interval: Duration) {
        self.stop();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        self.handle = Some(spawn(move || {
            let mut note = 0;
            loop {
                mixer.play(Voice::chiptune_note(MELODY[note]));
                note = (note + 1) % MELODY.len();
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }));
        self.stop_tx = Some(stop_tx);
        log::debug!("Music loop started ({:?} per note)", interval);
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // the thread may already be gone; joining below is enough
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Music loop thread panicked");
            } else {
                log::debug!("Music loop stopped");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for MusicLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The observer the app hands to the simulator.
pub struct SpinFeedback {
    mixer: Mixer,
    settings: AudioSettings,
    music: MusicLoop,
    last_tick: Option<Instant>,
    ticks: u32,
}

impl SpinFeedback {
    pub fn new(mixer: Mixer, settings: AudioSettings) -> Self {
        mixer.set_volume(settings.volume);
        mixer.set_muted(!settings.enabled);
        Self {
            mixer,
            settings,
            music: MusicLoop::default(),
            last_tick: None,
            ticks: 0,
        }
    }

    pub fn set_settings(&mut self, settings: AudioSettings) {
        self.mixer.set_volume(settings.volume);
        self.mixer.set_muted(!settings.enabled);
        if !settings.enabled || !settings.music {
            self.music.stop();
        }
        self.settings = settings;
    }

    pub fn is_music_running(&self) -> bool {
        self.music.is_running()
    }

    /// Ticks heard during the current (or last) spin.
    pub fn tick_count(&self) -> u32 {
        self.ticks
    }

    /// Pointer rotation in degrees for this frame.
    pub fn pointer_deflection(&self) -> f32 {
        match self.last_tick {
            Some(at) if at.elapsed() < POINTER_FLICK => POINTER_FLICK_DEG,
            _ => 0.0,
        }
    }

    /// Stops everything running in the background.
    pub fn shutdown(&mut self) {
        self.music.stop();
        self.mixer.clear();
    }
}

impl Default for SpinFeedback {
    fn default() -> Self {
        Self::new(Mixer::default(), AudioSettings::default())
    }
}

impl SpinObserver for SpinFeedback {
    fn on_spin_start(&mut self) {
        self.ticks = 0;
        if self.settings.enabled && self.settings.music {
            self.music.start(
                self.mixer.clone(),
                Duration::from_millis(self.settings.music_interval_ms.max(20)),
            );
        }
    }

    fn on_tick(&mut self, tick: &TickEvent) {
        self.ticks += 1;
        self.last_tick = Some(Instant::now());
        if self.settings.enabled && self.settings.ticks {
            self.mixer
                .play(Voice::tick(tick.pitch_hz() as f32, tick.intensity() as f32));
        }
    }

    fn on_spin_end(&mut self, result: &SpinResult) {
        self.music.stop();
        log::info!(
            "Winner: {} after {} ticks",
            result.winning_item.label,
            self.ticks
        );
        if self.settings.enabled && self.settings.fanfare {
            self.mixer.play_all(Voice::fanfare());
        }
    }
}

impl Drop for SpinFeedback {
    fn drop(&mut self) {
        self.shutdown();
    }
}
