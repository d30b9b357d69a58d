use eframe::egui::{self, Context};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    app::WheelApp,
    spin::{DecelerationTier, SpinPhysics},
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    pub volume: f32,
    pub ticks: bool,
    pub music: bool,
    pub fanfare: bool,
    pub music_interval_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.8,
            ticks: true,
            music: true,
            fanfare: true,
            music_interval_ms: 140,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub physics: SpinPhysics,
    pub audio: AudioSettings,
}

pub const SETTINGS_WINDOW_SIZE: [f32; 2] = [320.0, 480.0];

fn audio_ui(ui: &mut egui::Ui, audio: &mut AudioSettings) {
    ui.checkbox(&mut audio.enabled, "Sound");
    ui.add_enabled_ui(audio.enabled, |ui| {
        ui.add(egui::Slider::new(&mut audio.volume, 0.0..=1.0).text("Volume"));
        ui.checkbox(&mut audio.ticks, "Pointer clicks");
        ui.checkbox(&mut audio.music, "Music while spinning");
        ui.checkbox(&mut audio.fanfare, "Fanfare on win");
        ui.add_enabled(
            audio.music,
            egui::Slider::new(&mut audio.music_interval_ms, 60..=400).text("ms per note"),
        );
    });
}

fn physics_ui(ui: &mut egui::Ui, physics: &mut SpinPhysics) {
    ui.horizontal(|ui| {
        ui.label("Launch speed:");
        ui.add(
            egui::DragValue::new(&mut physics.initial_velocity_min)
                .range(0.05..=physics.initial_velocity_max)
                .speed(0.01),
        );
        ui.label("to");
        ui.add(
            egui::DragValue::new(&mut physics.initial_velocity_max)
                .range(physics.initial_velocity_min..=2.0)
                .speed(0.01),
        );
    });

    egui::Grid::new("deceleration_grid")
        .striped(true)
        .min_col_width(80.0)
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Tier").strong());
            ui.label(egui::RichText::new("Below").strong());
            ui.label(egui::RichText::new("Factor").strong());
            ui.end_row();

            for tier in DecelerationTier::iter() {
                ui.label(tier.to_string());
                match tier {
                    DecelerationTier::Coast => ui.label("-"),
                    DecelerationTier::Brake => ui.add(
                        egui::DragValue::new(&mut physics.coast_threshold)
                            .range(physics.brake_threshold..=0.5)
                            .speed(0.001),
                    ),
                    DecelerationTier::Snap => ui.add(
                        egui::DragValue::new(&mut physics.brake_threshold)
                            .range(physics.min_velocity..=physics.coast_threshold)
                            .speed(0.001),
                    ),
                };
                let factor = match tier {
                    DecelerationTier::Coast => &mut physics.coast_factor,
                    DecelerationTier::Brake => &mut physics.brake_factor,
                    DecelerationTier::Snap => &mut physics.snap_factor,
                };
                ui.add(egui::Slider::new(factor, 0.5..=0.999));
                ui.end_row();
            }
        });

    ui.horizontal(|ui| {
        ui.label("Stop below:");
        ui.add(
            egui::DragValue::new(&mut physics.min_velocity)
                .range(0.0001..=0.01)
                .speed(0.0001),
        );
    });
}

impl WheelApp {
    pub fn settings_ui(&mut self, ctx: &Context) {
        if !self.show_settings {
            return;
        }
        let mut open = self.show_settings;
        let mut settings = self.settings;
        let spinning = self.wheel.is_spinning();
        let device = self.audio_manager.device_name();
        egui::Window::new("Settings")
            .default_size(SETTINGS_WINDOW_SIZE)
            .open(&mut open)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Audio");
                ui.separator();
                match &device {
                    Some(name) => ui.label(format!("Output: {}", name)),
                    None => ui.colored_label(egui::Color32::YELLOW, "No output device"),
                };
                audio_ui(ui, &mut settings.audio);

                ui.add_space(15.0);
                ui.heading("Spin");
                ui.separator();
                ui.add_enabled_ui(!spinning, |ui| {
                    physics_ui(ui, &mut settings.physics);
                    ui.add_space(10.0);
                    if ui.button("Restore defaults").clicked() {
                        settings.physics = SpinPhysics::default();
                    }
                });
            });
        self.show_settings = open;

        if settings != self.settings {
            self.apply_settings(settings);
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        if settings.audio != self.settings.audio {
            self.feedback.set_settings(settings.audio);
            self.settings.audio = settings.audio;
        }
        if settings.physics != self.settings.physics {
            match self.wheel.set_physics(settings.physics) {
                Ok(()) => self.settings.physics = settings.physics,
                Err(e) => log::warn!("Physics not applied: {}", e),
            }
        }
    }
}
