use std::time::Duration;

use crate::{
    audio::AudioManager,
    capitalize_first_letter,
    error::SpinError,
    feedback::{SpinFeedback, POINTER_FLICK},
    item::ItemList,
    settings::Settings,
    spin::{SpinResult, WheelState},
    widgets,
};

use eframe::egui::{self, Direction, Modifiers};
use egui::Align2;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use serde::{Deserialize, Serialize};

// UI and window size constants
pub const MAIN_WINDOW_SIZE: [f32; 2] = [960.0, 720.0];
pub const ABOUT_WINDOW_SIZE: [f32; 2] = [320.0, 480.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [480.0, 360.0];
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct WheelApp {
    pub items: ItemList,
    pub settings: Settings,
    pub show_about: bool,
    pub show_settings: bool,
    #[serde(skip)]
    pub wheel: WheelState,
    #[serde(skip)]
    pub feedback: SpinFeedback,
    #[serde(skip)]
    pub audio_manager: AudioManager,
    #[serde(skip)]
    pub winner: Option<SpinResult>,
    #[serde(skip)]
    pub new_item_label: String,
    #[serde(skip)]
    pub toasts: Toasts,
}

impl Default for WheelApp {
    fn default() -> Self {
        Self {
            items: ItemList::default(),
            settings: Settings::default(),
            show_about: false,
            show_settings: false,
            wheel: WheelState::default(),
            feedback: SpinFeedback::default(),
            audio_manager: AudioManager::default(),
            winner: None,
            new_item_label: String::new(),
            toasts: Toasts::new()
                .anchor(Align2::CENTER_TOP, (0.0, 10.0))
                .direction(Direction::TopDown),
        }
    }
}

impl WheelApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = cc
            .storage
            .and_then(|storage| eframe::get_value::<WheelApp>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.init();
        app
    }

    /// Wires the persisted list and settings into the live wheel and audio.
    fn init(&mut self) {
        if let Err(e) = self.wheel.set_items(self.items.items().to_vec()) {
            log::error!("Stored item list rejected ({}), restoring defaults", e);
            self.items.reset();
            if let Err(e) = self.wheel.set_items(self.items.items().to_vec()) {
                log::error!("Default item list rejected: {}", e);
            }
        }
        if let Err(e) = self.wheel.set_physics(self.settings.physics) {
            log::error!("Stored physics rejected: {}", e);
        }
        self.audio_manager.start();
        self.feedback = SpinFeedback::new(self.audio_manager.mixer(), self.settings.audio);
        log::info!(
            "Wheel ready with {} items, audio {}",
            self.items.len(),
            if self.audio_manager.is_active() { "on" } else { "off" }
        );
    }

    pub fn spin(&mut self) {
        match self.wheel.begin_spin(&mut rand::rng(), &mut self.feedback) {
            Ok(()) => self.winner = None,
            Err(e) => self.report(&e),
        }
    }

    /// Pushes the item list into the wheel after an edit.
    pub fn sync_items(&mut self) {
        if let Err(e) = self.wheel.set_items(self.items.items().to_vec()) {
            self.report(&e);
        }
    }

    fn step(&mut self, ctx: &egui::Context) {
        if !self.wheel.is_spinning() {
            return;
        }
        if let Some(result) = self.wheel.step_frame(&mut self.feedback) {
            self.success_toast(&format!("{} wins!", result.winning_item.label));
            self.winner = Some(result);
        }
        ctx.request_repaint();
    }

    pub fn report(&mut self, error: &SpinError) {
        if error.is_precondition_violation() {
            log::warn!("{}", error);
            self.warning_toast(&capitalize_first_letter(&error.to_string()));
        } else {
            log::error!("{}", error);
            self.error_toast(&capitalize_first_letter(&error.to_string()));
        }
    }

    fn file_menu_button(&mut self, ui: &mut egui::Ui) {
        let close_shortcut = egui::KeyboardShortcut::new(Modifiers::CTRL, egui::Key::Q);
        let spin_shortcut = egui::KeyboardShortcut::new(Modifiers::NONE, egui::Key::Space);
        if ui.input_mut(|i| i.consume_shortcut(&close_shortcut)) {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if !ui.ctx().wants_keyboard_input()
            && ui.input_mut(|i| i.consume_shortcut(&spin_shortcut))
            && !self.wheel.is_spinning()
        {
            self.spin();
        }

        ui.menu_button("File", |ui| {
            ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
            if ui
                .add_enabled(
                    !self.wheel.is_spinning(),
                    egui::Button::new("Spin")
                        .shortcut_text(ui.ctx().format_shortcut(&spin_shortcut)),
                )
                .clicked()
            {
                self.spin();
                ui.close_menu();
            }
            if ui.add(egui::Button::new("Settings")).clicked() {
                self.show_settings = true;
                ui.close_menu();
            }
            if ui
                .add(
                    egui::Button::new("Quit")
                        .shortcut_text(ui.ctx().format_shortcut(&close_shortcut)),
                )
                .clicked()
            {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                ui.close_menu();
            }
        });
    }

    fn help_menu_button(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Help", |ui| {
            ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
            if ui.add(egui::Button::new("About")).clicked() {
                self.show_about = true;
                ui.close_menu();
            }
        });
    }

    fn update_ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.file_menu_button(ui);
                self.help_menu_button(ui);
            });
        });
        egui::SidePanel::right("item_panel")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                self.item_list_ui(ui);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.spin_button(ui);
                ui.add_space(8.0);
                let snapshot = self.wheel.snapshot();
                let deflection = self.feedback.pointer_deflection();
                let response = widgets::wheel(ui, self.wheel.items(), &snapshot, deflection);
                if response.clicked() && !snapshot.spinning {
                    self.spin();
                }
                if deflection != 0.0 {
                    ctx.request_repaint_after(POINTER_FLICK);
                }
            });
        });
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        if self.show_about {
            egui::Window::new("About")
                .default_width(ABOUT_WINDOW_SIZE[0])
                .default_height(ABOUT_WINDOW_SIZE[1])
                .open(&mut self.show_about)
                .resizable([true, false])
                .show(ctx, |ui| {
                    ui.heading(capitalize_first_letter(env!("CARGO_PKG_NAME")));
                    ui.add_space(8.0);
                    ui.label(env!("CARGO_PKG_DESCRIPTION"));
                    ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                    ui.label(format!("Author: {}", env!("CARGO_PKG_AUTHORS")));
                    ui.hyperlink_to("Github", env!("CARGO_PKG_REPOSITORY"));
                });
        }
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }

    fn toast_template(&mut self, text: &str, kind: ToastKind) -> Toast {
        Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(3.0)
                .show_progress(true),
            ..Default::default()
        }
    }

    pub fn success_toast(&mut self, text: &str) {
        let toast = self.toast_template(text, ToastKind::Success);
        self.toasts.add(toast);
    }

    pub fn error_toast(&mut self, text: &str) {
        let toast = self.toast_template(text, ToastKind::Error);
        self.toasts.add(toast);
    }

    pub fn warning_toast(&mut self, text: &str) {
        let toast = self.toast_template(text, ToastKind::Warning);
        self.toasts.add(toast);
    }
}

impl eframe::App for WheelApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(feature = "puffin")]
        puffin::GlobalProfiler::lock().new_frame();
        self.step(ctx);
        self.update_ui(ctx);
        self.show_about_window(ctx);
        self.winner_window(ctx);
        self.settings_ui(ctx);
        self.show_toasts(ctx);
    }
}
