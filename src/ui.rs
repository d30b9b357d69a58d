use eframe::egui::{self, Color32, RichText, Ui, Vec2};

use crate::{
    app::{WheelApp, MAIN_WINDOW_SIZE, MIN_WINDOW_SIZE},
    color::PALETTE,
    widgets::wheel_icon,
};

pub const ICON_SIZE: u32 = 64;
pub const WINNER_WINDOW_SIZE: [f32; 2] = [360.0, 220.0];
const SWATCH_SIZE: f32 = 16.0;

pub fn setup_eframe_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(MAIN_WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_icon(wheel_icon(ICON_SIZE, &PALETTE)),
        ..Default::default()
    }
}

impl WheelApp {
    pub fn spin_button(&mut self, ui: &mut Ui) {
        let spinning = self.wheel.is_spinning();
        let text = if spinning { "Spinning..." } else { "GO!" };
        let button = egui::Button::new(RichText::new(text).size(28.0).strong())
            .min_size(Vec2::new(180.0, 48.0));
        if ui.add_enabled(!spinning, button).clicked() {
            self.spin();
        }
    }

    pub fn item_list_ui(&mut self, ui: &mut Ui) {
        let spinning = self.wheel.is_spinning();
        ui.horizontal(|ui| {
            ui.heading("Items");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!spinning, egui::Button::new("Reset"))
                    .on_hover_text("Restore the default list")
                    .clicked()
                {
                    self.items.reset();
                    self.sync_items();
                }
            });
        });
        ui.separator();

        ui.add_enabled_ui(!spinning, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.new_item_label)
                        .hint_text("New item...")
                        .desired_width(ui.available_width() - 40.0),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("+").clicked() || submitted {
                    let label = std::mem::take(&mut self.new_item_label);
                    match self.items.add(&label) {
                        Ok(_) => self.sync_items(),
                        Err(e) => {
                            self.new_item_label = label;
                            self.report(&e);
                        }
                    }
                }
            });
            ui.add_space(8.0);

            let mut to_remove = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("items_grid")
                    .striped(true)
                    .num_columns(3)
                    .show(ui, |ui| {
                        for item in self.items.items() {
                            let (rect, _) = ui.allocate_exact_size(
                                Vec2::splat(SWATCH_SIZE),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(rect, 3.0, Color32::from(item.color));
                            ui.label(RichText::new(&item.label).strong());
                            if ui
                                .small_button("Remove")
                                .on_hover_text("Remove this item")
                                .clicked()
                            {
                                to_remove = Some(item.id.clone());
                            }
                            ui.end_row();
                        }
                    });
            });
            if let Some(id) = to_remove {
                match self.items.remove(&id) {
                    Ok(_) => self.sync_items(),
                    Err(e) => self.report(&e),
                }
            }
        });
    }

    pub fn winner_window(&mut self, ctx: &egui::Context) {
        let Some(result) = self.winner.as_ref() else {
            return;
        };
        let label = result.winning_item.label.clone();
        let color = Color32::from(result.winning_item.color);
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("It's decided!")
            .default_size(WINNER_WINDOW_SIZE)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.label(RichText::new(label).size(40.0).strong().color(color));
                    ui.add_space(16.0);
                    if ui.button(RichText::new("Back to it!").size(18.0)).clicked() {
                        dismissed = true;
                    }
                });
            });
        if !open || dismissed {
            self.winner = None;
        }
    }
}
