use egui::{Color32, RichText};

use crate::registry::Marker;

/// Popup of the selected marker. It reads the marker on every frame, so the
/// telemetry follows the registry while the popup is open.
pub struct WidgetFlightPopup {
    pub selected_flight: String,
}

impl WidgetFlightPopup {
    pub fn new(selected_flight: String) -> Self {
        Self { selected_flight }
    }

    /// Shows the popup; returns `false` once the user closed it.
    pub fn show(&mut self, ctx: &egui::Context, marker: &Marker) -> bool {
        let mut open = true;
        let screen_width = ctx.screen_rect().width();

        egui::Window::new(format!("Flight: {}", self.selected_flight))
            .resizable(false)
            .collapsible(true)
            .open(&mut open)
            .default_pos([screen_width - 300., 20.])
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Flight: {}", marker.id))
                        .strong()
                        .size(20.0)
                        .color(Color32::from_rgb(0, 150, 255)),
                );
                ui.separator();

                egui::Grid::new("flight_popup_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for line in marker.popup.lines() {
                            ui.label(RichText::new(format!("{}:", line.label)).strong());
                            ui.label(&line.value);
                            ui.end_row();
                        }
                        ui.label(RichText::new("Position:").strong());
                        ui.label(format!(
                            "{:.4}, {:.4}",
                            marker.position.lat(),
                            marker.position.lon()
                        ));
                        ui.end_row();
                    });
            });

        open
    }
}
