use egui::{Align2, RichText, Ui, Window};
use walkers::MapMemory;

use crate::{
    config::{TILE_ATTRIBUTION, TILE_ATTRIBUTION_URL},
    sync::FlightSync,
};

/// Zoom in/out buttons in the bottom-left corner.
pub fn zoom(ui: &Ui, map_memory: &mut MapMemory) {
    Window::new("Zoom")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_BOTTOM, [10., -10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    let _ = map_memory.zoom_in();
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    let _ = map_memory.zoom_out();
                }
            });
        });
}

/// Tile provider attribution, required by the OpenStreetMap terms.
pub fn attribution(ui: &Ui) {
    Window::new("Attribution")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
        .show(ui.ctx(), |ui| {
            ui.hyperlink_to(TILE_ATTRIBUTION, TILE_ATTRIBUTION_URL);
        });
}

/// Marker count and outcome of the last sync cycle.
pub fn status(ui: &Ui, flight_sync: &FlightSync) {
    Window::new("Status")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_TOP, [10., 10.])
        .show(ui.ctx(), |ui| {
            ui.label(format!("Flights: {}", flight_sync.registry().len()));
            match flight_sync.last_update() {
                Some(time) => ui.label(format!("Updated: {}", time.format("%H:%M:%S UTC"))),
                None => ui.label("Waiting for flights..."),
            };
            if let Some(error) = flight_sync.last_error() {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), error);
            }
        });
}
