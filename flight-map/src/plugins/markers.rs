use std::{cell::RefCell, rc::Rc};

use egui::{Color32, Image, Rect, Response, Vec2};
use walkers::{Plugin, Projector};

use crate::{
    config::MarkerIcon,
    registry::{Marker, MarkerRegistry},
    state::SelectionState,
};

const HIGHLIGHT: Color32 = Color32::from_rgb(255, 200, 0);

/// Draws every marker of the registry with the shared icon.
pub struct Markers<'a> {
    registry: &'a MarkerRegistry,
    icon: &'a MarkerIcon,
    selection_state: Rc<RefCell<SelectionState>>,
}

impl<'a> Markers<'a> {
    pub fn new(
        registry: &'a MarkerRegistry,
        icon: &'a MarkerIcon,
        selection_state: Rc<RefCell<SelectionState>>,
    ) -> Self {
        Self {
            registry,
            icon,
            selection_state,
        }
    }
}

impl Plugin for Markers<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for marker in self.registry.iter() {
            marker.draw(
                ui,
                projector,
                self.icon,
                &mut self.selection_state.borrow_mut(),
            );
        }
    }
}

impl Marker {
    fn draw(
        &self,
        ui: &mut egui::Ui,
        projector: &Projector,
        icon: &MarkerIcon,
        selection_state: &mut SelectionState,
    ) {
        let screen_position = projector.project(self.position);
        let symbol_size = Vec2::splat(icon.size);
        let rect = Rect::from_center_size(screen_position.to_pos2(), symbol_size);

        let response = ui.allocate_rect(rect, egui::Sense::click());

        let mut image = Image::new(icon.url.as_str()).fit_to_exact_size(symbol_size);
        if let Some(heading) = self.heading {
            image = image.rotate((heading as f32).to_radians(), Vec2::splat(0.5));
        }
        if response.hovered() || selection_state.is_selected(&self.id) {
            image = image.tint(HIGHLIGHT);
        }

        ui.put(rect, image);

        if response.clicked() {
            selection_state.toggle_flight_selection(&self.id);
        }
    }
}
