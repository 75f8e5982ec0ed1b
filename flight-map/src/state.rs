/// Tracks which marker, if any, has its popup open.
#[derive(Debug, Default)]
pub struct SelectionState {
    pub flight: Option<String>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        Self { flight: None }
    }

    /// If the provided flight is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle_flight_selection(&mut self, id: &str) {
        if self.flight.as_deref() == Some(id) {
            self.flight = None;
        } else {
            self.flight = Some(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.flight.as_deref() == Some(id)
    }
}
