use std::collections::HashMap;

use flight_feed::FlightRecord;
use walkers::Position;

use crate::popup::PopupContent;

/// A flight's annotation on the map: where to draw it and what its popup says.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub position: Position,
    /// Used to rotate the icon; `None` draws it unrotated.
    pub heading: Option<f64>,
    pub popup: PopupContent,
}

/// What `MarkerRegistry::upsert` did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// Every marker ever placed on the map, by flight identifier.
///
/// There is at most one marker per identifier and markers are never removed:
/// a flight that stops being reported keeps its last known position.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: HashMap<String, Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the marker of a newly seen flight, or moves the existing one
    /// and replaces its popup.
    pub fn upsert(&mut self, record: &FlightRecord) -> Upsert {
        let position = Position::from_lat_lon(record.latitude, record.longitude);
        let popup = PopupContent::from_record(record);

        match self.markers.get_mut(&record.id) {
            Some(marker) => {
                marker.position = position;
                marker.heading = record.heading;
                marker.popup = popup;
                Upsert::Updated
            }
            None => {
                self.markers.insert(
                    record.id.clone(),
                    Marker {
                        id: record.id.clone(),
                        position,
                        heading: record.heading,
                        popup,
                    },
                );
                Upsert::Created
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }
}
