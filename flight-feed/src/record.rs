use serde::Deserialize;
use serde_json::Value;

use crate::errors::FeedError;

/// Represents a single aircraft as reported by the backend during one fetch.
///
/// Only the identifier and the coordinates are required to place a flight on
/// the map; the telemetry may be missing when the upstream feed reports `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub origin_country: Option<String>,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub heading: Option<f64>,
    pub vertical_rate: Option<f64>,
}

impl FlightRecord {
    /// Creates a record at the given position with no telemetry.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            origin_country: None,
            altitude: None,
            velocity: None,
            heading: None,
            vertical_rate: None,
        }
    }
}

/// An entry of the response that could not be turned into a `FlightRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

/// The decoded contents of one `/api/flights` response, in response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightBatch {
    pub flights: Vec<FlightRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl FlightBatch {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty() && self.rejected.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    #[serde(rename = "Flight_ID")]
    flight_id: Option<RawId>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
    #[serde(rename = "Origin_Country")]
    origin_country: Option<String>,
    #[serde(rename = "Altitude")]
    altitude: Option<f64>,
    #[serde(rename = "Velocity")]
    velocity: Option<f64>,
    #[serde(rename = "Heading")]
    heading: Option<f64>,
    #[serde(rename = "Vertical_Rate")]
    vertical_rate: Option<f64>,
}

// Numeric ids are kept as their decimal text; `7.0` and `7` are the same id.
fn numeric_id(id: &serde_json::Number) -> String {
    match id.as_f64() {
        Some(value) if id.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => id.to_string(),
    }
}

impl TryFrom<RawFlight> for FlightRecord {
    type Error = String;

    fn try_from(raw: RawFlight) -> Result<Self, Self::Error> {
        let id = match raw.flight_id {
            Some(RawId::Text(id)) => id,
            Some(RawId::Number(id)) => numeric_id(&id),
            None => return Err("missing Flight_ID".to_string()),
        };
        let (latitude, longitude) = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(format!("flight {} has no position", id)),
        };

        Ok(FlightRecord {
            id,
            latitude,
            longitude,
            origin_country: raw.origin_country,
            altitude: raw.altitude,
            velocity: raw.velocity,
            heading: raw.heading,
            vertical_rate: raw.vertical_rate,
        })
    }
}

/// Decodes a response body into a batch of flight records.
///
/// The body must be a JSON array, otherwise the whole response is an error.
/// Entries that cannot be placed on the map are collected in
/// `FlightBatch::rejected` and do not prevent the others from being decoded.
pub fn parse_flights(body: &str) -> Result<FlightBatch, FeedError> {
    let Value::Array(items) = serde_json::from_str::<Value>(body)? else {
        return Err(FeedError::NotAnArray);
    };

    let mut batch = FlightBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        let record = serde_json::from_value::<RawFlight>(item)
            .map_err(|e| e.to_string())
            .and_then(FlightRecord::try_from);

        match record {
            Ok(record) => batch.flights.push(record),
            Err(reason) => batch.rejected.push(RejectedRecord { index, reason }),
        }
    }

    Ok(batch)
}
