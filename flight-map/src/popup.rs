use std::fmt;

use flight_feed::FlightRecord;

const UNKNOWN: &str = "unknown";

/// One `Label: value` row of a marker popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupLine {
    pub label: &'static str,
    pub value: String,
}

/// Telemetry shown when a marker is opened: identifier, origin country,
/// altitude, velocity, heading and vertical rate, each with its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    lines: Vec<PopupLine>,
}

impl PopupContent {
    pub fn from_record(record: &FlightRecord) -> Self {
        let lines = vec![
            PopupLine {
                label: "Flight ID",
                value: record.id.clone(),
            },
            PopupLine {
                label: "Origin",
                value: record
                    .origin_country
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            },
            PopupLine {
                label: "Altitude",
                value: measure(record.altitude, " m"),
            },
            PopupLine {
                label: "Velocity",
                value: measure(record.velocity, " m/s"),
            },
            PopupLine {
                label: "Heading",
                value: measure(record.heading, "°"),
            },
            PopupLine {
                label: "Vertical Rate",
                value: measure(record.vertical_rate, " m/s"),
            },
        ];

        Self { lines }
    }

    pub fn lines(&self) -> &[PopupLine] {
        &self.lines
    }
}

fn measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{}{}", value, unit),
        None => UNKNOWN.to_string(),
    }
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", line.label, line.value)?;
        }
        Ok(())
    }
}
