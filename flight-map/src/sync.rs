use chrono::{DateTime, Utc};
use flight_feed::{FeedError, FlightBatch, FlightRecord};
use logger::{Color, Logger};

use crate::registry::{MarkerRegistry, Upsert};

/// A completed fetch, tagged with the number of the scheduler tick that issued it.
#[derive(Debug)]
pub struct SyncCycle {
    pub sequence: u64,
    pub result: Result<FlightBatch, FeedError>,
}

/// What applying a `SyncCycle` did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied {
        created: usize,
        updated: usize,
        rejected: usize,
    },
    /// The fetch failed; the registry was left untouched.
    Failed,
    /// A newer cycle was already applied; the response was discarded.
    Stale,
}

/// Reconciles fetched flights into the marker registry.
///
/// Owns the registry; every mutation goes through `apply`, which runs on the
/// UI thread.
pub struct FlightSync {
    registry: MarkerRegistry,
    last_sequence: Option<u64>,
    cycles_applied: u64,
    last_update: Option<DateTime<Utc>>,
    last_error: Option<String>,
    logger: Logger,
}

impl FlightSync {
    pub fn new(logger: Logger) -> Self {
        Self {
            registry: MarkerRegistry::new(),
            last_sequence: None,
            cycles_applied: 0,
            last_update: None,
            last_error: None,
            logger,
        }
    }

    /// Applies one completed fetch.
    ///
    /// A failed fetch is logged and leaves the registry as it was; the next
    /// scheduled cycle is the only retry. A successful response older than the
    /// last applied one is dropped so it cannot move markers back.
    pub fn apply(&mut self, cycle: SyncCycle) -> SyncOutcome {
        let batch = match cycle.result {
            Ok(batch) => batch,
            Err(error) => {
                let _ = self.logger.error(
                    &format!(
                        "Error fetching flight data (cycle {}): {}",
                        cycle.sequence, error
                    ),
                    true,
                );
                self.last_error = Some(error.to_string());
                return SyncOutcome::Failed;
            }
        };

        if matches!(self.last_sequence, Some(last) if cycle.sequence <= last) {
            let _ = self.logger.warn(
                &format!(
                    "Discarding response of cycle {}, cycle {} is newer",
                    cycle.sequence,
                    self.last_sequence.unwrap_or_default()
                ),
                false,
            );
            return SyncOutcome::Stale;
        }

        for rejected in &batch.rejected {
            let _ = self.logger.warn(
                &format!(
                    "Skipping flight #{} of cycle {}: {}",
                    rejected.index, cycle.sequence, rejected.reason
                ),
                false,
            );
        }

        let (created, updated) = self.reconcile(&batch.flights);

        self.last_sequence = Some(cycle.sequence);
        self.cycles_applied += 1;
        self.last_update = Some(Utc::now());
        self.last_error = None;

        let _ = self.logger.info(
            &format!(
                "Cycle {}: {} new, {} moved, {} markers",
                cycle.sequence,
                created,
                updated,
                self.registry.len()
            ),
            Color::Cyan,
            false,
        );

        SyncOutcome::Applied {
            created,
            updated,
            rejected: batch.rejected.len(),
        }
    }

    /// Creates or updates one marker per record, in order. Returns how many
    /// markers were created and how many were updated.
    pub fn reconcile(&mut self, flights: &[FlightRecord]) -> (usize, usize) {
        flights
            .iter()
            .fold((0, 0), |(created, updated), record| {
                match self.registry.upsert(record) {
                    Upsert::Created => (created + 1, updated),
                    Upsert::Updated => (created, updated + 1),
                }
            })
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn cycles_applied(&self) -> u64 {
        self.cycles_applied
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_feed::parse_flights;
    use logger::LogBuffer;

    fn new_sync() -> (FlightSync, LogBuffer) {
        let (logger, buffer) = Logger::in_memory("sync");
        (FlightSync::new(logger), buffer)
    }

    fn cycle(sequence: u64, body: &str) -> SyncCycle {
        SyncCycle {
            sequence,
            result: parse_flights(body),
        }
    }

    fn a1_at(lat: f64, lon: f64) -> String {
        format!(
            r#"[{{"Flight_ID":"A1","Latitude":{},"Longitude":{},"Origin_Country":"X","Altitude":1000,"Velocity":200,"Heading":90,"Vertical_Rate":0}}]"#,
            lat, lon
        )
    }

    #[test]
    fn test_new_flight_creates_one_marker_with_popup() {
        let (mut sync, _) = new_sync();

        let outcome = sync.apply(cycle(1, &a1_at(10.0, 20.0)));

        assert_eq!(
            outcome,
            SyncOutcome::Applied {
                created: 1,
                updated: 0,
                rejected: 0
            }
        );
        let marker = sync.registry().get("A1").unwrap();
        assert_eq!((marker.position.lat(), marker.position.lon()), (10.0, 20.0));
        assert_eq!(
            marker.popup.to_string(),
            "Flight ID: A1\nOrigin: X\nAltitude: 1000 m\nVelocity: 200 m/s\nHeading: 90°\nVertical Rate: 0 m/s"
        );
    }

    #[test]
    fn test_three_cycles_keep_stale_marker() {
        let (mut sync, _) = new_sync();

        sync.apply(cycle(1, &a1_at(10.0, 20.0)));
        assert_eq!(sync.registry().len(), 1);

        sync.apply(cycle(2, &a1_at(11.0, 21.0)));
        assert_eq!(sync.registry().len(), 1);

        let outcome = sync.apply(cycle(3, "[]"));
        assert_eq!(
            outcome,
            SyncOutcome::Applied {
                created: 0,
                updated: 0,
                rejected: 0
            }
        );
        assert_eq!(sync.registry().len(), 1);
        let marker = sync.registry().get("A1").unwrap();
        assert_eq!((marker.position.lat(), marker.position.lon()), (11.0, 21.0));
        assert_eq!(sync.cycles_applied(), 3);
    }

    #[test]
    fn test_one_marker_per_identifier_ever_seen() {
        let (mut sync, _) = new_sync();
        let responses = [
            r#"[{"Flight_ID":"A1","Latitude":1,"Longitude":1},{"Flight_ID":"B2","Latitude":2,"Longitude":2}]"#,
            r#"[{"Flight_ID":"B2","Latitude":3,"Longitude":3}]"#,
            r#"[{"Flight_ID":"C3","Latitude":4,"Longitude":4},{"Flight_ID":"A1","Latitude":5,"Longitude":5}]"#,
            r#"[]"#,
        ];

        let mut previous_len = 0;
        for (i, body) in responses.iter().enumerate() {
            sync.apply(cycle(i as u64 + 1, body));
            assert!(sync.registry().len() >= previous_len);
            previous_len = sync.registry().len();
        }

        let mut ids: Vec<&str> = sync.registry().iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_failed_fetch_leaves_registry_and_logs() {
        let (mut sync, buffer) = new_sync();
        sync.apply(cycle(1, &a1_at(10.0, 20.0)));

        let outcome = sync.apply(cycle(2, "not json"));

        assert_eq!(outcome, SyncOutcome::Failed);
        assert_eq!(sync.registry().len(), 1);
        let marker = sync.registry().get("A1").unwrap();
        assert_eq!((marker.position.lat(), marker.position.lon()), (10.0, 20.0));
        assert!(sync.last_error().unwrap().starts_with("[Decode]"));
        assert!(buffer.contains("Error fetching flight data (cycle 2)"));
        assert_eq!(sync.cycles_applied(), 1);
    }

    #[test]
    fn test_network_error_is_reported() {
        let (mut sync, buffer) = new_sync();

        let outcome = sync.apply(SyncCycle {
            sequence: 1,
            result: Err(FeedError::Request("connection refused".to_string())),
        });

        assert_eq!(outcome, SyncOutcome::Failed);
        assert!(sync.registry().is_empty());
        assert!(buffer.contains("connection refused"));
    }

    #[test]
    fn test_success_clears_last_error() {
        let (mut sync, _) = new_sync();
        sync.apply(cycle(1, "{}"));
        assert!(sync.last_error().is_some());

        sync.apply(cycle(2, "[]"));
        assert!(sync.last_error().is_none());
        assert!(sync.last_update().is_some());
    }

    #[test]
    fn test_late_response_of_older_cycle_is_discarded() {
        let (mut sync, buffer) = new_sync();
        sync.apply(cycle(2, &a1_at(11.0, 21.0)));

        let outcome = sync.apply(cycle(1, &a1_at(10.0, 20.0)));

        assert_eq!(outcome, SyncOutcome::Stale);
        let marker = sync.registry().get("A1").unwrap();
        assert_eq!((marker.position.lat(), marker.position.lon()), (11.0, 21.0));
        assert!(buffer.contains("Discarding response of cycle 1"));
    }

    #[test]
    fn test_rejected_records_do_not_block_the_rest() {
        let (mut sync, buffer) = new_sync();
        let body = r#"[{"Flight_ID":"A1"},{"Flight_ID":"B2","Latitude":2,"Longitude":2}]"#;

        let outcome = sync.apply(cycle(1, body));

        assert_eq!(
            outcome,
            SyncOutcome::Applied {
                created: 1,
                updated: 0,
                rejected: 1
            }
        );
        assert!(sync.registry().get("B2").is_some());
        assert!(sync.registry().get("A1").is_none());
        assert!(buffer.contains("Skipping flight #0 of cycle 1"));
    }

    #[test]
    fn test_numeric_and_text_ids_share_a_marker() {
        let (mut sync, _) = new_sync();

        sync.apply(cycle(1, r#"[{"Flight_ID":42,"Latitude":1,"Longitude":1}]"#));
        sync.apply(cycle(2, r#"[{"Flight_ID":"42","Latitude":2,"Longitude":2}]"#));

        assert_eq!(sync.registry().len(), 1);
        assert_eq!(sync.registry().get("42").unwrap().position.lat(), 2.0);
    }
}
