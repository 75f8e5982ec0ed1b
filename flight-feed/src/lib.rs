//! Flight records as served by the `/api/flights` backend and the client
//! that retrieves them.

pub mod client;
pub mod errors;
pub mod record;

pub use client::{FlightSource, HttpFeed, FLIGHTS_PATH};
pub use errors::FeedError;
pub use record::{parse_flights, FlightBatch, FlightRecord, RejectedRecord};
