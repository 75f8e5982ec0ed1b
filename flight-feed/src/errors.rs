use std::fmt::{self, Display};

/// Enum representing the possible errors that can occur while retrieving the flight feed.
///
/// The possible errors are:
///
/// - `Request`: the HTTP request could not be sent or its body could not be read.
/// - `Decode`: the response body is not valid JSON.
/// - `NotAnArray`: the response body is valid JSON but not an array of flights.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    Request(String),
    Decode(String),
    NotAnArray,
}

impl Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Request(msg) => write!(f, "[Request]: Could not retrieve flights: {}", msg),
            FeedError::Decode(msg) => write!(f, "[Decode]: Invalid JSON in response: {}", msg),
            FeedError::NotAnArray => {
                write!(f, "[NotAnArray]: Expected a JSON array of flight records")
            }
        }
    }
}

impl std::error::Error for FeedError {}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err.to_string())
    }
}
