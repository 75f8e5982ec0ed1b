use reqwest::blocking::Client;

use crate::{
    errors::FeedError,
    record::{parse_flights, FlightBatch},
};

/// Path of the backend endpoint that lists the current flights.
pub const FLIGHTS_PATH: &str = "/api/flights";

/// A trait that defines where the map gets its flights from.
///
/// Implementors are shared between the worker threads of the sync scheduler,
/// so they must be `Send + Sync`.
pub trait FlightSource: Send + Sync {
    fn fetch_flights(&self) -> Result<FlightBatch, FeedError>;
}

/// Retrieves flights from a backend over HTTP with a plain `GET`.
///
/// The response status and content type are not checked: a body that decodes
/// as a JSON array of flights is accepted whatever the status line says.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: Client,
    endpoint: String,
}

impl HttpFeed {
    /// Creates a feed for the backend reachable at `base_url`
    /// (for example `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), FLIGHTS_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FlightSource for HttpFeed {
    fn fetch_flights(&self) -> Result<FlightBatch, FeedError> {
        let body = self.client.get(&self.endpoint).send()?.text()?;
        parse_flights(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    // Serves a single HTTP response and returns the request line it received.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    #[test]
    fn test_endpoint_joins_base_url_and_path() {
        let feed = HttpFeed::new("http://localhost:5000/").unwrap();
        assert_eq!(feed.endpoint(), "http://localhost:5000/api/flights");
    }

    #[test]
    fn test_fetch_flights_issues_get_and_decodes_body() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"Flight_ID":"A1","Latitude":10,"Longitude":20}]"#,
        );
        let feed = HttpFeed::new(&base_url).unwrap();

        let batch = feed.fetch_flights().unwrap();

        assert_eq!(batch.flights.len(), 1);
        assert_eq!(batch.flights[0].id, "A1");
        assert_eq!(server.join().unwrap(), "GET /api/flights HTTP/1.1");
    }

    #[test]
    fn test_error_status_with_json_body_is_still_accepted() {
        let (base_url, server) = serve_once("500 Internal Server Error", "[]");
        let feed = HttpFeed::new(&base_url).unwrap();

        assert!(feed.fetch_flights().unwrap().is_empty());
        server.join().unwrap();
    }

    #[test]
    fn test_html_body_is_a_decode_error() {
        let (base_url, server) = serve_once("404 Not Found", "<h1>Not Found</h1>");
        let feed = HttpFeed::new(&base_url).unwrap();

        assert!(matches!(feed.fetch_flights(), Err(FeedError::Decode(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_backend_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let feed = HttpFeed::new(&base_url).unwrap();

        assert!(matches!(feed.fetch_flights(), Err(FeedError::Request(_))));
    }
}
