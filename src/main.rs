use std::{env, sync::Arc};

use flight_feed::HttpFeed;
use flight_map::MapConfig;
use logger::{Color, Logger};

/// Opens a map of the flights reported by a `/api/flights` backend.
///
/// # Usage
///
/// ```sh
/// cargo run -- [base_url] [log_dir]
/// ```
///
/// `base_url` defaults to `http://127.0.0.1:5000` and `log_dir` to `logs`;
/// `FLIGHTS_URL` and `FLIGHTS_LOG_DIR` are used when the arguments are absent.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the window cannot be
/// opened. An unusable log directory falls back to console logging.
fn main() -> Result<(), String> {
    let config = MapConfig::from_env_args(env::args().skip(1)).map_err(|e| e.to_string())?;

    let logger = match Logger::new(&config.log_dir, "live_flights") {
        Ok(logger) => logger,
        Err(e) => {
            let logger = Logger::console("live_flights");
            let _ = logger.warn(
                &format!(
                    "Cannot log to {} ({}), logging to the console only",
                    config.log_dir.display(),
                    e
                ),
                true,
            );
            logger
        }
    };

    let feed = HttpFeed::new(&config.base_url).map_err(|e| e.to_string())?;
    let _ = logger.info(
        &format!("Polling {}", feed.endpoint()),
        Color::Cyan,
        true,
    );

    flight_map::run(config, Arc::new(feed), logger).map_err(|e| e.to_string())
}
