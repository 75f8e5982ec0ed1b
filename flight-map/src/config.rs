use std::{
    fmt::{self, Display},
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Center of India.
pub const INITIAL_LAT: f64 = 20.5937;
pub const INITIAL_LON: f64 = 78.9629;
pub const INITIAL_ZOOM: f64 = 5.0;

pub const UPDATE_TICK_MS: u64 = 1000;

pub const MARKER_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/149/149059.png";
pub const MARKER_ICON_SIZE: f32 = 20.0;

pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const TILE_ATTRIBUTION_URL: &str = "https://www.openstreetmap.org/copyright";

const URL_ENV: &str = "FLIGHTS_URL";
const LOG_DIR_ENV: &str = "FLIGHTS_LOG_DIR";

/// The image every marker is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub url: String,
    pub size: f32,
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            url: MARKER_ICON_URL.to_string(),
            size: MARKER_ICON_SIZE,
        }
    }
}

/// Settings of the map viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Backend serving `/api/flights`.
    pub base_url: String,
    pub log_dir: PathBuf,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    /// Time between two sync cycles.
    pub refresh: Duration,
    pub icon: MarkerIcon,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            center_lat: INITIAL_LAT,
            center_lon: INITIAL_LON,
            zoom: INITIAL_ZOOM,
            refresh: Duration::from_millis(UPDATE_TICK_MS),
            icon: MarkerIcon::default(),
        }
    }
}

impl MapConfig {
    /// Builds the configuration from the command-line arguments (program name
    /// excluded) and the process environment.
    ///
    /// # Usage
    ///
    /// ```sh
    /// live-flights [base_url] [log_dir]
    /// ```
    ///
    /// `FLIGHTS_URL` and `FLIGHTS_LOG_DIR` are used for the arguments that are
    /// not given.
    pub fn from_env_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_args(args, |key| std::env::var(key).ok())
    }

    /// Same as `from_env_args`, with an explicit environment lookup.
    pub fn from_args<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() > 2 {
            return Err(ConfigError::TooManyArguments(args.len()));
        }

        let mut config = MapConfig::default();

        if let Some(url) = args.first().cloned().or_else(|| env(URL_ENV)) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url));
            }
            config.base_url = url;
        }

        if let Some(dir) = args.get(1).cloned().or_else(|| env(LOG_DIR_ENV)) {
            config.log_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    TooManyArguments(usize),
    InvalidUrl(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooManyArguments(n) => write!(
                f,
                "[TooManyArguments]: Expected at most 2 arguments, got {}. Usage: live-flights [base_url] [log_dir]",
                n
            ),
            ConfigError::InvalidUrl(url) => {
                write!(f, "[InvalidUrl]: {} is not an http(s) URL", url)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
