use serde::{Deserialize, Serialize};

/// One fetched weather result. Always replaced whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country_code: String,
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    /// Provider units.
    pub wind_speed: f64,
    /// Provider condition group, e.g. "Rain", "Clear", "Clouds", "Mist".
    pub condition_main: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Everything the view can observe at a given instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub snapshot: Option<WeatherSnapshot>,
    /// Set by the first successful fetch; only a full reset clears it.
    pub loading: bool,
    pub search_text: String,
    pub dark_mode: bool,
}
