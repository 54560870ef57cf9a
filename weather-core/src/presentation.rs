//! Pure mapping from view state to what gets drawn.
//!
//! Nothing here touches the network or mutates state; a renderer takes a
//! [`WeatherView`] and draws it however it likes.

use crate::model::{ViewState, WeatherSnapshot};

/// Icon shown for a provider condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionIcon {
    Rain,
    Sun,
    Cloud,
    Fog,
    /// Anything the table does not know about.
    PartlySunny,
}

impl ConditionIcon {
    /// Exact, case-sensitive match; unknown values fall back to [`ConditionIcon::PartlySunny`].
    pub fn from_condition(condition_main: &str) -> Self {
        match condition_main {
            "Rain" => Self::Rain,
            "Clear" => Self::Sun,
            "Clouds" => Self::Cloud,
            "Mist" => Self::Fog,
            _ => Self::PartlySunny,
        }
    }

    /// Hex color the icon is drawn in.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Rain => "#272829",
            Self::Sun => "#FFC436",
            Self::Cloud => "#102C57",
            Self::Fog => "#279EFF",
            Self::PartlySunny => "#7B2869",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Rain => "🌧",
            Self::Sun => "☀",
            Self::Cloud => "☁",
            Self::Fog => "🌫",
            Self::PartlySunny => "⛅",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Sun => "sun",
            Self::Cloud => "cloud",
            Self::Fog => "fog",
            Self::PartlySunny => "partly-sunny",
        }
    }
}

/// Solid `#rrggbb` colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
    pub text: &'static str,
    pub container_background: &'static str,
    pub search_border: &'static str,
    pub bottom_info_background: &'static str,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        dark: false,
        text: "#333333",
        container_background: "#f2f2f2",
        search_border: "#d3d3d3",
        bottom_info_background: "#e5e5e5",
    };

    pub const DARK: Theme = Theme {
        dark: true,
        text: "#f2f2f2",
        container_background: "#333333",
        search_border: "#444444",
        bottom_info_background: "#444444",
    };

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::DARK } else { Self::LIGHT }
    }
}

/// Display strings for a loaded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location_name: String,
    pub country_code: String,
    pub icon: ConditionIcon,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
}

impl From<&WeatherSnapshot> for WeatherCard {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            location_name: s.location_name.clone(),
            country_code: s.country_code.clone(),
            icon: ConditionIcon::from_condition(&s.condition_main),
            temperature: s.temperature_celsius.to_string(),
            condition: s.condition_main.clone(),
            humidity: format!("{}%", s.humidity_percent),
            wind: format!("{} Km/Hr", s.wind_speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Weather(WeatherCard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub theme: Theme,
    pub search_text: String,
    pub screen: Screen,
}

impl From<&ViewState> for WeatherView {
    fn from(state: &ViewState) -> Self {
        let screen = match (&state.snapshot, state.loading) {
            (Some(snapshot), true) => Screen::Weather(WeatherCard::from(snapshot)),
            _ => Screen::Loading,
        };

        Self {
            theme: Theme::for_mode(state.dark_mode),
            search_text: state.search_text.clone(),
            screen,
        }
    }
}
