//! Core library for the `weather` display.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider client and the device location seam
//! - The view controller state machine
//! - Presentation mapping (condition icons, themes, view-model)
//!
//! It is used by `weather-cli`, but any renderer that can draw a
//! [`WeatherView`] can drive a [`WeatherViewController`].

pub mod config;
pub mod controller;
pub mod location;
pub mod model;
pub mod presentation;
pub mod provider;

pub use config::{Config, LocationConfig, ProviderConfig};
pub use controller::{Phase, WeatherViewController};
pub use location::{FixedLocation, IpLocation, LocationError, LocationProvider};
pub use model::{Coordinates, ViewState, WeatherSnapshot};
pub use presentation::{ConditionIcon, Screen, Theme, WeatherCard, WeatherView};
pub use provider::{ProviderError, WeatherClient, openweather::OpenWeatherClient};
