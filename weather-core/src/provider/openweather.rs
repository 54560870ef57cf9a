use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::model::WeatherSnapshot;

use super::{ProviderError, WeatherClient};

/// Client for the OpenWeather "current weather" endpoint, always in metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: builder.build()?,
        })
    }

    fn weather_url(&self) -> String {
        format!("{}/weather", self.base_url)
    }

    async fn fetch_current(
        &self,
        query: &[(&str, &str)],
    ) -> Result<WeatherSnapshot, ProviderError> {
        let res = self
            .http
            .get(self.weather_url())
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn parse_current(body: &str) -> Result<WeatherSnapshot, ProviderError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    let condition_main = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or_else(|| ProviderError::MalformedResponse("empty `weather` array".to_string()))?;

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        country_code: parsed.sys.country,
        temperature_celsius: parsed.main.temp,
        humidity_percent: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        condition_main,
    })
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ProviderError> {
        debug!("requesting current weather by coordinates");
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }

    #[instrument(skip(self))]
    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherSnapshot, ProviderError> {
        debug!("requesting current weather by city name");
        self.fetch_current(&[("q", name)]).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
