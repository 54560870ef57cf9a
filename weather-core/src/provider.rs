use crate::{Config, WeatherSnapshot, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Failure of a single provider call. Both kinds are handled the same way
/// by the view controller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to weather provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed weather provider response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ProviderError>;

    /// `name` must not be blank; callers check this before calling.
    async fn fetch_by_city_name(&self, name: &str) -> Result<WeatherSnapshot, ProviderError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the weather provider.\n\
                 Hint: run `weather configure` and enter your API key."
        )
    })?;

    let client = OpenWeatherClient::new(
        config.provider.base_url.clone(),
        api_key.to_owned(),
        config.provider.request_timeout(),
    )?;

    Ok(Arc::new(client))
}
