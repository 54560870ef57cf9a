//! Where the device is: the single-shot position query the session starts with.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::debug;

use crate::{Config, model::Coordinates};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for location")]
    TimedOut,
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// A position known up front, from config or the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximate position from the public IP address (ip-api.com response format).
#[derive(Debug, Clone)]
pub struct IpLocation {
    lookup_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocation {
    pub fn new(lookup_url: impl Into<String>) -> Self {
        Self {
            lookup_url: lookup_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .http
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "lookup returned status {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            return Err(LocationError::Unavailable(
                body.message.unwrap_or_else(|| format!("lookup status '{}'", body.status)),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                debug!(lat, lon, "resolved position from IP lookup");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Unavailable("lookup response had no coordinates".into())),
        }
    }
}

/// Fixed coordinates win over the IP lookup when both are configured.
pub fn location_from_config(config: &Config) -> Arc<dyn LocationProvider> {
    match config.location.fixed() {
        Some(coords) => Arc::new(FixedLocation(coords)),
        None => Arc::new(IpLocation::new(config.location.lookup_url.clone())),
    }
}

/// Wait for `provider`, giving up after `timeout`.
pub async fn position_within(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<Coordinates, LocationError> {
    tokio::time::timeout(timeout, provider.current_position())
        .await
        .map_err(|_| LocationError::TimedOut)?
}
