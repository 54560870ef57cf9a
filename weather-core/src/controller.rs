//! The weather view state machine.
//!
//! [`WeatherViewController`] owns the [`ViewState`] and is the only thing that
//! changes it. Session start and search may run at the same time against one
//! shared controller. Every fetch is tagged with a sequence number, and a
//! response lands only if no newer fetch has been issued since. Failures are
//! logged and otherwise leave the state alone.

use parking_lot::Mutex;
use std::{future::Future, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    location::{LocationError, LocationProvider, position_within},
    model::{ViewState, WeatherSnapshot},
    presentation::WeatherView,
    provider::{ProviderError, WeatherClient},
};

const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingLocation,
    Loaded,
}

#[derive(Debug, Default)]
struct Inner {
    state: ViewState,
    phase: Phase,
    latest_seq: u64,
}

impl Inner {
    fn issue(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }
}

#[derive(Debug)]
pub struct WeatherViewController {
    client: Arc<dyn WeatherClient>,
    location: Arc<dyn LocationProvider>,
    location_timeout: Duration,
    inner: Mutex<Inner>,
    cancel: CancellationToken,
}

impl WeatherViewController {
    pub fn new(client: Arc<dyn WeatherClient>, location: Arc<dyn LocationProvider>) -> Self {
        Self {
            client,
            location,
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            inner: Mutex::new(Inner::default()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }

    pub fn state(&self) -> ViewState {
        self.inner.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn view(&self) -> WeatherView {
        WeatherView::from(&self.inner.lock().state)
    }

    /// Locate the device and fetch weather for that position.
    ///
    /// A location failure or timeout leaves the controller in
    /// [`Phase::AwaitingLocation`] with the loading screen up; a search can
    /// still replace it.
    pub async fn start_session(&self) {
        let seq = {
            let mut inner = self.inner.lock();
            inner.phase = Phase::AwaitingLocation;
            inner.issue()
        };
        self.run_session(seq).await;
    }

    async fn run_session(&self, seq: u64) {
        let position = self
            .until_cancelled(position_within(self.location.as_ref(), self.location_timeout))
            .await;
        let coords = match position {
            None => return,
            Some(Ok(coords)) => coords,
            Some(Err(err)) => {
                log_location_failure(&err);
                return;
            }
        };

        if !self.is_latest(seq) {
            debug!(seq, "session superseded before weather request");
            return;
        }

        let result = self
            .until_cancelled(self.client.fetch_by_coordinates(coords.latitude, coords.longitude))
            .await;
        if let Some(result) = result {
            self.apply(seq, result);
        }
    }

    /// Replace the search field contents. Never fetches.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.inner.lock().state.search_text = text.into();
    }

    /// Fetch weather for the city in the search field.
    ///
    /// Blank input is ignored without a request.
    pub async fn search(&self) {
        let (seq, city) = {
            let mut inner = self.inner.lock();
            let city = inner.state.search_text.trim().to_string();
            if city.is_empty() {
                return;
            }
            (inner.issue(), city)
        };

        let result = self.until_cancelled(self.client.fetch_by_city_name(&city)).await;
        if let Some(result) = result {
            self.apply(seq, result);
        }
    }

    /// Drop everything and start over, as a full reload would.
    ///
    /// The reset and the new session's sequence number happen under one lock,
    /// so no response issued before the refresh can land afterwards.
    pub async fn refresh(&self) {
        let seq = {
            let mut inner = self.inner.lock();
            inner.state = ViewState::default();
            inner.phase = Phase::AwaitingLocation;
            inner.issue()
        };
        self.run_session(seq).await;
    }

    pub fn toggle_theme(&self) {
        let mut inner = self.inner.lock();
        inner.state.dark_mode = !inner.state.dark_mode;
    }

    /// Tear down: pending work stops and nothing in flight may write state.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.inner.lock().latest_seq == seq
    }

    async fn until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("controller shut down, dropping pending work");
                None
            }
            out = fut => Some(out),
        }
    }

    fn apply(&self, seq: u64, result: Result<WeatherSnapshot, ProviderError>) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(seq, error = %err, "weather fetch failed, keeping current view");
                return;
            }
        };

        if self.cancel.is_cancelled() {
            debug!(seq, "discarding response after shutdown");
            return;
        }

        let mut inner = self.inner.lock();
        if inner.latest_seq != seq {
            debug!(seq, latest = inner.latest_seq, "discarding stale response");
            return;
        }

        info!(
            location = %snapshot.location_name,
            condition = %snapshot.condition_main,
            "weather updated"
        );
        inner.state.snapshot = Some(snapshot);
        inner.state.loading = true;
        inner.phase = Phase::Loaded;
    }
}

fn log_location_failure(err: &LocationError) {
    warn!(error = %err, "could not determine location, weather stays unloaded");
}
