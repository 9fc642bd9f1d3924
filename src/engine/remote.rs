//! HTTP client for a remote high-fidelity simulation engine.
//!
//! Protocol:
//! - `GET {base}/health`: handshake, any 2xx means available
//! - `POST {base}/simulate`: body [`EngineRequest`], returns [`RawEngineResult`]
//! - `POST {base}/shutdown`: best-effort session close

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{info, warn};

use super::types::{EngineError, EngineRequest, EngineState, ExternalEngine, RawEngineResult};

/// [`ExternalEngine`] backed by a JSON-over-HTTP service.
pub struct RemoteEngine {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    state: AtomicU8,
}

impl RemoteEngine {
    /// Creates a client for `base_url`; every request is capped at `timeout`.
    ///
    /// The engine starts [`EngineState::Uninitialized`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("grid-sim/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
            state: AtomicU8::new(EngineState::Uninitialized as u8),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Per-request timeout set on the HTTP client.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_state(&self, state: EngineState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout(self.timeout)
        } else {
            EngineError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ExternalEngine for RemoteEngine {
    async fn initialize(&self) -> bool {
        info!(url = %self.base_url, "connecting to remote engine");
        let outcome = match self.client.get(self.url("health")).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(EngineError::Status(resp.status().as_u16())),
            Err(err) => Err(self.transport_error(err)),
        };

        match outcome {
            Ok(()) => {
                self.set_state(EngineState::Available);
                info!(url = %self.base_url, "remote engine available");
                true
            }
            Err(err) => {
                self.set_state(EngineState::Unavailable);
                warn!(
                    url = %self.base_url,
                    error = %err,
                    "remote engine handshake failed, using analytic model"
                );
                false
            }
        }
    }

    fn is_available(&self) -> bool {
        self.state() == EngineState::Available
    }

    async fn invoke(
        &self,
        load_mw: f64,
        generation_mw: f64,
    ) -> Result<RawEngineResult, EngineError> {
        if !self.is_available() {
            return Err(EngineError::Unavailable);
        }

        let resp = self
            .client
            .post(self.url("simulate"))
            .json(&EngineRequest {
                load_mw,
                generation_mw,
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body).map_err(|e| EngineError::Malformed(e.to_string()))
    }

    async fn shutdown(&self) {
        if self.state() == EngineState::Available {
            match self.client.post(self.url("shutdown")).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!(url = %self.base_url, "remote engine shut down");
                }
                Ok(resp) => warn!(
                    url = %self.base_url,
                    status = resp.status().as_u16(),
                    "remote engine refused shutdown"
                ),
                Err(err) => warn!(
                    url = %self.base_url,
                    error = %err,
                    "error shutting down remote engine"
                ),
            }
        }
        self.set_state(EngineState::Uninitialized);
    }

    fn name(&self) -> &str {
        "remote"
    }
}
