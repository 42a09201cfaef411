//! REST implementation of [`TelemetryBackend`].
//!
//! `RestBackendClient` wraps a `reqwest::Client` and translates every trait
//! method into the corresponding HTTP call against the telemetry backend,
//! with retry + exponential back-off on transient (5xx / transport) failures
//! for reads. Command submission is sent exactly once and its body is
//! interpreted even on error statuses.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tb_domain::command::CommandSchema;
use tb_domain::config::BackendConfig;
use tb_domain::error::{Error, Result};
use tb_domain::trace::TraceEvent;
use tb_domain::{Entity, HistoryRange, ImageEntry, TelemetrySample};
use uuid::Uuid;

use crate::provider::TelemetryBackend;
use crate::types::{
    CommandRequest, CommandResponse, CommandTargetsResponse, Dictionary, EntitiesResponse,
    HistoryResponse, ImagesResponse,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the telemetry backend.
///
/// Created once and shared by every bridge component. The underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestBackendClient {
    http: Client,
    base_url: String,
    max_retries: u32,
}

impl RestBackendClient {
    /// Build a client for an already resolved base URL.
    pub fn new(base_url: &str, cfg: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if cfg.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.timeout_ms));
        }
        let http = builder.build().map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries: cfg.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard telebridge headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = Uuid::new_v4().to_string();
        rb.header("X-Client-Type", "telebridge")
            .header("X-Trace-Id", trace_id)
    }

    /// Build the full URL for a path like `/entities`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── retry engine ─────────────────────────────────────────────────

    /// Execute a request, retrying up to `max_retries` times on transient errors.
    ///
    /// * Retries on 5xx status codes, timeouts and connection errors.
    /// * Does **not** retry on 4xx (client errors are permanent).
    /// * Emits a `TraceEvent::BackendCall` after every attempt.
    async fn execute_with_retry(
        &self,
        endpoint: &str,
        build_request: impl Fn() -> RequestBuilder,
    ) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            let start = Instant::now();
            let result = self.decorate(build_request()).send().await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    TraceEvent::BackendCall {
                        endpoint: endpoint.to_owned(),
                        status,
                        duration_ms,
                    }
                    .emit();

                    if resp.status().is_server_error() {
                        // 5xx: transient, retry
                        let body = resp.text().await.unwrap_or_default();
                        last_err = Some(Error::Backend {
                            endpoint: endpoint.to_owned(),
                            message: format!("returned {status}: {body}"),
                        });
                        continue;
                    }

                    if resp.status().is_client_error() {
                        // 4xx: permanent, do NOT retry
                        let body = resp.text().await.unwrap_or_default();
                        return Err(Error::Backend {
                            endpoint: endpoint.to_owned(),
                            message: format!("returned {status}: {body}"),
                        });
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    let status = e.status().map(|s| s.as_u16()).unwrap_or(0);

                    TraceEvent::BackendCall {
                        endpoint: endpoint.to_owned(),
                        status,
                        duration_ms,
                    }
                    .emit();

                    last_err = Some(from_reqwest(e));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Backend {
            endpoint: endpoint.to_owned(),
            message: "all retries exhausted".into(),
        }))
    }

    /// Send exactly once and hand back the response whatever its status.
    async fn send_once(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let status = match &result {
            Ok(resp) => resp.status().as_u16(),
            Err(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
        };
        TraceEvent::BackendCall {
            endpoint: endpoint.to_owned(),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();
        result.map_err(from_reqwest)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> Result<T> {
        let resp = self
            .execute_with_retry(endpoint, || self.http.get(url))
            .await?;
        parse_body(endpoint, resp).await
    }
}

async fn parse_body<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T> {
    let body = resp.text().await.map_err(from_reqwest)?;
    serde_json::from_str(&body).map_err(|e| Error::Backend {
        endpoint: endpoint.to_owned(),
        message: format!("failed to parse response: {e}: {body}"),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl TelemetryBackend for RestBackendClient {
    async fn entities(&self) -> Result<Vec<Entity>> {
        let url = self.url("/entities");
        let resp: EntitiesResponse = self.get_json("GET /entities", &url).await?;
        Ok(resp.entities)
    }

    async fn dictionary(&self) -> Result<Dictionary> {
        let url = self.url("/dictionary");
        self.get_json("GET /dictionary", &url).await
    }

    async fn history(
        &self,
        entity_id: &str,
        range: HistoryRange,
    ) -> Result<Vec<TelemetrySample>> {
        let url = self.url(&format!("/telemetry/{entity_id}/history"));
        let mut params: Vec<(&str, i64)> = Vec::new();
        if let Some(start) = range.start {
            params.push(("start", start));
        }
        if let Some(end) = range.end {
            params.push(("end", end));
        }

        let endpoint = format!("GET /telemetry/{entity_id}/history");
        let resp = self
            .execute_with_retry(&endpoint, || {
                self.http.get(&url).query(&params)
            })
            .await?;
        let body: HistoryResponse = parse_body(&endpoint, resp).await?;
        Ok(body.history)
    }

    async fn latest(&self, entity_id: &str) -> Result<TelemetrySample> {
        let url = self.url(&format!("/telemetry/{entity_id}"));
        self.get_json(&format!("GET /telemetry/{entity_id}"), &url)
            .await
    }

    async fn command_targets(&self) -> Result<CommandSchema> {
        let url = self.url("/command");
        let resp: CommandTargetsResponse = self.get_json("GET /command", &url).await?;
        Ok(resp.targets)
    }

    async fn execute_command(&self, req: CommandRequest) -> Result<CommandResponse> {
        const ENDPOINT: &str = "POST /command";
        let url = self.url("/command");
        let resp = self.send_once(ENDPOINT, self.http.post(&url).json(&req)).await?;

        // Error statuses usually still carry a `{status, error}` body.
        let status = resp.status();
        let body = resp.text().await.map_err(from_reqwest)?;
        match serde_json::from_str::<CommandResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(Error::Backend {
                endpoint: ENDPOINT.to_owned(),
                message: format!("failed to parse response: {e}: {body}"),
            }),
            Err(_) => Err(Error::Backend {
                endpoint: ENDPOINT.to_owned(),
                message: format!("returned {}: {body}", status.as_u16()),
            }),
        }
    }

    async fn images(&self) -> Result<Vec<ImageEntry>> {
        let url = self.url("/images");
        let resp: ImagesResponse = self.get_json("GET /images", &url).await?;
        Ok(resp.images)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
