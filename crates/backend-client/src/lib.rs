//! `tb-backend`: telemetry backend client crate for telebridge.
//!
//! Provides the [`TelemetryBackend`] trait that abstracts over the backend's
//! HTTP/JSON API, a production REST implementation ([`RestBackendClient`]),
//! and typed DTOs matching the wire format.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tb_domain::config::Config;
//! use tb_backend::{create_backend, TelemetryBackend};
//!
//! # async fn example() -> tb_domain::error::Result<()> {
//! let cfg = Config::default();
//! let backend = create_backend(&cfg, "localhost")?;
//!
//! for entity in backend.entities().await? {
//!     println!("{} ({})", entity.entity_name, entity.entity_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use provider::TelemetryBackend;
pub use rest::{from_reqwest, RestBackendClient};
pub use types::{
    CommandRequest, CommandResponse, Dictionary, Measurement, STATUS_EXECUTED,
};

use std::sync::Arc;

use tb_domain::config::Config;
use tb_domain::error::Result;

/// Create the REST backend for a host running on `hostname`.
///
/// The base URL comes from `backend.base_url` when set, otherwise from the
/// loopback/remote selection in [`BackendConfig::resolve_base_url`].
///
/// [`BackendConfig::resolve_base_url`]: tb_domain::config::BackendConfig::resolve_base_url
pub fn create_backend(cfg: &Config, hostname: &str) -> Result<Arc<dyn TelemetryBackend>> {
    let base_url = cfg.backend.resolve_base_url(hostname);
    let client = RestBackendClient::new(&base_url, &cfg.backend)?;
    tracing::info!(
        base_url = %client.base_url(),
        hostname = %hostname,
        timeout_ms = cfg.backend.timeout_ms,
        "using REST telemetry backend"
    );
    Ok(Arc::new(client))
}
