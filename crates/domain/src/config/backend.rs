use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Backend connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hostnames that select [`BackendConfig::local_url`].
pub const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", ""];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Explicit base URL. When set it wins over hostname-based selection.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "d_local_url")]
    pub local_url: String,
    #[serde(default = "d_remote_url")]
    pub remote_url: String,
    #[serde(default = "d_10000")]
    pub timeout_ms: u64,
    #[serde(default = "d_2")]
    pub max_retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            local_url: d_local_url(),
            remote_url: d_remote_url(),
            timeout_ms: 10_000,
            max_retries: 2,
        }
    }
}

impl BackendConfig {
    /// Pick the API base URL for a host running on `hostname`.
    ///
    /// Loopback hostnames (and an empty hostname, as seen when served from a
    /// file) talk to the local backend; anything else talks to the remote one.
    pub fn resolve_base_url(&self, hostname: &str) -> String {
        if let Some(ref url) = self.base_url {
            return url.trim_end_matches('/').to_owned();
        }
        let url = if LOOPBACK_HOSTS.contains(&hostname) {
            &self.local_url
        } else {
            &self.remote_url
        };
        url.trim_end_matches('/').to_owned()
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_local_url() -> String {
    "http://localhost:8082/api".into()
}
fn d_remote_url() -> String {
    "https://telemetry.example.org:8082/api".into()
}
fn d_10000() -> u64 {
    10_000
}
fn d_2() -> u32 {
    2
}
