use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Bridge behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Identifier namespace owned by the bridge.
    #[serde(default = "d_namespace")]
    pub namespace: String,
    /// Live subscription polling period.
    #[serde(default = "d_1000")]
    pub poll_interval_ms: u64,
    /// Simulated round-trip for commands sent to mock targets.
    #[serde(default = "d_500")]
    pub mock_command_delay_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: d_namespace(),
            poll_interval_ms: 1_000,
            mock_command_delay_ms: 500,
        }
    }
}

fn d_namespace() -> String {
    "telebridge".into()
}
fn d_1000() -> u64 {
    1_000
}
fn d_500() -> u64 {
    500
}
