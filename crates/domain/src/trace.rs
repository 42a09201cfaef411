use serde::Serialize;

/// Structured trace events emitted across all telebridge crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    BackendCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    ObjectResolved {
        key: String,
        object_type: String,
        mock: bool,
    },
    /// The entity listing switched to synthetic entities.
    DegradedMode {
        reason: String,
        mock_entities: usize,
    },
    SubscriptionStarted {
        entity_id: String,
        period_ms: u64,
    },
    SubscriptionStopped {
        entity_id: String,
    },
    CommandExecuted {
        target: String,
        command: String,
        success: bool,
        mock: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "tb_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let ev = TraceEvent::DegradedMode {
            reason: "empty entity list".into(),
            mock_entities: 2,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["event"], "DegradedMode");
        assert_eq!(v["mock_entities"], 2);
    }
}
