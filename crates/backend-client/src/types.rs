//! Wire DTOs for the telemetry backend's JSON API.
//!
//! Field names are `snake_case` on the wire, so no renames are needed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tb_domain::command::CommandSchema;
use tb_domain::{Entity, ImageEntry, TelemetrySample, ValueDescriptor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Entities & dictionary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /entities: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitiesResponse {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// GET /dictionary: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub key: String,
    #[serde(default)]
    pub values: Vec<ValueDescriptor>,
}

impl Dictionary {
    /// The measurement describing `entity`, matched by id, then type, then
    /// display name.
    pub fn measurement_for(&self, entity: &Entity) -> Option<&Measurement> {
        [&entity.entity_id, &entity.entity_type, &entity.entity_name]
            .into_iter()
            .filter(|k| !k.is_empty())
            .find_map(|k| self.measurements.iter().find(|m| &m.key == k))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Telemetry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /telemetry/{id}/history: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<TelemetrySample>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Commands
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /command: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandTargetsResponse {
    #[serde(default)]
    pub targets: CommandSchema,
}

/// POST /command: request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub target_path: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Status value the backend uses for a command that ran.
pub const STATUS_EXECUTED: &str = "executed";

/// POST /command: response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn is_executed(&self) -> bool {
        self.status == STATUS_EXECUTED
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Images
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /images: response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dictionary_matches_id_before_type() {
        let dict: Dictionary = serde_json::from_value(json!({
            "measurements": [
                { "key": "rover", "values": [{ "key": "mass" }] },
                { "key": "rover-7", "values": [{ "key": "battery" }] }
            ]
        }))
        .unwrap();
        let rover7 = Entity::new("rover-7", "Rover Seven", "rover");
        assert_eq!(dict.measurement_for(&rover7).unwrap().key, "rover-7");

        let rover8 = Entity::new("rover-8", "Rover Eight", "rover");
        assert_eq!(dict.measurement_for(&rover8).unwrap().key, "rover");

        let base = Entity::new("base-1", "Base", "base");
        assert!(dict.measurement_for(&base).is_none());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let e: EntitiesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(e.entities.is_empty());
        let h: HistoryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(h.history.is_empty());
    }

    #[test]
    fn command_response_status() {
        let ok: CommandResponse =
            serde_json::from_value(json!({ "status": "executed", "result": "ok" })).unwrap();
        assert!(ok.is_executed());
        let bad: CommandResponse =
            serde_json::from_value(json!({ "status": "rejected", "error": "busy" })).unwrap();
        assert!(!bad.is_executed());
        assert_eq!(bad.error.as_deref(), Some("busy"));
    }
}
