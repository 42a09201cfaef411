use serde::{Deserialize, Serialize};

/// An entity as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub entity_name: String,
    #[serde(default)]
    pub entity_type: String,
}

impl Entity {
    pub fn new(id: &str, name: &str, entity_type: &str) -> Self {
        Self {
            entity_id: id.into(),
            entity_name: name.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// One gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub url: String,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
}
