//! Resolved, host-consumable domain objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::telemetry::TelemetryMetadata;

/// Location of the top-level root object.
pub const ROOT_LOCATION: &str = "ROOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    Folder,
    Telemetry,
    TelemetryPoint,
    Commands,
    Gallery,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Folder => "folder",
            ObjectType::Telemetry => "telemetry",
            ObjectType::TelemetryPoint => "telemetry-point",
            ObjectType::Commands => "commands",
            ObjectType::Gallery => "gallery",
        }
    }

    /// Objects that carry telemetry metadata and a sample stream.
    pub fn has_telemetry(self) -> bool {
        matches!(self, ObjectType::Telemetry | ObjectType::TelemetryPoint)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainObject {
    pub identifier: Identifier,
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Parent as `namespace:key`, or [`ROOT_LOCATION`].
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetryMetadata>,
    /// Display name of the owning entity; the command lookup key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
}

impl DomainObject {
    pub fn new(
        identifier: Identifier,
        name: impl Into<String>,
        object_type: ObjectType,
        location: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            name: name.into(),
            object_type,
            location: location.into(),
            telemetry: None,
            entity_name: None,
        }
    }

    pub fn with_telemetry(mut self, metadata: TelemetryMetadata) -> Self {
        self.telemetry = Some(metadata);
        self
    }

    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }
}

/// Type registration handed to the host so it can label and iconify objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    pub object_type: ObjectType,
    pub name: &'static str,
    pub description: &'static str,
    pub css_class: &'static str,
}

/// Types the bridge registers with the host. Folders use the host's own
/// folder type and are not listed.
pub fn type_definitions() -> Vec<TypeDefinition> {
    vec![
        TypeDefinition {
            object_type: ObjectType::Telemetry,
            name: "Entity Telemetry",
            description: "Telemetry channels of a simulated entity",
            css_class: "icon-telemetry",
        },
        TypeDefinition {
            object_type: ObjectType::TelemetryPoint,
            name: "Telemetry Point",
            description: "A single telemetry channel of an entity",
            css_class: "icon-telemetry",
        },
        TypeDefinition {
            object_type: ObjectType::Commands,
            name: "Commands",
            description: "Control interface for the entity",
            css_class: "icon-command",
        },
        TypeDefinition {
            object_type: ObjectType::Gallery,
            name: "Gallery",
            description: "Images captured by the simulation",
            css_class: "icon-image",
        },
    ]
}
