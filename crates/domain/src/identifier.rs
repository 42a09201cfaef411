//! Identifier keys and the codec that turns them into an explicit [`KeyKind`].
//!
//! Key grammar, checked in this order (first match wins):
//!
//! | Key                          | Kind                |
//! |------------------------------|---------------------|
//! | `mock-…`                     | entity grammar below, mock origin |
//! | `root`                       | `Root`              |
//! | `entities` / `controllers`   | folder              |
//! | `gallery`                    | `Gallery`           |
//! | `global-controller-<name>`   | `GlobalController`  |
//! | `<id>-commands`              | `Commands`          |
//! | `<id>.<point>`               | `TelemetryPoint`    |
//! | `<id>`                       | `Telemetry`         |

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROOT_KEY: &str = "root";
pub const ENTITIES_FOLDER_KEY: &str = "entities";
pub const CONTROLLERS_FOLDER_KEY: &str = "controllers";
pub const GALLERY_KEY: &str = "gallery";

pub const MOCK_PREFIX: &str = "mock-";
pub const GLOBAL_CONTROLLER_PREFIX: &str = "global-controller-";
pub const COMMANDS_SUFFIX: &str = "-commands";
pub const POINT_SEPARATOR: char = '.';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Identifier
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Namespace + key pair addressing one domain object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub namespace: String,
    pub key: String,
}

impl Identifier {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// `namespace:key`, the form used in a child's `location` field.
    pub fn location(&self) -> String {
        format!("{}:{}", self.namespace, self.key)
    }

    pub fn decode(&self) -> DecodedKey {
        decode(&self.key)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Decoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Root,
    EntitiesFolder,
    ControllersFolder,
    Gallery,
    GlobalController,
    Commands,
    TelemetryPoint,
    Telemetry,
    Unrecognized,
}

/// Where the data behind a key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Mock,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    /// Entity id for entity-scoped kinds, controller name for global
    /// controllers, the key itself otherwise.
    pub base_id: String,
    pub kind: KeyKind,
    pub point_key: Option<String>,
    pub origin: KeyOrigin,
}

impl DecodedKey {
    pub fn is_mock(&self) -> bool {
        self.origin == KeyOrigin::Mock
    }

    fn new(base_id: &str, kind: KeyKind, origin: KeyOrigin) -> Self {
        Self {
            base_id: base_id.to_owned(),
            kind,
            point_key: None,
            origin,
        }
    }
}

/// Decode a key into its semantic parts. Total: keys outside the grammar
/// come back as [`KeyKind::Unrecognized`].
pub fn decode(key: &str) -> DecodedKey {
    if key.starts_with(MOCK_PREFIX) {
        return decode_entity_key(key, KeyOrigin::Mock);
    }

    match key {
        ROOT_KEY => return DecodedKey::new(key, KeyKind::Root, KeyOrigin::Backend),
        ENTITIES_FOLDER_KEY => {
            return DecodedKey::new(key, KeyKind::EntitiesFolder, KeyOrigin::Backend)
        }
        CONTROLLERS_FOLDER_KEY => {
            return DecodedKey::new(key, KeyKind::ControllersFolder, KeyOrigin::Backend)
        }
        GALLERY_KEY => return DecodedKey::new(key, KeyKind::Gallery, KeyOrigin::Backend),
        _ => {}
    }

    if let Some(name) = key.strip_prefix(GLOBAL_CONTROLLER_PREFIX) {
        let kind = if name.is_empty() {
            KeyKind::Unrecognized
        } else {
            KeyKind::GlobalController
        };
        let base = if name.is_empty() { key } else { name };
        return DecodedKey::new(base, kind, KeyOrigin::Backend);
    }

    decode_entity_key(key, KeyOrigin::Backend)
}

fn decode_entity_key(key: &str, origin: KeyOrigin) -> DecodedKey {
    let valid = |id: &str| match origin {
        KeyOrigin::Mock => id.len() > MOCK_PREFIX.len() && id.starts_with(MOCK_PREFIX),
        KeyOrigin::Backend => !id.is_empty(),
    };

    if let Some(base) = key.strip_suffix(COMMANDS_SUFFIX) {
        if valid(base) {
            return DecodedKey::new(base, KeyKind::Commands, origin);
        }
        return DecodedKey::new(key, KeyKind::Unrecognized, origin);
    }

    if let Some((base, point)) = key.split_once(POINT_SEPARATOR) {
        if valid(base) && !point.is_empty() {
            return DecodedKey {
                base_id: base.to_owned(),
                kind: KeyKind::TelemetryPoint,
                point_key: Some(point.to_owned()),
                origin,
            };
        }
        return DecodedKey::new(key, KeyKind::Unrecognized, origin);
    }

    if valid(key) {
        DecodedKey::new(key, KeyKind::Telemetry, origin)
    } else {
        DecodedKey::new(key, KeyKind::Unrecognized, origin)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Encoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn commands_key(entity_id: &str) -> String {
    format!("{entity_id}{COMMANDS_SUFFIX}")
}

pub fn point_key(entity_id: &str, point: &str) -> String {
    format!("{entity_id}{POINT_SEPARATOR}{point}")
}

pub fn global_controller_key(name: &str) -> String {
    format!("{GLOBAL_CONTROLLER_PREFIX}{name}")
}

pub fn is_mock_id(entity_id: &str) -> bool {
    entity_id.starts_with(MOCK_PREFIX)
}
