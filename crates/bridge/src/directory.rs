//! Entity directory: resolves identifiers into [`DomainObject`]s.
//!
//! Structural keys (root, folders, gallery, global controllers) are answered
//! locally. Mock keys resolve against [`crate::mock`] only. Everything else
//! is looked up in the backend's entity list on every call; nothing is
//! cached, so resolving the same identifier twice yields equal objects as
//! long as the backend has not changed.

use std::sync::Arc;

use tb_backend::{Dictionary, TelemetryBackend};
use tb_domain::error::{Error, Result};
use tb_domain::identifier::{
    DecodedKey, KeyKind, CONTROLLERS_FOLDER_KEY, ENTITIES_FOLDER_KEY, ROOT_KEY,
};
use tb_domain::object::ROOT_LOCATION;
use tb_domain::trace::TraceEvent;
use tb_domain::{DomainObject, Entity, Identifier, ObjectType, TelemetryMetadata};

use crate::mock;

pub struct EntityDirectory {
    backend: Arc<dyn TelemetryBackend>,
    namespace: String,
}

impl EntityDirectory {
    pub fn new(backend: Arc<dyn TelemetryBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self, key: impl Into<String>) -> Identifier {
        Identifier::new(self.namespace.clone(), key)
    }

    /// Resolve an identifier into a freshly built domain object.
    ///
    /// Fails with [`Error::NotFound`] for foreign namespaces and keys outside
    /// the grammar, with [`Error::EntityNotFound`] when the backend does not
    /// list the entity, and with the transport error when the entity list
    /// cannot be fetched. Non-mock ids never fall back to mock data.
    pub async fn resolve(&self, id: &Identifier) -> Result<DomainObject> {
        if id.namespace != self.namespace {
            return Err(Error::NotFound(id.to_string()));
        }

        let decoded = id.decode();
        let object = match decoded.kind {
            KeyKind::Unrecognized => return Err(Error::NotFound(id.to_string())),
            KeyKind::Root
            | KeyKind::EntitiesFolder
            | KeyKind::ControllersFolder
            | KeyKind::Gallery
            | KeyKind::GlobalController => self.structural(id, &decoded),
            KeyKind::Commands | KeyKind::TelemetryPoint | KeyKind::Telemetry => {
                if decoded.is_mock() {
                    self.resolve_mock(id, &decoded)?
                } else {
                    self.resolve_backend(id, &decoded).await?
                }
            }
        };

        TraceEvent::ObjectResolved {
            key: id.key.clone(),
            object_type: object.object_type.to_string(),
            mock: decoded.is_mock(),
        }
        .emit();
        Ok(object)
    }

    // ── structural nodes ────────────────────────────────────────────

    fn structural(&self, id: &Identifier, decoded: &DecodedKey) -> DomainObject {
        let root_location = self.identifier(ROOT_KEY).location();
        match decoded.kind {
            KeyKind::Root => {
                DomainObject::new(id.clone(), "Simulation", ObjectType::Folder, ROOT_LOCATION)
            }
            KeyKind::EntitiesFolder => {
                DomainObject::new(id.clone(), "Entities", ObjectType::Folder, root_location)
            }
            KeyKind::ControllersFolder => {
                DomainObject::new(id.clone(), "Controllers", ObjectType::Folder, root_location)
            }
            KeyKind::Gallery => {
                DomainObject::new(id.clone(), "Gallery", ObjectType::Gallery, root_location)
            }
            // Global controller: a command target with no backing entity.
            _ => DomainObject::new(
                id.clone(),
                decoded.base_id.clone(),
                ObjectType::Commands,
                self.identifier(CONTROLLERS_FOLDER_KEY).location(),
            )
            .with_entity_name(decoded.base_id.clone()),
        }
    }

    // ── mock entities ───────────────────────────────────────────────

    fn resolve_mock(&self, id: &Identifier, decoded: &DecodedKey) -> Result<DomainObject> {
        let entity = mock::find_mock_entity(&decoded.base_id)
            .ok_or_else(|| Error::EntityNotFound(decoded.base_id.clone()))?;
        let display = format!("{}{}", entity.entity_name, mock::MOCK_NAME_SUFFIX);
        self.entity_object(id, decoded, &entity, display, mock::standard_channel_metadata())
    }

    // ── backend entities ────────────────────────────────────────────

    async fn resolve_backend(&self, id: &Identifier, decoded: &DecodedKey) -> Result<DomainObject> {
        let (entities, dictionary) = if decoded.kind == KeyKind::Commands {
            (self.backend.entities().await, None)
        } else {
            let (entities, dictionary) =
                tokio::join!(self.backend.entities(), self.backend.dictionary());
            (entities, Some(dictionary))
        };

        let entities = entities.map_err(|e| {
            tracing::warn!(key = %id.key, error = %e, "entity lookup failed");
            e
        })?;
        let entity = entities
            .into_iter()
            .find(|e| e.entity_id == decoded.base_id)
            .ok_or_else(|| Error::EntityNotFound(decoded.base_id.clone()))?;

        let metadata = match dictionary {
            Some(dict) => self.channel_metadata(&entity, dict),
            None => mock::standard_channel_metadata(),
        };
        let display = format!("{} ({})", entity.entity_name, entity.entity_type);
        self.entity_object(id, decoded, &entity, display, metadata)
    }

    /// Metadata for `entity` from the dictionary, or the standard layout
    /// when the dictionary is unavailable or silent about the entity.
    fn channel_metadata(&self, entity: &Entity, dict: Result<Dictionary>) -> TelemetryMetadata {
        match dict {
            Ok(dict) => match dict.measurement_for(entity) {
                Some(m) => TelemetryMetadata::normalize(m.values.clone()),
                None => mock::standard_channel_metadata(),
            },
            Err(e) => {
                tracing::warn!(
                    entity_id = %entity.entity_id,
                    error = %e,
                    "dictionary unavailable, using standard channel layout"
                );
                mock::standard_channel_metadata()
            }
        }
    }

    // ── object builders ─────────────────────────────────────────────

    fn entity_object(
        &self,
        id: &Identifier,
        decoded: &DecodedKey,
        entity: &Entity,
        display: String,
        metadata: TelemetryMetadata,
    ) -> Result<DomainObject> {
        let entity_location = self.identifier(entity.entity_id.clone()).location();
        match decoded.kind {
            KeyKind::Commands => Ok(DomainObject::new(
                id.clone(),
                "Commands",
                ObjectType::Commands,
                entity_location,
            )
            .with_entity_name(entity.entity_name.clone())),
            KeyKind::TelemetryPoint => {
                let point = decoded.point_key.as_deref().unwrap_or_default();
                let scoped = metadata
                    .point(point)
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                let name = scoped.values()[1].name.clone();
                Ok(
                    DomainObject::new(id.clone(), name, ObjectType::TelemetryPoint, entity_location)
                        .with_telemetry(scoped)
                        .with_entity_name(entity.entity_name.clone()),
                )
            }
            _ => Ok(DomainObject::new(
                id.clone(),
                display,
                ObjectType::Telemetry,
                self.identifier(ENTITIES_FOLDER_KEY).location(),
            )
            .with_telemetry(metadata)
            .with_entity_name(entity.entity_name.clone())),
        }
    }
}
