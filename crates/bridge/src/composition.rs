//! Children of folders and entities in the object tree.

use std::sync::Arc;

use tb_backend::TelemetryBackend;
use tb_domain::identifier::{
    commands_key, global_controller_key, CONTROLLERS_FOLDER_KEY, ENTITIES_FOLDER_KEY, GALLERY_KEY,
};
use tb_domain::trace::TraceEvent;
use tb_domain::{DomainObject, Entity, Identifier, KeyKind, ObjectType};

use crate::commands::CommandEngine;
use crate::mock;

/// Keys listed under the root folder, in display order.
pub const ROOT_CHILDREN: [&str; 3] = [ENTITIES_FOLDER_KEY, CONTROLLERS_FOLDER_KEY, GALLERY_KEY];

pub struct CompositionBuilder {
    backend: Arc<dyn TelemetryBackend>,
    engine: Arc<CommandEngine>,
    namespace: String,
}

impl CompositionBuilder {
    pub fn new(
        backend: Arc<dyn TelemetryBackend>,
        engine: Arc<CommandEngine>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            engine,
            namespace: namespace.into(),
        }
    }

    pub fn applies_to(&self, object: &DomainObject) -> bool {
        object.identifier.namespace == self.namespace
            && matches!(object.object_type, ObjectType::Folder | ObjectType::Telemetry)
    }

    /// Child identifiers of `object`. Never fails: backend trouble degrades
    /// to mock entities or an empty list.
    pub async fn list_children(&self, object: &DomainObject) -> Vec<Identifier> {
        if object.object_type == ObjectType::Telemetry {
            return vec![self.id(commands_key(&object.identifier.key))];
        }

        match object.identifier.decode().kind {
            KeyKind::Root => ROOT_CHILDREN.iter().map(|k| self.id(*k)).collect(),
            KeyKind::EntitiesFolder => self
                .entities_or_mock()
                .await
                .into_iter()
                .map(|e| self.id(e.entity_id))
                .collect(),
            KeyKind::ControllersFolder => self.global_controllers().await,
            _ => Vec::new(),
        }
    }

    fn id(&self, key: impl Into<String>) -> Identifier {
        Identifier::new(self.namespace.clone(), key)
    }

    async fn entities_or_mock(&self) -> Vec<Entity> {
        let reason = match self.backend.entities().await {
            Ok(entities) if !entities.is_empty() => return entities,
            Ok(_) => "backend reported no entities".to_owned(),
            Err(e) => format!("backend unreachable: {e}"),
        };

        let mocks = mock::list_mock_entities();
        tracing::info!(reason = %reason, "entering degraded mode with mock entities");
        TraceEvent::DegradedMode {
            reason,
            mock_entities: mocks.len(),
        }
        .emit();
        mocks
    }

    /// Schema targets that are not entities, recomputed on every call.
    async fn global_controllers(&self) -> Vec<Identifier> {
        let entities = match self.backend.entities().await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!(error = %e, "cannot list controllers without entity list");
                return Vec::new();
            }
        };

        let schema = self.engine.load_schema().await;
        schema
            .keys()
            .filter(|target| !entities.iter().any(|e| &e.entity_name == *target))
            .map(|target| self.id(global_controller_key(target)))
            .collect()
    }
}
