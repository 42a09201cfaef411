//! The host-facing facade: one object wiring directory, composition,
//! telemetry and commands over a shared backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tb_backend::TelemetryBackend;
use tb_domain::command::CommandSpec;
use tb_domain::config::Config;
use tb_domain::error::{Error, Result};
use tb_domain::identifier::ROOT_KEY;
use tb_domain::object::{type_definitions, TypeDefinition};
use tb_domain::{
    DomainObject, HistoryRange, Identifier, ImageEntry, ObjectType, TelemetryMetadata,
    TelemetrySample,
};

use crate::commands::{
    coerce_arguments, render_form, CommandEngine, CommandForm, CommandOutcome, CommandTarget,
    SchemaCache,
};
use crate::composition::CompositionBuilder;
use crate::directory::EntityDirectory;
use crate::gallery;
use crate::telemetry::{Subscription, TelemetryAccess};

/// What a commands view shows for one target.
#[derive(Debug, Clone, Serialize)]
pub struct CommandView {
    pub target: String,
    pub commands: Vec<CommandSpec>,
}

impl CommandView {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Placeholder text shown when the target has no commands.
    pub fn empty_message(&self) -> String {
        format!("No commands available for target: {}.", self.target)
    }

    pub fn forms(&self) -> Vec<CommandForm> {
        self.commands.iter().map(render_form).collect()
    }
}

pub struct TelemetryBridge {
    backend: Arc<dyn TelemetryBackend>,
    directory: EntityDirectory,
    composition: CompositionBuilder,
    telemetry: TelemetryAccess,
    engine: Arc<CommandEngine>,
}

impl TelemetryBridge {
    pub fn new(backend: Arc<dyn TelemetryBackend>, config: &Config) -> Self {
        Self::with_schema_cache(backend, config, Arc::new(SchemaCache::new()))
    }

    /// Build the bridge around a caller-owned schema cache, so the cache can
    /// outlive or be shared between bridges.
    pub fn with_schema_cache(
        backend: Arc<dyn TelemetryBackend>,
        config: &Config,
        cache: Arc<SchemaCache>,
    ) -> Self {
        let bridge = &config.bridge;
        let engine = Arc::new(CommandEngine::new(
            backend.clone(),
            cache,
            Duration::from_millis(bridge.mock_command_delay_ms),
        ));
        Self {
            directory: EntityDirectory::new(backend.clone(), bridge.namespace.clone()),
            composition: CompositionBuilder::new(
                backend.clone(),
                engine.clone(),
                bridge.namespace.clone(),
            ),
            telemetry: TelemetryAccess::new(
                backend.clone(),
                Duration::from_millis(bridge.poll_interval_ms),
            ),
            engine,
            backend,
        }
    }

    pub fn namespace(&self) -> &str {
        self.directory.namespace()
    }

    pub fn identifier(&self, key: impl Into<String>) -> Identifier {
        self.directory.identifier(key)
    }

    pub fn root(&self) -> Identifier {
        self.identifier(ROOT_KEY)
    }

    // ── objects ─────────────────────────────────────────────────────

    pub async fn get(&self, id: &Identifier) -> Result<DomainObject> {
        self.directory.resolve(id).await
    }

    pub fn applies_to(&self, object: &DomainObject) -> bool {
        self.composition.applies_to(object)
    }

    pub async fn load(&self, object: &DomainObject) -> Vec<Identifier> {
        self.composition.list_children(object).await
    }

    // ── telemetry ───────────────────────────────────────────────────

    fn carries_telemetry(&self, object: &DomainObject) -> bool {
        object.identifier.namespace == self.namespace() && object.object_type.has_telemetry()
    }

    pub fn supports_request(&self, object: &DomainObject) -> bool {
        self.carries_telemetry(object)
    }

    pub fn supports_subscribe(&self, object: &DomainObject) -> bool {
        self.carries_telemetry(object)
    }

    pub fn supports_metadata(&self, object: &DomainObject) -> bool {
        self.carries_telemetry(object)
    }

    /// History for the entity behind `object`. A point reads its parent
    /// entity's samples.
    pub async fn request(&self, object: &DomainObject, range: HistoryRange) -> Vec<TelemetrySample> {
        if !self.carries_telemetry(object) {
            return Vec::new();
        }
        let entity_id = object.identifier.decode().base_id;
        self.telemetry.fetch_history(&entity_id, range).await
    }

    pub fn subscribe<F>(&self, object: &DomainObject, callback: F) -> Result<Subscription>
    where
        F: Fn(TelemetrySample) + Send + Sync + 'static,
    {
        if !self.carries_telemetry(object) {
            return Err(Error::Other(format!(
                "{} does not carry telemetry",
                object.identifier
            )));
        }
        let entity_id = object.identifier.decode().base_id;
        Ok(self.telemetry.subscribe(&entity_id, callback))
    }

    pub fn get_metadata(&self, object: &DomainObject) -> Option<TelemetryMetadata> {
        object.telemetry.clone()
    }

    // ── commands ────────────────────────────────────────────────────

    pub async fn command_view(&self, object: &DomainObject) -> Result<CommandView> {
        let target = self.command_target(object)?;
        let commands = self.engine.commands_for(&target).await;
        Ok(CommandView {
            target: target.name,
            commands,
        })
    }

    /// Re-fetch the schema, then rebuild the view.
    pub async fn refresh_commands(&self, object: &DomainObject) -> Result<CommandView> {
        let target = self.command_target(object)?;
        if !target.is_mock() {
            self.engine.refresh_schema().await;
        }
        self.command_view(object).await
    }

    /// Validate raw `inputs` against the command's declared arguments and
    /// submit it. Validation errors are returned before any network call.
    pub async fn execute_command(
        &self,
        object: &DomainObject,
        command: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<CommandOutcome> {
        let target = self.command_target(object)?;
        let spec = self
            .engine
            .commands_for(&target)
            .await
            .into_iter()
            .find(|c| c.name == command)
            .ok_or_else(|| Error::NotFound(format!("command {command} on {}", target.name)))?;
        let arguments = coerce_arguments(&spec, inputs)?;
        self.engine.execute(&target, command, arguments).await
    }

    fn command_target(&self, object: &DomainObject) -> Result<CommandTarget> {
        if object.object_type != ObjectType::Commands {
            return Err(Error::Other(format!(
                "{} is not a command target",
                object.identifier
            )));
        }
        Ok(CommandTarget::from_object(object))
    }

    // ── misc ────────────────────────────────────────────────────────

    pub async fn gallery_images(&self) -> Vec<ImageEntry> {
        gallery::list_images(&self.backend).await
    }

    pub fn type_definitions(&self) -> Vec<TypeDefinition> {
        type_definitions()
    }
}
