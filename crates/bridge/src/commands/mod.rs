//! Command schema lookup, argument handling and execution.

pub mod cache;
pub mod coerce;
pub mod form;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tb_backend::{CommandRequest, TelemetryBackend};
use tb_domain::command::{CommandSchema, CommandSpec};
use tb_domain::error::Result;
use tb_domain::identifier::is_mock_id;
use tb_domain::trace::TraceEvent;
use tb_domain::DomainObject;

use crate::mock;

pub use cache::SchemaCache;
pub use coerce::{coerce_argument, coerce_arguments};
pub use form::{render_form, ArgumentField, CommandForm, InputKind};

/// Message reported for any successful mock execution.
pub const MOCK_EXECUTED_MESSAGE: &str = "Executed (MOCK)";

/// Who a command is addressed to: the entity (or controller) id and the
/// display name the backend indexes its schema by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    pub id: String,
    pub name: String,
}

impl CommandTarget {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Target of a resolved commands object. Falls back to the id when the
    /// object carries no entity name.
    pub fn from_object(object: &DomainObject) -> Self {
        let id = object.identifier.decode().base_id;
        let name = object.entity_name.clone().unwrap_or_else(|| id.clone());
        Self { id, name }
    }

    pub fn is_mock(&self) -> bool {
        is_mock_id(&self.id)
    }
}

/// Result shown to the operator after an execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

pub struct CommandEngine {
    backend: Arc<dyn TelemetryBackend>,
    cache: Arc<SchemaCache>,
    mock_delay: Duration,
}

impl CommandEngine {
    pub fn new(
        backend: Arc<dyn TelemetryBackend>,
        cache: Arc<SchemaCache>,
        mock_delay: Duration,
    ) -> Self {
        Self {
            backend,
            cache,
            mock_delay,
        }
    }

    /// The schema, fetched once and then served from the cache. A failed
    /// fetch yields an empty schema and leaves the cache unset so the next
    /// call tries again.
    pub async fn load_schema(&self) -> Arc<CommandSchema> {
        if let Some(schema) = self.cache.get() {
            return schema;
        }
        match self.backend.command_targets().await {
            Ok(schema) => {
                tracing::debug!(targets = schema.len(), "command schema loaded");
                self.cache.replace(schema)
            }
            Err(e) => {
                tracing::warn!(error = %e, "command schema unavailable");
                Arc::new(CommandSchema::new())
            }
        }
    }

    /// Fetch the schema unconditionally. The cache is only replaced on
    /// success.
    pub async fn refresh_schema(&self) -> Arc<CommandSchema> {
        match self.backend.command_targets().await {
            Ok(schema) => {
                tracing::info!(targets = schema.len(), "command schema refreshed");
                self.cache.replace(schema)
            }
            Err(e) => {
                tracing::warn!(error = %e, "command schema refresh failed, keeping previous");
                Arc::new(CommandSchema::new())
            }
        }
    }

    /// Commands available to `target`; empty when the schema has none.
    pub async fn commands_for(&self, target: &CommandTarget) -> Vec<CommandSpec> {
        if target.is_mock() {
            return mock::list_mock_commands();
        }
        let schema = self.load_schema().await;
        schema
            .get(&target.name)
            .or_else(|| schema.get(&target.id))
            .cloned()
            .unwrap_or_default()
    }

    /// Submit `command` to `target` with already-coerced arguments.
    ///
    /// Mock targets never touch the backend. A transport failure is returned
    /// as an error; a backend that answers with a non-executed status is a
    /// failed [`CommandOutcome`].
    pub async fn execute(
        &self,
        target: &CommandTarget,
        command: &str,
        arguments: Map<String, Value>,
    ) -> Result<CommandOutcome> {
        let mock = target.is_mock();
        let outcome = if mock {
            tracing::info!(target = %target.id, command, ?arguments, "mock command execution");
            tokio::time::sleep(self.mock_delay).await;
            CommandOutcome {
                success: true,
                message: MOCK_EXECUTED_MESSAGE.into(),
            }
        } else {
            let resp = self
                .backend
                .execute_command(CommandRequest {
                    target_path: target.name.clone(),
                    name: command.to_owned(),
                    arguments,
                })
                .await?;
            if resp.is_executed() {
                CommandOutcome {
                    success: true,
                    message: resp
                        .result
                        .map(|v| match v {
                            Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .unwrap_or_else(|| "Success".into()),
                }
            } else {
                CommandOutcome {
                    success: false,
                    message: resp.error.unwrap_or_else(|| "Unknown".into()),
                }
            }
        };

        TraceEvent::CommandExecuted {
            target: target.name.clone(),
            command: command.to_owned(),
            success: outcome.success,
            mock,
        }
        .emit();
        Ok(outcome)
    }
}
