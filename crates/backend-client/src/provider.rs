//! The `TelemetryBackend` trait defines the interface to the telemetry
//! service (REST, in-memory test doubles).

use async_trait::async_trait;
use tb_domain::command::CommandSchema;
use tb_domain::error::Result;
use tb_domain::{Entity, HistoryRange, ImageEntry, TelemetrySample};

use crate::types::{CommandRequest, CommandResponse, Dictionary};

/// Abstraction over the telemetry backend API surface.
///
/// Implementations return raw backend data; normalization and fallback
/// policy live in the bridge.
#[async_trait]
pub trait TelemetryBackend: Send + Sync {
    /// All registered entities, in backend order (GET /entities).
    async fn entities(&self) -> Result<Vec<Entity>>;

    /// Channel dictionary (GET /dictionary).
    async fn dictionary(&self) -> Result<Dictionary>;

    /// Historical samples, ascending by time (GET /telemetry/{id}/history).
    async fn history(&self, entity_id: &str, range: HistoryRange)
        -> Result<Vec<TelemetrySample>>;

    /// Most recent sample (GET /telemetry/{id}).
    async fn latest(&self, entity_id: &str) -> Result<TelemetrySample>;

    /// Command schema for every target (GET /command).
    async fn command_targets(&self) -> Result<CommandSchema>;

    /// Submit a command (POST /command). Never retried.
    async fn execute_command(&self, req: CommandRequest) -> Result<CommandResponse>;

    /// Gallery images (GET /images).
    async fn images(&self) -> Result<Vec<ImageEntry>>;
}
