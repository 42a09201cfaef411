//! `tb-bridge`: the object tree, telemetry and command surface that a
//! visualization host consumes.
//!
//! [`TelemetryBridge`] is the entry point. It resolves identifiers in its
//! namespace, lists children, serves history and polling subscriptions, and
//! validates and submits commands. When the backend has no entities or
//! cannot be reached, the entity folder is filled with mock entities whose
//! telemetry and commands are synthesized locally.

pub mod commands;
pub mod composition;
pub mod directory;
pub mod gallery;
pub mod mock;
pub mod plugin;
pub mod telemetry;

pub use commands::{CommandEngine, CommandOutcome, CommandTarget, SchemaCache};
pub use composition::CompositionBuilder;
pub use directory::EntityDirectory;
pub use plugin::{CommandView, TelemetryBridge};
pub use telemetry::{Subscription, TelemetryAccess};
