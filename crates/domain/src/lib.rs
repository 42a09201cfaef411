//! `tb-domain`: shared model for the telebridge crates.
//!
//! Holds the identifier codec, the resolved object model handed to the
//! visualization host, telemetry metadata and sample normalization, the
//! command schema types, configuration, the shared error type and the
//! structured trace events.

pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod object;
pub mod telemetry;
pub mod trace;

pub use entity::{Entity, ImageEntry};
pub use error::{Error, Result};
pub use identifier::{DecodedKey, Identifier, KeyKind, KeyOrigin};
pub use object::{DomainObject, ObjectType};
pub use telemetry::{HistoryRange, TelemetryMetadata, TelemetrySample, ValueDescriptor};
