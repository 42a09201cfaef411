//! Telemetry metadata and samples as handed to the host.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical key of the time axis.
pub const DOMAIN_KEY: &str = "utc";
/// Raw time field the backend puts on samples.
pub const TIMESTAMP_FIELD: &str = "timestamp";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Value descriptors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDescriptor {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default = "d_format")]
    pub format: String,
    #[serde(default)]
    pub hints: Hints,
}

fn d_format() -> String {
    "float".into()
}

impl ValueDescriptor {
    /// The canonical time-axis descriptor.
    pub fn domain() -> Self {
        Self {
            key: DOMAIN_KEY.into(),
            source: Some(TIMESTAMP_FIELD.into()),
            name: "Timestamp".into(),
            unit: None,
            format: "utc".into(),
            hints: Hints {
                domain: Some(1),
                ..Hints::default()
            },
        }
    }

    /// A plotted numeric channel.
    pub fn range(key: &str, name: &str, unit: Option<&str>, format: &str) -> Self {
        Self {
            key: key.into(),
            source: None,
            name: name.into(),
            unit: unit.map(str::to_owned),
            format: format.into(),
            hints: Hints {
                range: Some(1),
                ..Hints::default()
            },
        }
    }

    pub fn is_domain(&self) -> bool {
        self.hints.domain.is_some()
    }

    /// Whether this descriptor reads the raw timestamp field.
    pub fn is_timestamp(&self) -> bool {
        self.key == TIMESTAMP_FIELD
            || self.key == DOMAIN_KEY
            || self.source.as_deref() == Some(TIMESTAMP_FIELD)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Metadata
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ordered value descriptors; `values[0]` is always the single domain
/// descriptor. Deserialized metadata is normalized on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMetadata")]
pub struct TelemetryMetadata {
    values: Vec<ValueDescriptor>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    values: Vec<ValueDescriptor>,
}

impl From<RawMetadata> for TelemetryMetadata {
    fn from(raw: RawMetadata) -> Self {
        Self::normalize(raw.values)
    }
}

impl TelemetryMetadata {
    /// Normalize raw dictionary descriptors.
    ///
    /// The first domain-hinted or timestamp-sourced descriptor becomes the
    /// domain descriptor (rewritten to the canonical key when it reads the
    /// timestamp field); further ones are dropped. If there is none, the
    /// canonical descriptor is synthesized. Every other descriptor ends up
    /// with a `range` or `image` hint.
    pub fn normalize(raw: impl IntoIterator<Item = ValueDescriptor>) -> Self {
        let mut domain: Option<ValueDescriptor> = None;
        let mut rest: Vec<ValueDescriptor> = Vec::new();

        for mut d in raw {
            if d.is_domain() || d.is_timestamp() {
                if domain.is_none() {
                    domain = Some(if d.is_timestamp() {
                        ValueDescriptor::domain()
                    } else {
                        d.hints = Hints {
                            domain: Some(1),
                            ..Hints::default()
                        };
                        d
                    });
                }
                continue;
            }
            if rest.iter().any(|r| r.key == d.key) {
                continue;
            }
            if d.name.is_empty() {
                d.name = d.key.clone();
            }
            if d.format == "image" && d.hints.image.is_none() {
                d.hints.image = Some(1);
            }
            if d.hints.range.is_none() && d.hints.image.is_none() {
                d.hints.range = Some(1);
            }
            rest.push(d);
        }

        let mut values = Vec::with_capacity(rest.len() + 1);
        values.push(domain.unwrap_or_else(ValueDescriptor::domain));
        values.extend(rest);
        Self { values }
    }

    pub fn values(&self) -> &[ValueDescriptor] {
        &self.values
    }

    pub fn domain(&self) -> &ValueDescriptor {
        &self.values[0]
    }

    pub fn get(&self, key: &str) -> Option<&ValueDescriptor> {
        self.values.iter().find(|d| d.key == key)
    }

    /// Metadata scoped to one point: the domain descriptor plus `key`.
    pub fn point(&self, key: &str) -> Option<TelemetryMetadata> {
        let d = self.values[1..].iter().find(|d| d.key == key)?;
        Some(Self {
            values: vec![self.domain().clone(), d.clone()],
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Samples
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One telemetry datum: value key → number or string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetrySample(pub Map<String, Value>);

impl TelemetrySample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn has_time(&self) -> bool {
        self.0.contains_key(TIMESTAMP_FIELD) || self.0.contains_key(DOMAIN_KEY)
    }

    /// Copy `timestamp` into the domain key when the domain key is absent.
    pub fn normalize(mut self) -> Self {
        if !self.0.contains_key(DOMAIN_KEY) {
            if let Some(ts) = self.0.get(TIMESTAMP_FIELD).cloned() {
                self.0.insert(DOMAIN_KEY.to_owned(), ts);
            }
        }
        self
    }

    /// The domain value as milliseconds, when numeric.
    pub fn domain_value(&self) -> Option<f64> {
        self.0
            .get(DOMAIN_KEY)
            .or_else(|| self.0.get(TIMESTAMP_FIELD))
            .and_then(Value::as_f64)
    }
}

/// Bounds for a history request, in domain units (epoch ms).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}
