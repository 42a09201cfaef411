//! Synthetic entities, telemetry and commands for degraded-mode operation.
//!
//! Everything here is deterministic except [`sample_mock_telemetry`], which
//! reads the wall clock so successive samples trace a smooth orbit.

use chrono::Utc;
use tb_domain::command::{ArgumentSpec, CommandSchema, CommandSpec};
use tb_domain::{Entity, TelemetryMetadata, TelemetrySample, ValueDescriptor};

/// Appended to mock entity display names so demo data is never mistaken
/// for the real thing.
pub const MOCK_NAME_SUFFIX: &str = " (MOCK)";

/// Orbit period divisor, in milliseconds per radian.
const ORBIT_MS_PER_RAD: f64 = 10_000.0;

pub fn list_mock_entities() -> Vec<Entity> {
    vec![
        Entity::new("mock-rover-1", "Mock Rover Alpha", "rover"),
        Entity::new("mock-base-1", "Lunar Base Beta", "base"),
    ]
}

pub fn find_mock_entity(entity_id: &str) -> Option<Entity> {
    list_mock_entities()
        .into_iter()
        .find(|e| e.entity_id == entity_id)
}

/// A fresh sample for `entity_id` at the current wall-clock time.
pub fn sample_mock_telemetry(entity_id: &str) -> TelemetrySample {
    sample_mock_telemetry_at(entity_id, Utc::now().timestamp_millis())
}

/// The sample a mock entity reports at `now_ms`.
pub fn sample_mock_telemetry_at(_entity_id: &str, now_ms: i64) -> TelemetrySample {
    let phase = now_ms as f64 / ORBIT_MS_PER_RAD;
    TelemetrySample::new()
        .with("timestamp", now_ms)
        .with("position.x", phase.sin() * 100.0)
        .with("position.y", 10.0)
        .with("position.z", phase.cos() * 100.0)
        .with("velocity.x", phase.cos() * 5.0)
        .with("velocity.y", 0.0)
        .with("velocity.z", -phase.sin() * 5.0)
        .with("controller_id", 1)
        .normalize()
}

pub fn list_mock_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "SET_MOTOR".into(),
            arguments: vec![ArgumentSpec::new("value", "float")],
        },
        CommandSpec {
            name: "STOP".into(),
            arguments: Vec::new(),
        },
    ]
}

/// Schema for a single mock target.
pub fn mock_command_schema(entity_id: &str) -> CommandSchema {
    let mut schema = CommandSchema::new();
    schema.insert(entity_id.to_owned(), list_mock_commands());
    schema
}

/// Default channel layout of a simulated body. Used for mock entities and
/// for backend entities the dictionary does not describe.
pub fn standard_channel_metadata() -> TelemetryMetadata {
    let r = ValueDescriptor::range;
    TelemetryMetadata::normalize(vec![
        ValueDescriptor::domain(),
        r("position.x", "Position X", Some("m"), "float"),
        r("position.y", "Position Y", Some("m"), "float"),
        r("position.z", "Position Z", Some("m"), "float"),
        r("velocity.x", "Velocity X", Some("m/s"), "float"),
        r("velocity.y", "Velocity Y", Some("m/s"), "float"),
        r("velocity.z", "Velocity Z", Some("m/s"), "float"),
        r("angular_velocity.x", "Angular Velocity X", Some("rad/s"), "float"),
        r("angular_velocity.y", "Angular Velocity Y", Some("rad/s"), "float"),
        r("angular_velocity.z", "Angular Velocity Z", Some("rad/s"), "float"),
        r("rotation.x", "Rotation X", Some("rad"), "float"),
        r("rotation.y", "Rotation Y", Some("rad"), "float"),
        r("rotation.z", "Rotation Z", Some("rad"), "float"),
        r("mass", "Mass", Some("kg"), "float"),
        r("controller_id", "Controller ID", None, "integer"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_domain::identifier::is_mock_id;
    use tb_domain::telemetry::DOMAIN_KEY;

    #[test]
    fn mock_entities_cover_rover_and_base() {
        let entities = list_mock_entities();
        assert!(entities.iter().any(|e| e.entity_type == "rover"));
        assert!(entities.iter().any(|e| e.entity_type == "base"));
        assert!(entities.iter().all(|e| is_mock_id(&e.entity_id)));
        assert_eq!(entities, list_mock_entities());
    }

    #[test]
    fn sample_is_analytic_in_time() {
        let s = sample_mock_telemetry_at("mock-rover-1", 0);
        assert_eq!(s.get("position.x").and_then(|v| v.as_f64()), Some(0.0));
        assert_eq!(s.get("position.z").and_then(|v| v.as_f64()), Some(100.0));
        assert_eq!(s.get("velocity.x").and_then(|v| v.as_f64()), Some(5.0));
        assert_eq!(s.get(DOMAIN_KEY), s.get("timestamp"));

        let later = sample_mock_telemetry_at("mock-rover-1", 1_000);
        let x = later.get("position.x").and_then(|v| v.as_f64()).unwrap();
        assert!((x - (0.1f64).sin() * 100.0).abs() < 1e-9);
    }

    #[test]
    fn successive_samples_stay_on_the_orbit() {
        for t in [0i64, 12_345, 987_654_321] {
            let s = sample_mock_telemetry_at("mock-base-1", t);
            let x = s.get("position.x").and_then(|v| v.as_f64()).unwrap();
            let z = s.get("position.z").and_then(|v| v.as_f64()).unwrap();
            assert!(((x * x + z * z).sqrt() - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn live_sample_carries_domain_value() {
        let s = sample_mock_telemetry("mock-rover-1");
        assert!(s.domain_value().is_some());
    }

    #[test]
    fn command_template() {
        let cmds = list_mock_commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].name, "SET_MOTOR");
        assert_eq!(cmds[0].arguments.len(), 1);
        assert_eq!(cmds[0].arguments[0].arg_type, "float");
        assert_eq!(cmds[1].name, "STOP");
        assert!(cmds[1].arguments.is_empty());

        let schema = mock_command_schema("mock-rover-1");
        assert_eq!(schema["mock-rover-1"], cmds);
    }

    #[test]
    fn standard_metadata_has_single_leading_domain() {
        let m = standard_channel_metadata();
        assert!(m.values()[0].is_domain());
        assert_eq!(m.values().iter().filter(|d| d.is_domain()).count(), 1);
        assert_eq!(m.values().len(), 15);
        assert_eq!(m.get("controller_id").unwrap().format, "integer");
    }
}
