//! Turning raw form input into typed command arguments.
//!
//! | Declared type       | Input            | Submitted value            |
//! |---------------------|------------------|----------------------------|
//! | `float`             | `"1.5"`          | `1.5`                      |
//! | `int`               | `"42"`, `"4.9"`  | `42`, `4`                  |
//! | `bool` / `boolean`  | `"true"`, `""`   | `true`, `false`            |
//! | `enum` / `options`  | `"eco"`          | `"eco"`                    |
//! | `vector3`           | `"[1, 2, 3]"`    | `[1.0, 2.0, 3.0]`          |
//! | anything else       | `"abc"`          | `"abc"`                    |
//!
//! Empty or absent non-boolean arguments are left out of the payload so the
//! backend applies its own defaults.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use tb_domain::command::{ArgType, ArgumentSpec, CommandSpec};
use tb_domain::error::{Error, Result};

/// Coerce every declared argument of `command` from `inputs`.
///
/// Inputs for names the command does not declare are ignored.
pub fn coerce_arguments(
    command: &CommandSpec,
    inputs: &HashMap<String, String>,
) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for spec in &command.arguments {
        let raw = inputs.get(&spec.name).map(String::as_str);
        if let Some(value) = coerce_argument(spec, raw)? {
            out.insert(spec.name.clone(), value);
        }
    }
    for name in inputs.keys() {
        if !command.arguments.iter().any(|a| &a.name == name) {
            tracing::debug!(command = %command.name, argument = %name, "ignoring undeclared argument");
        }
    }
    Ok(out)
}

/// Coerce one raw input. `Ok(None)` means "omit from the payload".
pub fn coerce_argument(spec: &ArgumentSpec, raw: Option<&str>) -> Result<Option<Value>> {
    let text = raw.map(str::trim).unwrap_or_default();
    let kind = spec.kind();

    let value = match kind {
        ArgType::Bool => Value::Bool(parse_bool(spec, text)?),
        _ if text.is_empty() => return Ok(None),
        ArgType::Float => Value::Number(parse_float(spec, text)?),
        ArgType::Int => Value::from(parse_int(spec, text)?),
        ArgType::Enum => Value::String(parse_enum(spec, text)?),
        ArgType::Vector3 => parse_vector3(spec, text)?,
        ArgType::String => Value::String(raw.unwrap_or_default().to_owned()),
    };
    Ok(Some(value))
}

fn invalid(spec: &ArgumentSpec, message: impl Into<String>) -> Error {
    Error::Validation {
        argument: spec.name.clone(),
        message: message.into(),
    }
}

fn finite(spec: &ArgumentSpec, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(spec, format!("`{text}` is not a number")))
}

fn parse_float(spec: &ArgumentSpec, text: &str) -> Result<Number> {
    let v = finite(spec, text)?;
    Number::from_f64(v).ok_or_else(|| invalid(spec, format!("`{text}` is not a number")))
}

fn parse_int(spec: &ArgumentSpec, text: &str) -> Result<i64> {
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v);
    }
    let v = finite(spec, text)
        .map_err(|_| invalid(spec, format!("`{text}` is not an integer")))?
        .trunc();
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return Err(invalid(spec, format!("`{text}` is out of range")));
    }
    Ok(v as i64)
}

fn parse_bool(spec: &ArgumentSpec, text: &str) -> Result<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(spec, format!("`{text}` is not a boolean"))),
    }
}

fn parse_enum(spec: &ArgumentSpec, text: &str) -> Result<String> {
    let allowed = spec.value_literals();
    if allowed.is_empty() || allowed.iter().any(|v| v == text) {
        Ok(text.to_owned())
    } else {
        Err(invalid(
            spec,
            format!("`{text}` is not one of [{}]", allowed.join(", ")),
        ))
    }
}

fn parse_vector3(spec: &ArgumentSpec, text: &str) -> Result<Value> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| invalid(spec, format!("`{text}` is not a [x, y, z] literal")))?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(invalid(
            spec,
            format!("expected 3 components, got {}", parts.len()),
        ));
    }

    let mut components = Vec::with_capacity(3);
    for part in parts {
        components.push(Value::Number(parse_float(spec, part)?));
    }
    Ok(Value::Array(components))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arg(kind: &str) -> ArgumentSpec {
        ArgumentSpec::new("x", kind)
    }

    fn coerce(kind: &str, raw: &str) -> Result<Option<Value>> {
        coerce_argument(&arg(kind), Some(raw))
    }

    fn as_f64s(v: &Value) -> Vec<f64> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|n| n.as_f64().unwrap())
            .collect()
    }

    #[test]
    fn vector3_parses_bracketed_literal() {
        let v = coerce("vector3", "[1,2,3]").unwrap().unwrap();
        assert_eq!(as_f64s(&v), vec![1.0, 2.0, 3.0]);

        let spaced = coerce("vector3", " [ -1.5 , 0, 2e3 ] ").unwrap().unwrap();
        assert_eq!(as_f64s(&spaced), vec![-1.5, 0.0, 2000.0]);
    }

    #[test]
    fn vector3_rejects_malformed_literals() {
        for bad in ["abc", "1,2,3", "[1,2]", "[1,2,3,4]", "[1,x,3]", "[]", "[1,,3]"] {
            let err = coerce("vector3", bad).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "input {bad:?}");
        }
    }

    #[test]
    fn float_and_int() {
        assert_eq!(coerce("float", "1.25").unwrap(), Some(json!(1.25)));
        assert_eq!(coerce("int", "42").unwrap(), Some(json!(42)));
        assert_eq!(coerce("int", "-4.9").unwrap(), Some(json!(-4)));
        assert!(coerce("float", "fast").is_err());
        assert!(coerce("float", "NaN").is_err());
        assert!(coerce("int", "many").is_err());
    }

    #[test]
    fn booleans_are_always_submitted() {
        assert_eq!(coerce_argument(&arg("bool"), None).unwrap(), Some(json!(false)));
        assert_eq!(coerce("boolean", "").unwrap(), Some(json!(false)));
        assert_eq!(coerce("boolean", "ON").unwrap(), Some(json!(true)));
        assert_eq!(coerce("bool", "0").unwrap(), Some(json!(false)));
        assert!(coerce("bool", "maybe").is_err());
    }

    #[test]
    fn empty_non_booleans_are_omitted() {
        for kind in ["float", "int", "enum", "vector3", "string"] {
            assert_eq!(coerce(kind, "").unwrap(), None, "{kind}");
            assert_eq!(coerce(kind, "   ").unwrap(), None, "{kind}");
            assert_eq!(coerce_argument(&arg(kind), None).unwrap(), None, "{kind}");
        }
    }

    #[test]
    fn enum_checks_declared_values() {
        let mut spec = ArgumentSpec::new("mode", "options");
        spec.values = Some(vec![json!("eco"), json!("sport")]);
        assert_eq!(coerce_argument(&spec, Some("sport")).unwrap(), Some(json!("sport")));
        assert!(coerce_argument(&spec, Some("turbo")).is_err());

        // No declared values: any literal passes through.
        assert_eq!(coerce("enum", "turbo").unwrap(), Some(json!("turbo")));
    }

    #[test]
    fn strings_pass_through_verbatim() {
        assert_eq!(coerce("string", " hi ").unwrap(), Some(json!(" hi ")));
        assert_eq!(coerce("quaternion", "[0,0,0,1]").unwrap(), Some(json!("[0,0,0,1]")));
    }

    #[test]
    fn coerce_arguments_builds_sparse_payload() {
        let cmd = CommandSpec {
            name: "DRIVE".into(),
            arguments: vec![
                ArgumentSpec::new("speed", "float"),
                ArgumentSpec::new("lights", "bool"),
                ArgumentSpec::new("target", "vector3"),
            ],
        };
        let mut inputs = HashMap::new();
        inputs.insert("speed".to_string(), "2.5".to_string());
        inputs.insert("bogus".to_string(), "1".to_string());

        let args = coerce_arguments(&cmd, &inputs).unwrap();
        assert_eq!(Value::Object(args), json!({ "speed": 2.5, "lights": false }));
    }

    #[test]
    fn coerce_arguments_stops_on_first_invalid() {
        let cmd = CommandSpec {
            name: "GOTO".into(),
            arguments: vec![ArgumentSpec::new("target", "vector3")],
        };
        let mut inputs = HashMap::new();
        inputs.insert("target".to_string(), "abc".to_string());
        let err = coerce_arguments(&cmd, &inputs).unwrap_err();
        assert!(err.to_string().contains("target"));
    }
}
