//! Command schema: which commands each target accepts and how their
//! arguments are typed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target name → commands it accepts. Targets keep the order the backend
/// listed them in.
pub type CommandSchema = IndexMap<String, Vec<CommandSpec>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(rename = "type", default = "d_type")]
    pub arg_type: String,
    /// Allowed literals for enum/options arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn d_type() -> String {
    "string".into()
}

impl ArgumentSpec {
    pub fn new(name: &str, arg_type: &str) -> Self {
        Self {
            name: name.into(),
            arg_type: arg_type.into(),
            values: None,
            default: None,
            description: None,
        }
    }

    pub fn kind(&self) -> ArgType {
        ArgType::parse(&self.arg_type)
    }

    /// Declared enum values rendered as the literals a user would pick.
    pub fn value_literals(&self) -> Vec<String> {
        self.values
            .iter()
            .flatten()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// Declared argument type. Unknown type names are treated as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Float,
    Int,
    Bool,
    Enum,
    Vector3,
    String,
}

impl ArgType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "float" => ArgType::Float,
            "int" => ArgType::Int,
            "bool" | "boolean" => ArgType::Bool,
            "enum" | "options" => ArgType::Enum,
            "vector3" => ArgType::Vector3,
            _ => ArgType::String,
        }
    }
}
