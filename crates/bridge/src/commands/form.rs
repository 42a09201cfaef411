//! Form description for a single command, one field per declared argument.

use serde::Serialize;
use serde_json::Value;
use tb_domain::command::{ArgType, ArgumentSpec, CommandSpec};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    Number { step: f64 },
    Checkbox,
    Select { options: Vec<String> },
    Vector3,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentField {
    pub name: String,
    pub label: String,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandForm {
    pub command: String,
    pub fields: Vec<ArgumentField>,
}

pub fn render_form(command: &CommandSpec) -> CommandForm {
    CommandForm {
        command: command.name.clone(),
        fields: command.arguments.iter().map(render_field).collect(),
    }
}

fn render_field(arg: &ArgumentSpec) -> ArgumentField {
    let input = match arg.kind() {
        ArgType::Float => InputKind::Number { step: 0.1 },
        ArgType::Int => InputKind::Number { step: 1.0 },
        ArgType::Bool => InputKind::Checkbox,
        ArgType::Enum => InputKind::Select {
            options: arg.value_literals(),
        },
        ArgType::Vector3 => InputKind::Vector3,
        ArgType::String => InputKind::Text,
    };
    ArgumentField {
        name: arg.name.clone(),
        label: format!("{} ({})", arg.name, arg.arg_type),
        input,
        placeholder: arg.default.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        description: arg.description.clone(),
    }
}
