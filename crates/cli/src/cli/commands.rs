//! `commands` and `exec`.

use std::collections::HashMap;

use tb_bridge::commands::InputKind;
use tb_bridge::TelemetryBridge;
use tb_domain::Identifier;

pub async fn list(bridge: &TelemetryBridge, id: Identifier) -> anyhow::Result<()> {
    let object = bridge.get(&id).await?;
    let view = bridge.command_view(&object).await?;
    if view.is_empty() {
        println!("{}", view.empty_message());
        return Ok(());
    }

    for form in view.forms() {
        println!("{}", form.command);
        for field in form.fields {
            let input = match field.input {
                InputKind::Number { step } => format!("number, step {step}"),
                InputKind::Checkbox => "checkbox".to_owned(),
                InputKind::Select { options } => format!("one of {}", options.join("|")),
                InputKind::Vector3 => "[x, y, z]".to_owned(),
                InputKind::Text => "text".to_owned(),
            };
            match field.placeholder {
                Some(default) => println!("  {} : {input} (default {default})", field.label),
                None => println!("  {} : {input}", field.label),
            }
        }
    }
    Ok(())
}

/// Execute and print the outcome. Returns whether the command succeeded.
pub async fn exec(
    bridge: &TelemetryBridge,
    id: Identifier,
    command: &str,
    raw_args: &[String],
) -> anyhow::Result<bool> {
    let inputs = parse_args(raw_args)?;
    let object = bridge.get(&id).await?;
    let outcome = bridge.execute_command(&object, command, &inputs).await?;
    if outcome.success {
        println!("{}", outcome.message);
    } else {
        println!("Error: {}", outcome.message);
    }
    Ok(outcome.success)
}

/// Split repeated `name=value` flags. The value may itself contain `=`.
pub fn parse_args(raw: &[String]) -> anyhow::Result<HashMap<String, String>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_owned(), value.to_owned()))
            }
            _ => anyhow::bail!("argument `{pair}` is not NAME=VALUE"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_equals() {
        let args = parse_args(&["label=a=b".into(), " speed =2".into()]).unwrap();
        assert_eq!(args["label"], "a=b");
        assert_eq!(args["speed"], "2");
    }

    #[test]
    fn rejects_missing_name() {
        assert!(parse_args(&["=1".into()]).is_err());
        assert!(parse_args(&["flag".into()]).is_err());
    }
}
