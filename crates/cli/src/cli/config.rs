use tb_domain::config::{Config, ConfigSeverity};

/// Print validation issues. Returns `false` when any is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    for issue in &issues {
        println!("{issue}");
    }
    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count,
        issues.len() - error_count,
    );

    error_count == 0
}

/// Dump the resolved config (defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
