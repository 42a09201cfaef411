pub mod browse;
pub mod commands;
pub mod config;
pub mod telemetry;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tb_bridge::TelemetryBridge;
use tb_domain::config::Config;
use tb_domain::Identifier;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "telebridge.toml";

/// Browse and command entities of a telemetry backend.
#[derive(Debug, Parser)]
#[command(name = "telebridge", version, about)]
pub struct Cli {
    /// Config file (defaults to $TB_CONFIG, then telebridge.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Hostname the bridge is served from; selects the local or remote
    /// backend URL when none is configured.
    #[arg(long, global = true, default_value = "localhost")]
    pub host: String,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the object tree below a key.
    Tree {
        /// Start key (`key` or `namespace:key`).
        #[arg(default_value = "root")]
        key: String,
        /// Maximum depth to descend.
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },
    /// Resolve one key and print the object as JSON.
    Resolve { key: String },
    /// Print historical samples for a telemetry object.
    History {
        key: String,
        /// Range start, epoch milliseconds.
        #[arg(long)]
        start: Option<i64>,
        /// Range end, epoch milliseconds.
        #[arg(long)]
        end: Option<i64>,
    },
    /// Poll a telemetry object and print samples until interrupted.
    Watch {
        key: String,
        /// Stop after this many samples.
        #[arg(long)]
        count: Option<usize>,
    },
    /// List the commands a commands object accepts.
    Commands { key: String },
    /// Execute a command on a commands object.
    Exec {
        key: String,
        command: String,
        /// Argument as `name=value`; repeatable.
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,
    },
    /// List gallery images.
    Images,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any issues.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Resolve the config path from the flag, then `TB_CONFIG`, then the
/// default file name.
pub fn config_path(flag: Option<&str>) -> String {
    flag.map(str::to_owned)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into())
}

/// Load the config at `path` (defaults when the file is absent) and apply
/// environment overrides.
pub fn load_config(path: &str) -> anyhow::Result<Config> {
    let config = if std::path::Path::new(path).exists() {
        Config::load(path).with_context(|| format!("loading {path}"))?
    } else {
        Config::default()
    };
    Ok(config.with_env_overrides())
}

/// Parse `key` or `namespace:key` into an identifier in the bridge's
/// namespace by default.
pub fn parse_identifier(bridge: &TelemetryBridge, raw: &str) -> Identifier {
    match raw.split_once(':') {
        Some((ns, key)) => Identifier::new(ns, key),
        None => bridge.identifier(raw),
    }
}
