use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tb_bridge::TelemetryBridge;
use tb_cli::cli::{self, Cli, Command, ConfigCommand};
use tb_domain::HistoryRange;

/// Log filter variable checked before `RUST_LOG`.
const LOG_ENV: &str = "TB_LOG";
const DEFAULT_FILTER: &str = "warn,tb_bridge=info,tb_backend=info,tb_domain=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = cli::config_path(cli.config.as_deref());
    let config = cli::load_config(&config_path)?;

    if let Command::Config(cmd) = &cli.command {
        match cmd {
            ConfigCommand::Validate => {
                if !cli::config::validate(&config, &config_path) {
                    std::process::exit(1);
                }
            }
            ConfigCommand::Show => cli::config::show(&config)?,
        }
        return Ok(());
    }

    let backend = tb_backend::create_backend(&config, &cli.host)?;
    let bridge = TelemetryBridge::new(backend, &config);

    match cli.command {
        Command::Tree { key, depth } => {
            let id = cli::parse_identifier(&bridge, &key);
            cli::browse::tree(&bridge, id, depth).await
        }
        Command::Resolve { key } => {
            cli::browse::resolve(&bridge, cli::parse_identifier(&bridge, &key)).await
        }
        Command::History { key, start, end } => {
            let id = cli::parse_identifier(&bridge, &key);
            cli::telemetry::history(&bridge, id, HistoryRange { start, end }).await
        }
        Command::Watch { key, count } => {
            let id = cli::parse_identifier(&bridge, &key);
            cli::telemetry::watch(&bridge, id, count).await
        }
        Command::Commands { key } => {
            cli::commands::list(&bridge, cli::parse_identifier(&bridge, &key)).await
        }
        Command::Exec { key, command, args } => {
            let id = cli::parse_identifier(&bridge, &key);
            if !cli::commands::exec(&bridge, id, &command, &args).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Images => cli::browse::images(&bridge).await,
        Command::Config(_) => Ok(()),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
fn init_tracing(json: bool) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}
