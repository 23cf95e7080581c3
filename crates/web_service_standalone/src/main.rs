use std::path::PathBuf;

use anyhow::Context;
use chat_core::{paths, Config};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_service::AppState;

#[derive(Parser, Debug)]
#[command(name = "ai-chat-server")]
#[command(about = "Model catalog, title generation and identity service for the chat front-end")]
#[command(version)]
struct Cli {
    /// Server port
    #[arg(long, env = "APP_PORT", default_value = "8080")]
    port: u16,

    /// Bind address
    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Directory holding config.json and api_keys.json (defaults to ~/.ai-chat)
    #[arg(long, env = "AI_CHAT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    tracing::info!("Starting standalone web service...");

    let data_dir = cli.data_dir.unwrap_or_else(paths::data_dir);
    paths::ensure_dir(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let config = Config::from_data_dir(&data_dir);
    tracing::debug!(?config, data_dir = %data_dir.display(), "Loaded configuration");

    let app_state =
        AppState::from_config(config, data_dir).context("Failed to build application state")?;

    web_service::run(app_state, &cli.host, cli.port)
        .await
        .map_err(anyhow::Error::msg)
}
