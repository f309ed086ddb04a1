use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use visad::{
    ai::HttpCompletionClient, config::ServiceConfig, email, rest, storage::Storage, AppContext,
};

#[derive(Parser)]
#[command(
    name = "visad",
    about = "visad — immigration-assistance backend daemon",
    version
)]
struct Args {
    /// HTTP server port (overrides config.toml)
    #[arg(long, env = "VISAD_PORT")]
    port: Option<u16>,

    /// Data directory for config, uploads, and the SQLite database
    #[arg(long, env = "VISAD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VISAD_LOG")]
    log: Option<String>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "VISAD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "VISAD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.log.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Keep the file-appender guard alive for the whole process.
    let _file_guard = match &args.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "visad.log".to_string());
            let appender = tracing_appender::rolling::daily(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    };

    let data_dir = args
        .data_dir
        .unwrap_or_else(|| std::path::PathBuf::from("./data"));
    let mut config = ServiceConfig::load(&data_dir);
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind_address {
        config.server.bind_address = bind;
    }
    let config = Arc::new(config);

    info!("visad v{} starting", env!("CARGO_PKG_VERSION"));
    info!("data directory: {}", data_dir.display());
    if config.ai.api_key.is_none() {
        info!("AI backend disabled — recommendations use the rule fallback");
    }

    let storage = Arc::new(Storage::new(&data_dir).await?);
    let ai = Arc::new(HttpCompletionClient::new(&config.ai));
    let mailer = email::spawn(Arc::clone(&config));

    let ctx = Arc::new(AppContext::new(config, storage, ai, mailer));
    rest::start_rest_server(ctx).await
}
