// src/main.rs

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use mbbs_tutor::api::http_router;
use mbbs_tutor::llm::GroqProvider;
use mbbs_tutor::memory::SqliteSessionStore;
use mbbs_tutor::{create_app_state, TutorConfig};

#[derive(Parser)]
#[command(name = "mbbs-tutor")]
#[command(about = "Exam-oriented MBBS tutoring assistant with rolling memory")]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "TUTOR_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TUTOR_PORT")]
    port: Option<u16>,

    /// SQLite URL, e.g. sqlite://local.db or sqlite::memory:
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // CLI args fall back to env, so .env has to be loaded first
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = TutorConfig::from_env()?;

    // RUST_LOG wins over LOG_LEVEL
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    info!("Starting MBBS tutor");
    info!("Model: {}", config.model);
    info!(
        "Memory: window={}, summary every {} ({:?})",
        config.recent_limit, config.summary_every, config.summary_trigger
    );
    if config.uses_default_secret() {
        warn!("Using the default cookie secret; set TUTOR_SECRET_KEY in production");
    }

    let store = SqliteSessionStore::connect(&config.database_url, config.sqlite_max_connections)
        .await?
        .with_summary_cap(config.summary_max_chars);

    let provider = GroqProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
        config.llm_timeout_secs,
    )?;

    let bind_address = config.bind_address();
    let app_state = Arc::new(create_app_state(config, Arc::new(store), Arc::new(provider)));
    let app = http_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
