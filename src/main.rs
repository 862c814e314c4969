//! music-brief server binary entry point.

use std::sync::Arc;

use music_brief::cli::Cli;
use music_brief::config::BriefConfig;
use music_brief::provider::GeminiClient;
use music_brief::server::{build_router, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,music_brief=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().with_ansi(false).init();
    } else {
        builder.compact().init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = BriefConfig::load(cli.config.as_deref(), cli.overrides())?;
    info!(?config, "configuration loaded");

    let address = config.bind_address();
    let upstream = GeminiClient::new(config)?;
    let app = build_router(AppState::new(Arc::new(upstream)));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{address}");
    axum::serve(listener, app).await?;

    Ok(())
}
