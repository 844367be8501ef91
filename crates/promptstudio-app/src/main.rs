use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use promptstudio_app::routes::create_router;
use promptstudio_app::{AppState, Settings};

#[derive(Debug, Parser)]
#[command(name = "promptstudio", about = "Prompt engineering studio backend")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:8000", env = "PROMPTSTUDIO_BIND")]
    bind: SocketAddr,

    /// Directory for the JSON stores (overrides PROMPTSTUDIO_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptstudio=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }
    if !settings.has_api_key() {
        tracing::warn!("OPENROUTER_API_KEY not set; chat and optimize endpoints are disabled");
    }

    let state = AppState::new(settings)?;

    // Local dev frontends only
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    tracing::info!("listening on http://{}", cli.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
