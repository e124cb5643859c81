// Financial Literacy Game - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use finlit_game::api::{router, AppState};
use finlit_game::{config, db, Config};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG from it applies to the subscriber
    let env_file = config::load_dotenv()?;
    init_tracing();

    tracing::info!("🌐 Financial Literacy Game - Web Server v{}", finlit_game::VERSION);
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "loaded .env");
    }

    let config = Config::from_env().context("Failed to read configuration")?;

    // Open database once; storage endpoints degrade without it
    let store = db::connect(&config);

    let addr = config.bind_address();
    let app = router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("🚀 Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
