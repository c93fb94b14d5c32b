//! Service entry point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forecast_server::config::Config;
use forecast_server::history::PgHistoryStore;
use forecast_server::http::{self, AppState};

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_server=info,tower_http=info".into()),
        )
        .init();

    // Fail fast on incomplete configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            std::process::exit(1);
        }
    };

    let store = match PgHistoryStore::connect(&config.database_url, &config.history) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("database configuration error: {}", err);
            std::process::exit(1);
        }
    };

    let state = AppState {
        model: config.model,
        store: Arc::new(store),
    };
    let app = http::router(state);

    tracing::info!(
        "forecast_server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
