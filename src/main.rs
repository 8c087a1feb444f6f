//! Skycast API server
//!
//! Serves the weather dashboard front-end and proxies OpenWeatherMap and
//! Groq behind three same-origin routes.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skycast::chat::ChatGateway;
use skycast::config::Config;
use skycast::providers::{GroqProvider, GROQ_BASE_URL};
use skycast::routes;
use skycast::session::MemorySessionStore;
use skycast::weather::{WeatherClient, OPENWEATHER_BASE_URL};
use skycast::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let weather = Arc::new(WeatherClient::new(
        config.openweather_api_key.clone(),
        OPENWEATHER_BASE_URL,
        config.upstream_timeout_secs,
    ));
    let provider = Arc::new(GroqProvider::new(
        config.groq_api_key.clone(),
        GROQ_BASE_URL,
        config.chat_model.clone(),
        config.upstream_timeout_secs,
    ));

    let state = AppState {
        weather: weather.clone(),
        gateway: Arc::new(ChatGateway::new(weather, provider)),
        sessions: Arc::new(MemorySessionStore::new()),
    };

    let app = routes::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Skycast running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
