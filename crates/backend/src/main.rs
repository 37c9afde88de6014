use axum::http::{header, Method};
use axum::middleware;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use backend::shared::app_state::AppState;
use backend::shared::config::{load_config, Credentials};
use backend::{routes, system};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Salesforce credentials may come from a .env file in the working directory
    let _ = dotenv();

    system::tracing::initialize()?;

    let config = load_config()?;
    let credentials = Credentials::from_env();
    if let Some(var) = credentials.missing() {
        tracing::warn!("{} is not set, every report run will fail to log in", var);
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();

    let state = AppState::new(config, credentials).shared();
    tracing::info!(
        "Line of business mapping: {} rules, default category '{}'",
        state.mapping.len(),
        state.mapping.default_category()
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let mut app = routes::configure_routes(state);
    if let Some(dir) = static_dir {
        tracing::info!("Serving frontend from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    tracing::info!("Attempting to bind server to http://{}:{}", host, port);
    let listener = match TcpListener::bind((host.as_str(), port)).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}:{}", host, port);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to {}:{}. Error: {}", host, port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
