use std::{ net::SocketAddr, sync::Arc };

use anyhow::Context;
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use tower_http::trace::TraceLayer;
use tracing::info;

use volunteer_hub::{
    config::logging::init_logging,
    middleware::cors::create_cors_layer,
    create_app,
    AppState,
    MIGRATIONS,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let state = Arc::new(AppState::new().await.context("Failed to load configuration")?);

    // Bring the schema up to date before serving traffic
    {
        let mut conn = state.config.database.pool
            .get()
            .context("Failed to get a database connection")?;
        conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    }

    let cors = create_cors_layer(&state.config.environment);

    let app = create_app(state.clone())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env
        ::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr: SocketAddr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
