pub mod api;
pub mod app;
pub mod collab;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

pub use api::routes;
pub use app::{AppContext, AppState};

// Export logic types
pub use logic::{
    check_mutation, parse_date, parse_tags, validate_id, Access, DualWriteStatus, DualWriter,
    ReadOutcome, ValidationError, WriteOutcome,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{DocumentStore, SearchIndex, StoreError};

/// Build the application router over the given collaborators
pub fn build_app(ctx: AppContext) -> axum::Router {
    api::routes::create_router().with_state(std::sync::Arc::new(ctx))
}

/// Load configuration, connect collaborators and serve until shutdown
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx", log::LevelFilter::Warn)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .try_init();

    let config = crate::config::AppConfig::load()?;
    log::info!(
        "configuration loaded: server={}:{} store={:?} search={:?} identity={:?}",
        config.server.host,
        config.server.port,
        config.document_store.backend,
        config.search.backend,
        config.identity.mode
    );

    let ctx = AppContext::from_config(&config).await?;
    let app = build_app(ctx);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("algorithms API listening on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
