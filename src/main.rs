// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use formgraph::application::forms_service::FormsService;
use formgraph::application::report_service::ReportService;
use formgraph::infrastructure::config::load_config;
use formgraph::infrastructure::sqlite_store::SqliteEventStore;
use formgraph::presentation::app_state::AppState;
use formgraph::presentation::handlers::{get_report, health_check, list_forms};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_config()?;

    // Initialize tracing (config level, RUST_LOG wins when set)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Open the event store (infrastructure layer)
    let store = Arc::new(SqliteEventStore::open(Path::new(&config.database.path))?);
    store.migrate()?;

    // Create services (application layer)
    let forms_service = FormsService::new(store.clone());
    let report_service = ReportService::new(store.clone(), store.clone(), store.clone());

    // Create application state
    let state = Arc::new(AppState {
        forms_service,
        report_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/forms", get(list_forms))
        .route("/reports", get(get_report))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    println!("Starting formgraph service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
