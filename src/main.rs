mod collector;
mod config;
mod db;
mod handlers;
mod health;
mod models;
mod snapshot;
mod templates;
mod topology;
mod utils;

use anyhow::Result;
use axum::{
    routing::{get, delete},
    Router,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::AppState;
use health::{ClusterAggregator, NodeHealthEvaluator};
use models::EngineKind;
use topology::TopologyLayoutEngine;

#[derive(Parser, Debug)]
#[command(name = "replica-monitor")]
#[command(about = "Replica set health and topology monitor for MongoDB, PostgreSQL and MSSQL", long_about = None)]
struct Args {
    /// Host pro HTTP server
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port pro HTTP server
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Neotvírat prohlížeč automaticky
    #[arg(long)]
    no_browser: bool,

    /// Vyhodnotí JSON export collectoru a vypíše report na stdout (bez serveru)
    #[arg(long, requires = "engine")]
    snapshot: Option<PathBuf>,

    /// Engine snapshotu (mongodb, postgresql, mssql)
    #[arg(long)]
    engine: Option<EngineKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializuj logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replica_monitor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI argumenty
    let args = Args::parse();

    // Inicializuj adresáře
    config::init_directories()?;
    let thresholds = config::load_thresholds()?;
    let geometry = config::load_geometry()?;

    let aggregator = ClusterAggregator::new(NodeHealthEvaluator::new(thresholds.clone()));
    let topology = TopologyLayoutEngine::new(thresholds, geometry);

    if let (Some(path), Some(engine)) = (&args.snapshot, args.engine) {
        tracing::info!("Evaluating {} snapshot: {}", engine, path.display());
        let raw = snapshot::load_snapshot(path)?;
        let report = snapshot::build_report(raw, engine, &aggregator, &topology);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    tracing::info!("Starting Replica Monitor...");

    // Inicializuj databázi
    let db = db::Database::new().await?;
    tracing::info!("Database initialized successfully");

    // Shared state
    let state = Arc::new(AppState { db, aggregator, topology });

    // Vytvoř axum router
    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/sources/{id}", get(handlers::dashboard::source_page))
        .route("/api/sources", get(handlers::sources::list_sources).post(handlers::sources::create_source))
        .route("/api/sources/{id}", delete(handlers::sources::delete_source))
        .route("/api/sources/{id}/clusters", get(handlers::clusters::cluster_summary))
        .route("/api/sources/{id}/clusters/{cluster_id}/topology", get(handlers::clusters::cluster_topology))
        .route("/api/sources/{id}/clusters/{cluster_id}/promotable", get(handlers::clusters::promotable))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    // Adresa serveru
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    // Otevři prohlížeč
    if !args.no_browser {
        let url = format!("http://{}", addr);
        if let Err(e) = utils::open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
            tracing::info!("Please open {} manually", url);
        }
    }

    // Spusť server
    tracing::info!("Server started successfully");
    axum::serve(listener, app).await?;

    Ok(())
}
