use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::collector::CollectorClient;
use crate::db::models::{CreateSource, Source};
use crate::db::Database;
use crate::health::ClusterAggregator;
use crate::models::HealthSummary;
use crate::topology::TopologyLayoutEngine;

pub struct AppState {
    pub db: Database,
    pub aggregator: ClusterAggregator,
    pub topology: TopologyLayoutEngine,
}

#[derive(Debug, Serialize)]
pub struct CreatedSource {
    pub id: i64,
}

/// GET /api/sources - Seznam zdrojů telemetrie
pub async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Source>>, (StatusCode, String)> {
    state.db.get_sources().await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to list sources: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

/// POST /api/sources - Vytvoří nový zdroj
pub async fn create_source(
    State(state): State<Arc<AppState>>,
    Json(source): Json<CreateSource>,
) -> Result<(StatusCode, Json<CreatedSource>), (StatusCode, String)> {
    if source.name.trim().is_empty() || source.url.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Name and URL are required".to_string()));
    }

    match state.db.create_source(source).await {
        Ok(id) => Ok((StatusCode::CREATED, Json(CreatedSource { id }))),
        Err(e) => {
            tracing::error!("Failed to create source: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// DELETE /api/sources/{id} - Smaže zdroj
pub async fn delete_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.db.delete_source(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Source not found".to_string())),
        Err(e) => {
            tracing::error!("Failed to delete source {}: {}", id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Načte zdroj nebo vrátí 404
pub async fn get_source_or_404(state: &AppState, id: i64) -> Result<Source, (StatusCode, String)> {
    match state.db.get_source(id).await {
        Ok(Some(source)) => Ok(source),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Source not found".to_string())),
        Err(e) => {
            tracing::error!("Failed to load source {}: {}", id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Stáhne telemetrii ze zdroje a vyhodnotí ji, s timeoutem
pub async fn load_health_summary(
    state: &AppState,
    source: &Source,
) -> Result<HealthSummary, (StatusCode, String)> {
    match tokio::time::timeout(
        tokio::time::Duration::from_secs(30),
        fetch_and_evaluate(state, source)
    ).await {
        Ok(Ok(summary)) => Ok(summary),
        Ok(Err(e)) => {
            tracing::error!("Failed to load health for source {}: {}", source.name, e);
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
        Err(_) => {
            tracing::error!("Timeout loading health for source: {}", source.name);
            Err((StatusCode::GATEWAY_TIMEOUT, "Timeout".to_string()))
        }
    }
}

async fn fetch_and_evaluate(state: &AppState, source: &Source) -> anyhow::Result<HealthSummary> {
    let engine = source.engine_kind()?;
    let password = state.db.get_source_password(source).await;

    let client = CollectorClient::new(
        source.url.clone(),
        source.insecure,
        source.username.clone(),
        password,
    )?;

    let raw = client.fetch_nodes(engine).await?;
    let summary = state.aggregator.summarize(&raw, engine);

    tracing::info!(
        "Evaluated {} nodes from {}: {} critical, {} warning",
        summary.nodes_total(),
        source.name,
        summary.critical_count,
        summary.warning_count
    );
    Ok(summary)
}
