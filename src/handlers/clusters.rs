use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::handlers::sources::{get_source_or_404, load_health_summary, AppState};
use crate::health::promotable_nodes;
use crate::models::{ClusterGroup, EvaluatedNode, HealthSummary, TopologyGraph};

/// GET /api/sources/{id}/clusters - Souhrn zdraví všech clusterů zdroje
pub async fn cluster_summary(
    State(state): State<Arc<AppState>>,
    Path(source_id): Path<i64>,
) -> Result<Json<HealthSummary>, (StatusCode, String)> {
    let source = get_source_or_404(&state, source_id).await?;
    let summary = load_health_summary(&state, &source).await?;
    Ok(Json(summary))
}

/// GET /api/sources/{id}/clusters/{cluster_id}/topology - Layout grafu clusteru
pub async fn cluster_topology(
    State(state): State<Arc<AppState>>,
    Path((source_id, cluster_id)): Path<(i64, String)>,
) -> Result<Json<TopologyGraph>, (StatusCode, String)> {
    let source = get_source_or_404(&state, source_id).await?;
    let summary = load_health_summary(&state, &source).await?;
    let group = find_group(&summary, &cluster_id)?;

    let graph = state.topology.layout(&group.nodes, summary.engine);
    tracing::debug!(
        "Laid out cluster {}: {} nodes, {} edges",
        cluster_id,
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(Json(graph))
}

/// GET /api/sources/{id}/clusters/{cluster_id}/promotable - Kandidáti pro promote/failover
pub async fn promotable(
    State(state): State<Arc<AppState>>,
    Path((source_id, cluster_id)): Path<(i64, String)>,
) -> Result<Json<Vec<EvaluatedNode>>, (StatusCode, String)> {
    let source = get_source_or_404(&state, source_id).await?;
    let summary = load_health_summary(&state, &source).await?;
    let group = find_group(&summary, &cluster_id)?;

    let nodes = promotable_nodes(group, summary.engine)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(nodes))
}

fn find_group<'a>(summary: &'a HealthSummary, cluster_id: &str) -> Result<&'a ClusterGroup, (StatusCode, String)> {
    summary.group(cluster_id).ok_or_else(|| {
        tracing::debug!("Cluster not found: {}", cluster_id);
        (StatusCode::NOT_FOUND, format!("Cluster not found: {}", cluster_id))
    })
}
