use axum::{
    extract::{Path, State},
    response::Html,
    http::StatusCode,
};
use std::sync::Arc;
use askama::Template;

use crate::handlers::sources::{get_source_or_404, load_health_summary, AppState};
use crate::snapshot::layout_groups;
use crate::templates::{DashboardTemplate, SourceTemplate};

/// GET /dashboard - Zobrazí seznam zdrojů
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let sources = match state.db.get_sources().await {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("Failed to load sources: {}", e);
            Vec::new()
        }
    };

    let template = DashboardTemplate { sources };

    template.render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /sources/{id} - Zobrazí souhrn clusterů jednoho zdroje
pub async fn source_page(
    State(state): State<Arc<AppState>>,
    Path(source_id): Path<i64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let source = get_source_or_404(&state, source_id).await?;

    // Chyba collectoru stránku neshodí, jen se zobrazí
    let (data, error) = match load_health_summary(&state, &source).await {
        Ok(summary) => (Some(summary), None),
        Err((_, message)) => (None, Some(message)),
    };
    let topologies = data
        .as_ref()
        .map(|summary| layout_groups(&summary.groups, summary.engine, &state.topology))
        .unwrap_or_default();

    let template = SourceTemplate { source, data, topologies, error };

    template.render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
