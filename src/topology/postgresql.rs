use super::{partition, LayoutBuilder};
use crate::health::Thresholds;
use crate::models::{LayoutRole, NodeRecord, SyncState};
use crate::utils::format_lag_label;

/// Primary/standby: MASTER ve středu, SLAVE na jedné kružnici
pub(super) fn layout(builder: &mut LayoutBuilder<'_>, nodes: &[&NodeRecord], thresholds: &Thresholds) {
    let parts = partition(nodes, "MASTER", |node| node.has_role("SLAVE").then_some(0));

    let hub_id = parts.hub.map(|hub| builder.place_hub(hub));
    if hub_id.is_none() {
        tracing::debug!("No MASTER in PostgreSQL cluster, laying out without edges");
    }

    let radius = builder.geometry.follower_radius;
    let standbys = parts.bucket(0);
    let standby_ids = builder.ring(standbys, LayoutRole::Secondary, radius, 0.0);
    builder.overflow(&parts.overflow);

    if let Some(hub_id) = hub_id {
        // Postgres má vlastní pásma (100s / 300s), nesjednocovat s MongoDB
        let buckets = thresholds.postgresql_lag;
        for (node, id) in standbys.iter().zip(&standby_ids) {
            let lag = node.replication_lag_seconds;
            builder.edge(&hub_id, id, SyncState::Lag(buckets.classify(lag)), format_lag_label(lag));
        }
    }
}
