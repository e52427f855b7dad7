use super::{partition, LayoutBuilder};
use crate::health::Thresholds;
use crate::models::{LagTier, LayoutRole, NodeRecord, SyncState};
use crate::utils::format_lag_label;

const SECONDARIES: usize = 0;
const ARBITERS: usize = 1;

/// Replica set: PRIMARY ve středu, SECONDARY na R₁, ARBITER na půlkruhu R₂ nad hubem
pub(super) fn layout(builder: &mut LayoutBuilder<'_>, nodes: &[&NodeRecord], thresholds: &Thresholds) {
    let parts = partition(nodes, "PRIMARY", |node| match node.role.as_deref() {
        Some("SECONDARY") => Some(SECONDARIES),
        Some("ARBITER") => Some(ARBITERS),
        _ => None,
    });

    let hub_id = parts.hub.map(|hub| builder.place_hub(hub));
    if hub_id.is_none() {
        tracing::debug!("No PRIMARY in MongoDB replica set, laying out without edges");
    }

    let radius = builder.geometry.follower_radius;
    let secondaries = parts.bucket(SECONDARIES);
    let secondary_ids = builder.ring(secondaries, LayoutRole::Secondary, radius, 0.0);

    let arbiter_radius = builder.geometry.arbiter_radius;
    let arbiter_ids = builder.upper_arc(parts.bucket(ARBITERS), LayoutRole::Arbiter, arbiter_radius);

    builder.overflow(&parts.overflow);

    let Some(hub_id) = hub_id else {
        return;
    };

    let buckets = thresholds.mongodb_lag;
    for (node, id) in secondaries.iter().zip(&secondary_ids) {
        let lag = node.replication_lag_seconds;
        builder.edge(&hub_id, id, SyncState::Lag(buckets.classify(lag)), format_lag_label(lag));
    }
    // Arbitr nereplikuje data, hrana nese jen členství
    for id in &arbiter_ids {
        builder.edge(&hub_id, id, SyncState::Lag(LagTier::Unknown), "arbiter".to_string());
    }
}
