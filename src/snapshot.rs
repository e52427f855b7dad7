use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::collector::api::extract_node_list;
use crate::health::ClusterAggregator;
use crate::models::{ClusterGroup, EngineKind, HealthSummary, TopologyGraph};
use crate::topology::TopologyLayoutEngine;

/// Layout jednoho clusteru, pojmenovaný podle cluster_id
#[derive(Debug, Clone, Serialize)]
pub struct ClusterTopology {
    pub cluster_id: String,
    pub graph: TopologyGraph,
}

/// Offline report: souhrn zdraví + topologie všech clusterů
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub summary: HealthSummary,
    pub topologies: Vec<ClusterTopology>,
}

/// Spočítá layout pro každou skupinu ve stejném pořadí jako souhrn
pub fn layout_groups(
    groups: &[ClusterGroup],
    engine: EngineKind,
    topology: &TopologyLayoutEngine,
) -> Vec<ClusterTopology> {
    groups
        .iter()
        .map(|group| ClusterTopology {
            cluster_id: group.cluster_id.clone(),
            graph: topology.layout(&group.nodes, engine),
        })
        .collect()
}

pub fn build_report(
    raw: Value,
    engine: EngineKind,
    aggregator: &ClusterAggregator,
    topology: &TopologyLayoutEngine,
) -> SnapshotReport {
    let nodes = extract_node_list(raw);
    let summary = aggregator.summarize(&nodes, engine);
    let topologies = layout_groups(&summary.groups, engine, topology);

    SnapshotReport { summary, topologies }
}

/// Načte JSON export collectoru ze souboru
pub fn load_snapshot(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
    Ok(value)
}
