use serde::{Deserialize, Serialize};

use super::node::NodeRecord;
use crate::utils::sync_state_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutRole {
    Primary,
    Secondary,
    Arbiter,
    Listener,
    Other,
}

/// Pásmo replikačního lagu (MongoDB / PostgreSQL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagTier {
    Healthy,
    Delayed,
    Critical,
    Unknown,
}

/// Stav synchronizace AlwaysOn repliky, seřazeno od nejlepšího
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTier {
    /// SYNCHRONOUS_COMMIT + SYNCHRONIZED
    Synchronized,
    /// ASYNCHRONOUS_COMMIT, data tečou
    Asynchronous,
    /// SYNCHRONOUS_COMMIT, replika dohání
    Synchronizing,
    /// NOT SYNCHRONIZING, REVERTING, nebo stav chybí
    NotSynchronizing,
}

/// Styl hrany - spočítaný tady, protože závisí na stejných prazích jako zdraví
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "lowercase")]
pub enum SyncState {
    Lag(LagTier),
    Commit(CommitTier),
    Listener,
}

impl SyncState {
    pub fn color(self) -> &'static str {
        sync_state_color(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub role: LayoutRole,
    pub x: f64,
    pub y: f64,
    pub payload: NodeRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source_id: String,
    pub target_id: String,
    pub weight: SyncState,
    pub label: String,
}

/// Výsledek layoutu s absolutními souřadnicemi, připravený pro vykreslení
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl TopologyGraph {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_with_role(&self, role: LayoutRole) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |n| n.role == role)
    }

    pub fn edge(&self, source_id: &str, target_id: &str) -> Option<&LayoutEdge> {
        self.edges
            .iter()
            .find(|e| e.source_id == source_id && e.target_id == target_id)
    }
}
