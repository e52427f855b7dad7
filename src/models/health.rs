use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeRecord;
use crate::utils::{encode_path_segment, severity_color};

/// Závažnost stavu nodu. Nižší číslo = horší stav, pořadí se používá
/// přímo jako klíč pro řazení.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical = 1,
    Warning = 2,
    Healthy = 3,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Healthy => "healthy",
        }
    }

    /// Barva badge pro šablony
    pub fn color(self) -> &'static str {
        severity_color(self)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Node po vyhodnocení zdraví
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedNode {
    pub node: NodeRecord,
    pub severity: Severity,
    pub reason: String,
}

impl AsRef<NodeRecord> for EvaluatedNode {
    fn as_ref(&self) -> &NodeRecord {
        &self.node
    }
}

/// Skupina nodů jednoho clusteru, vždy odvozená znovu při každém refreshi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub cluster_id: String,
    pub nodes: Vec<EvaluatedNode>,
    pub severity: Severity,
}

impl ClusterGroup {
    /// cluster_id bezpečný pro použití v URL cestě
    pub fn cluster_id_encoded(&self) -> String {
        encode_path_segment(&self.cluster_id)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.nodes.iter().filter(|n| n.severity == severity).count()
    }
}
