use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::health::{ClusterGroup, Severity};
use super::node::EngineKind;
use crate::utils::format_number;

/// Souhrn zdraví všech clusterů jednoho zdroje telemetrie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub engine: EngineKind,
    pub groups: Vec<ClusterGroup>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub critical_nodes: Vec<NodeIssue>,
    pub warning_nodes: Vec<NodeIssue>,
    pub generated_at: DateTime<Utc>,
}

impl HealthSummary {
    /// Sestaví souhrn z již seřazených skupin
    pub fn from_groups(engine: EngineKind, groups: Vec<ClusterGroup>) -> Self {
        let mut critical_nodes = Vec::new();
        let mut warning_nodes = Vec::new();

        for node in groups.iter().flat_map(|g| g.nodes.iter()) {
            let issue = NodeIssue {
                hostname: node.node.hostname.clone(),
                reason: node.reason.clone(),
            };
            match node.severity {
                Severity::Critical => critical_nodes.push(issue),
                Severity::Warning => warning_nodes.push(issue),
                Severity::Healthy => {}
            }
        }

        Self {
            engine,
            critical_count: critical_nodes.len(),
            warning_count: warning_nodes.len(),
            groups,
            critical_nodes,
            warning_nodes,
            generated_at: Utc::now(),
        }
    }

    pub fn nodes_total(&self) -> usize {
        self.groups.iter().map(|g| g.nodes.len()).sum()
    }

    pub fn nodes_total_formatted(&self) -> String {
        format_number(self.nodes_total() as u64)
    }

    pub fn group(&self, cluster_id: &str) -> Option<&ClusterGroup> {
        self.groups.iter().find(|g| g.cluster_id == cluster_id)
    }

    pub fn generated_at_formatted(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIssue {
    pub hostname: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluatedNode, NodeRecord};

    fn evaluated(host: &str, severity: Severity, reason: &str) -> EvaluatedNode {
        EvaluatedNode {
            node: NodeRecord::new(host),
            severity,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_summary_counts_and_details() {
        let groups = vec![
            ClusterGroup {
                cluster_id: "rs0".to_string(),
                nodes: vec![
                    evaluated("a", Severity::Critical, "Service is not running"),
                    evaluated("b", Severity::Warning, "Low disk space (10.0% free)"),
                ],
                severity: Severity::Critical,
            },
            ClusterGroup {
                cluster_id: "rs1".to_string(),
                nodes: vec![
                    evaluated("c", Severity::Warning, "High replication lag: 45s"),
                    evaluated("d", Severity::Healthy, ""),
                ],
                severity: Severity::Warning,
            },
        ];

        let summary = HealthSummary::from_groups(EngineKind::Mongodb, groups);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.warning_count, 2);
        assert_eq!(summary.nodes_total(), 4);
        assert_eq!(summary.critical_nodes[0].hostname, "a");
        assert_eq!(summary.warning_nodes[1].reason, "High replication lag: 45s");
        assert!(summary.group("rs1").is_some());
        assert!(summary.group("missing").is_none());
    }
}
