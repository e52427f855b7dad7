use serde_json::Value;
use std::collections::HashMap;

use crate::health::NodeHealthEvaluator;
use crate::models::{ClusterGroup, EngineKind, EvaluatedNode, HealthSummary, NodeRecord, Severity};

pub const UNKNOWN_CLUSTER: &str = "Unknown";
pub const STANDALONE_CLUSTER: &str = "Standalone";

/// Seskupí vyhodnocené nody podle clusteru a seřadí je podle priority.
/// Bezstavové, výsledek se při každém refreshi počítá znovu.
#[derive(Debug, Clone, Default)]
pub struct ClusterAggregator {
    evaluator: NodeHealthEvaluator,
}

impl ClusterAggregator {
    pub fn new(evaluator: NodeHealthEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn aggregate(&self, nodes: Vec<NodeRecord>, engine: EngineKind) -> Vec<ClusterGroup> {
        let mut groups: Vec<ClusterGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for node in nodes {
            let cluster_id = cluster_key(&node, engine);
            let evaluated = self.evaluator.evaluate(node, engine);

            match index.get(&cluster_id) {
                Some(&i) => groups[i].nodes.push(evaluated),
                None => {
                    index.insert(cluster_id.clone(), groups.len());
                    groups.push(ClusterGroup {
                        cluster_id,
                        nodes: vec![evaluated],
                        severity: Severity::Healthy,
                    });
                }
            }
        }

        for group in &mut groups {
            // sort_by_key je stabilní, shodné závažnosti drží původní pořadí
            group.nodes.sort_by_key(|n| n.severity);
            group.severity = group
                .nodes
                .iter()
                .map(|n| n.severity)
                .min()
                .unwrap_or(Severity::Healthy);
        }
        groups.sort_by_key(|g| g.severity);

        groups
    }

    /// Agregace přímo z odpovědi collectoru
    pub fn aggregate_raw(&self, values: &[Value], engine: EngineKind) -> Vec<ClusterGroup> {
        self.aggregate(NodeRecord::parse_list(values, engine), engine)
    }

    pub fn summarize(&self, values: &[Value], engine: EngineKind) -> HealthSummary {
        let groups = self.aggregate_raw(values, engine);
        tracing::debug!("Aggregated {} {} clusters", groups.len(), engine);
        HealthSummary::from_groups(engine, groups)
    }
}

/// Klíč skupiny pro node. U MSSQL jde node do "Standalone" pokud nemá
/// cluster nebo hlásí roli STANDALONE - rozhoduje se pro každý záznam zvlášť.
pub fn cluster_key(node: &NodeRecord, engine: EngineKind) -> String {
    if engine == EngineKind::Mssql && (node.cluster_id.is_none() || node.has_role("STANDALONE")) {
        return STANDALONE_CLUSTER.to_string();
    }
    node.cluster_id
        .clone()
        .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string())
}

/// Nody, které lze nabídnout pro promote/failover: follower role
/// a služba buď běží, nebo ji engine nehlásí.
pub fn promotable_nodes(group: &ClusterGroup, engine: EngineKind) -> Vec<&EvaluatedNode> {
    let follower_role = match engine {
        EngineKind::Postgresql => "SLAVE",
        EngineKind::Mongodb | EngineKind::Mssql => "SECONDARY",
    };

    group
        .nodes
        .iter()
        .filter(|n| n.node.has_role(follower_role))
        .filter(|n| n.node.service_status.as_deref().map_or(true, |s| s == "RUNNING"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(host: &str, cluster: Option<&str>, role: Option<&str>) -> NodeRecord {
        let mut n = NodeRecord::new(host);
        n.cluster_id = cluster.map(|c| c.to_string());
        n.role = role.map(|r| r.to_string());
        n
    }

    fn hosts(group: &ClusterGroup) -> Vec<&str> {
        group.nodes.iter().map(|n| n.node.hostname.as_str()).collect()
    }

    #[test]
    fn test_groups_ordered_by_severity_then_first_seen() {
        let nodes = vec![
            record("a1", Some("A"), Some("PRIMARY")),
            record("b1", Some("B"), Some("PRIMARY")),
            record("c1", Some("C"), Some("PRIMARY")),
            record("c2", Some("C"), None),
            record("b2", Some("B"), Some("SECONDARY")),
        ];
        let groups = ClusterAggregator::default().aggregate(nodes, EngineKind::Mongodb);
        let ids: Vec<&str> = groups.iter().map(|g| g.cluster_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
        assert_eq!(groups[0].severity, Severity::Critical);
        assert_eq!(hosts(&groups[0]), vec!["c2", "c1"]);
    }

    #[test]
    fn test_node_sort_is_stable() {
        let mut nodes = Vec::new();
        for (i, role) in ["PRIMARY", "DOWN", "SECONDARY", "ROLLBACK", "SECONDARY"].iter().enumerate() {
            nodes.push(record(&format!("n{}", i), Some("rs0"), Some(role)));
        }
        let groups = ClusterAggregator::default().aggregate(nodes, EngineKind::Mongodb);
        assert_eq!(hosts(&groups[0]), vec!["n1", "n3", "n0", "n2", "n4"]);
    }

    #[test]
    fn test_group_severity_is_min_and_coverage_total() {
        let values = vec![
            json!({"hostname": "a", "cluster_id": "rs0", "role": "PRIMARY"}),
            json!({"hostname": "b", "cluster_id": "rs0", "role": "SECONDARY", "disk_used_percent": 90}),
            json!({"hostname": "c", "role": "SECONDARY"}),
            json!({"hostname": "d", "cluster_id": "", "role": "ARBITER"}),
            json!(42),
        ];
        let groups = ClusterAggregator::default().aggregate_raw(&values, EngineKind::Mongodb);

        let total: usize = groups.iter().map(|g| g.nodes.len()).sum();
        assert_eq!(total, 4);
        for group in &groups {
            let min = group.nodes.iter().map(|n| n.severity).min().unwrap();
            assert_eq!(group.severity, min);
        }
        let unknown = groups.iter().find(|g| g.cluster_id == UNKNOWN_CLUSTER).unwrap();
        assert_eq!(unknown.nodes.len(), 2);
    }

    #[test]
    fn test_mssql_standalone_per_record() {
        let nodes = vec![
            record("sql-1", None, Some("STANDALONE")),
            record("sql-2", Some("AG1"), Some("PRIMARY")),
            record("sql-3", Some("AG1"), Some("STANDALONE")),
            record("sql-4", None, Some("SECONDARY")),
        ];
        let groups = ClusterAggregator::default().aggregate(nodes, EngineKind::Mssql);
        let standalone = groups.iter().find(|g| g.cluster_id == STANDALONE_CLUSTER).unwrap();
        let ag1 = groups.iter().find(|g| g.cluster_id == "AG1").unwrap();
        assert_eq!(hosts(standalone), vec!["sql-1", "sql-3", "sql-4"]);
        assert_eq!(hosts(ag1), vec!["sql-2"]);
    }

    #[test]
    fn test_empty_cluster_without_standalone_role_is_unknown_outside_mssql() {
        let nodes = vec![record("pg-1", None, Some("STANDALONE"))];
        let groups = ClusterAggregator::default().aggregate(nodes, EngineKind::Postgresql);
        assert_eq!(groups[0].cluster_id, UNKNOWN_CLUSTER);
    }

    #[test]
    fn test_promotable_nodes() {
        let mut stopped = record("pg-3", Some("main"), Some("SLAVE"));
        stopped.service_status = Some("STOPPED".to_string());
        let mut running = record("pg-2", Some("main"), Some("SLAVE"));
        running.service_status = Some("RUNNING".to_string());
        let nodes = vec![
            record("pg-1", Some("main"), Some("MASTER")),
            running,
            stopped,
            record("pg-4", Some("main"), Some("SLAVE")),
        ];
        let groups = ClusterAggregator::default().aggregate(nodes, EngineKind::Postgresql);
        let eligible: Vec<&str> = promotable_nodes(&groups[0], EngineKind::Postgresql)
            .iter()
            .map(|n| n.node.hostname.as_str())
            .collect();
        assert_eq!(eligible, vec!["pg-2", "pg-4"]);
    }

    #[test]
    fn test_summarize_counts() {
        let values = vec![
            json!({"hostname": "a", "cluster_id": "rs0", "role": "PRIMARY", "mongod_service_status": "STOPPED"}),
            json!({"hostname": "b", "cluster_id": "rs0", "role": "SECONDARY", "replication_lag_seconds": 45}),
            json!({"hostname": "c", "cluster_id": "rs0", "role": "SECONDARY"}),
        ];
        let summary = ClusterAggregator::default().summarize(&values, EngineKind::Mongodb);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.warning_nodes[0].reason, "High replication lag: 45s");
    }
}
