use askama::Template;

use crate::db::models::Source;
use crate::models::{HealthSummary, Severity};
use crate::snapshot::ClusterTopology;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub sources: Vec<Source>,
}

#[derive(Template)]
#[template(path = "source.html")]
pub struct SourceTemplate {
    pub source: Source,
    pub data: Option<HealthSummary>,
    pub topologies: Vec<ClusterTopology>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::ClusterAggregator;
    use crate::models::EngineKind;
    use crate::snapshot::layout_groups;
    use crate::topology::TopologyLayoutEngine;
    use chrono::Utc;
    use serde_json::json;

    fn source() -> Source {
        Source {
            id: 1,
            name: "prod-rs".to_string(),
            url: "http://collector:9000".to_string(),
            engine: "mongodb".to_string(),
            insecure: false,
            username: None,
            password_encrypted: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_source_page_renders_groups() {
        let raw = vec![
            json!({"hostname": "m1", "cluster_id": "rs0", "role": "PRIMARY"}),
            json!({"hostname": "m2", "cluster_id": "rs0", "role": "SECONDARY", "mongod_service_status": "FAILED"}),
        ];
        let data = ClusterAggregator::default().summarize(&raw, EngineKind::Mongodb);
        let topologies = layout_groups(&data.groups, data.engine, &TopologyLayoutEngine::default());
        let html = SourceTemplate { source: source(), data: Some(data), topologies, error: None }
            .render()
            .unwrap();
        assert!(html.contains("rs0"));
        assert!(html.contains("Service is not running"));
        assert!(html.contains("1 critical, 0 warning"));
        // Hrana m1 -> m2 bez lagu je šedá
        assert!(html.contains("#626976"));
    }

    #[test]
    fn test_topology_link_encodes_cluster_id() {
        let raw = vec![json!({"hostname": "sql-1", "cluster_id": "AG 1/prod", "ha_role": "PRIMARY"})];
        let data = ClusterAggregator::default().summarize(&raw, EngineKind::Mssql);
        let html = SourceTemplate { source: source(), data: Some(data), topologies: Vec::new(), error: None }
            .render()
            .unwrap();
        assert!(html.contains("/api/sources/1/clusters/AG%201%2Fprod/topology"));
    }

    #[test]
    fn test_source_page_renders_error() {
        let html = SourceTemplate { source: source(), data: None, topologies: Vec::new(), error: Some("Timeout".to_string()) }
            .render()
            .unwrap();
        assert!(html.contains("Timeout"));
    }

    #[test]
    fn test_dashboard_lists_sources() {
        let html = DashboardTemplate { sources: vec![source()] }.render().unwrap();
        assert!(html.contains("prod-rs"));
        assert!(html.contains("/sources/1"));
    }
}
