//! Deterministický radiální layout topologie clusteru.
//!
//! Hub (primary/master) leží ve středu, followeři na kružnici kolem něj
//! v pravidelných úhlech. Nody bez rozpoznané role jdou do overflow řádku
//! pod kružnicí. Stejný vstup (včetně pořadí) dává vždy stejné souřadnice.

mod mongodb;
mod mssql;
mod postgresql;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;

use crate::health::Thresholds;
use crate::models::{EngineKind, LayoutEdge, LayoutNode, LayoutRole, NodeRecord, SyncState, TopologyGraph};

/// Rozměry layoutu v souřadnicích vykreslovací plochy (y roste dolů)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutGeometry {
    pub center_x: f64,
    pub center_y: f64,
    /// R₁ - secondary / slave repliky
    pub follower_radius: f64,
    /// R₂ - MongoDB arbitři, menší půlkruh nad hubem
    pub arbiter_radius: f64,
    /// Vzdálenost AG listeneru nad hubem
    pub listener_offset: f64,
    /// Mezera mezi kružnicí a overflow řádkem
    pub overflow_gap: f64,
    pub overflow_spacing: f64,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            center_y: 300.0,
            follower_radius: 200.0,
            arbiter_radius: 110.0,
            listener_offset: 150.0,
            overflow_gap: 120.0,
            overflow_spacing: 140.0,
        }
    }
}

/// Vrací render-agnostický graf pro jeden cluster
#[derive(Debug, Clone, Default)]
pub struct TopologyLayoutEngine {
    thresholds: Thresholds,
    geometry: LayoutGeometry,
}

impl TopologyLayoutEngine {
    pub fn new(thresholds: Thresholds, geometry: LayoutGeometry) -> Self {
        Self { thresholds, geometry }
    }

    /// Přijímá `NodeRecord` i `EvaluatedNode`
    pub fn layout<N: AsRef<NodeRecord>>(&self, nodes: &[N], engine: EngineKind) -> TopologyGraph {
        let records: Vec<&NodeRecord> = nodes.iter().map(AsRef::as_ref).collect();
        let mut builder = LayoutBuilder::new(&self.geometry);

        match engine {
            EngineKind::Mongodb => mongodb::layout(&mut builder, &records, &self.thresholds),
            EngineKind::Postgresql => postgresql::layout(&mut builder, &records, &self.thresholds),
            EngineKind::Mssql => mssql::layout(&mut builder, &records),
        }

        builder.finish()
    }
}

/// Sbírá umístěné nody a hrany, hlídá unikátnost id
pub(crate) struct LayoutBuilder<'a> {
    geometry: &'a LayoutGeometry,
    graph: TopologyGraph,
    ids: HashSet<String>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(geometry: &'a LayoutGeometry) -> Self {
        Self {
            geometry,
            graph: TopologyGraph::default(),
            ids: HashSet::new(),
        }
    }

    fn finish(self) -> TopologyGraph {
        self.graph
    }

    fn unique_id(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut n = 2;
        while self.ids.contains(&id) {
            id = format!("{}#{}", base, n);
            n += 1;
        }
        self.ids.insert(id.clone());
        id
    }

    fn place_as(&mut self, id_base: &str, payload: NodeRecord, role: LayoutRole, x: f64, y: f64) -> String {
        let id = self.unique_id(id_base);
        self.graph.nodes.push(LayoutNode {
            id: id.clone(),
            role,
            x,
            y,
            payload,
        });
        id
    }

    fn place(&mut self, node: &NodeRecord, role: LayoutRole, x: f64, y: f64) -> String {
        self.place_as(&node.hostname, node.clone(), role, x, y)
    }

    fn place_hub(&mut self, node: &NodeRecord) -> String {
        let (x, y) = (self.geometry.center_x, self.geometry.center_y);
        self.place(node, LayoutRole::Primary, x, y)
    }

    /// k nodů na kružnici: θ_i = 2π·i/k + offset
    fn ring(&mut self, nodes: &[&NodeRecord], role: LayoutRole, radius: f64, offset: f64) -> Vec<String> {
        let k = nodes.len();
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let theta = 2.0 * PI * i as f64 / k as f64 + offset;
                let (x, y) = self.polar(radius, theta);
                self.place(node, role, x, y)
            })
            .collect()
    }

    /// Půlkruh nad středem, krajní body (vodorovně s hubem) vynechány
    fn upper_arc(&mut self, nodes: &[&NodeRecord], role: LayoutRole, radius: f64) -> Vec<String> {
        let k = nodes.len();
        nodes
            .iter()
            .enumerate()
            .map(|(j, node)| {
                let theta = PI + PI * (j + 1) as f64 / (k + 1) as f64;
                let (x, y) = self.polar(radius, theta);
                self.place(node, role, x, y)
            })
            .collect()
    }

    /// Řádek pod kružnicí, rovnoměrně rozložený a vycentrovaný
    fn overflow(&mut self, nodes: &[&NodeRecord]) {
        let m = nodes.len();
        let y = self.geometry.center_y + self.geometry.follower_radius + self.geometry.overflow_gap;
        for (j, node) in nodes.iter().enumerate() {
            let shift = j as f64 - (m as f64 - 1.0) / 2.0;
            let x = self.geometry.center_x + shift * self.geometry.overflow_spacing;
            self.place(node, LayoutRole::Other, x, y);
        }
    }

    fn polar(&self, radius: f64, theta: f64) -> (f64, f64) {
        (
            self.geometry.center_x + radius * theta.cos(),
            self.geometry.center_y + radius * theta.sin(),
        )
    }

    fn edge(&mut self, source_id: &str, target_id: &str, weight: SyncState, label: String) {
        self.graph.edges.push(LayoutEdge {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            weight,
            label,
        });
    }
}

/// Rozdělí nody na hub (první s danou rolí), followery a zbytek.
/// Další nody s rolí hubu (split brain) končí v overflow.
fn partition<'n, F>(nodes: &[&'n NodeRecord], hub_role: &str, mut classify: F) -> Partition<'n>
where
    F: FnMut(&NodeRecord) -> Option<usize>,
{
    let mut partition = Partition::default();
    for &node in nodes {
        if node.has_role(hub_role) && partition.hub.is_none() {
            partition.hub = Some(node);
            continue;
        }
        match classify(node) {
            Some(bucket) => {
                if partition.followers.len() <= bucket {
                    partition.followers.resize_with(bucket + 1, Vec::new);
                }
                partition.followers[bucket].push(node);
            }
            None => partition.overflow.push(node),
        }
    }
    partition
}

#[derive(Default)]
struct Partition<'n> {
    hub: Option<&'n NodeRecord>,
    followers: Vec<Vec<&'n NodeRecord>>,
    overflow: Vec<&'n NodeRecord>,
}

impl<'n> Partition<'n> {
    fn bucket(&self, index: usize) -> &[&'n NodeRecord] {
        self.followers.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluatedNode, Severity};

    pub(super) fn record(host: &str, role: &str) -> NodeRecord {
        let mut n = NodeRecord::new(host);
        n.cluster_id = Some("c1".to_string());
        n.role = Some(role.to_string());
        n
    }

    pub(super) fn angle_deg(graph: &TopologyGraph, id: &str) -> f64 {
        let g = LayoutGeometry::default();
        let node = graph.node(id).unwrap();
        let deg = (node.y - g.center_y).atan2(node.x - g.center_x).to_degrees();
        let deg = (deg + 360.0) % 360.0;
        // 359.9999 -> 0
        if (deg - 360.0).abs() < 1e-6 { 0.0 } else { deg }
    }

    pub(super) fn distance(graph: &TopologyGraph, id: &str) -> f64 {
        let g = LayoutGeometry::default();
        let node = graph.node(id).unwrap();
        (node.x - g.center_x).hypot(node.y - g.center_y)
    }

    #[test]
    fn test_duplicate_hostnames_get_unique_ids() {
        let nodes = vec![record("db", "PRIMARY"), record("db", "SECONDARY"), record("db", "SECONDARY")];
        let graph = TopologyLayoutEngine::default().layout(&nodes, EngineKind::Mongodb);
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["db", "db#2", "db#3"]);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_accepts_evaluated_nodes() {
        let nodes: Vec<EvaluatedNode> = vec![record("m", "MASTER"), record("s", "SLAVE")]
            .into_iter()
            .map(|node| EvaluatedNode { node, severity: Severity::Healthy, reason: String::new() })
            .collect();
        let graph = TopologyLayoutEngine::default().layout(&nodes, EngineKind::Postgresql);
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.edge("m", "s").is_some());
    }

    #[test]
    fn test_overflow_row_is_centered() {
        let nodes = vec![record("p", "PRIMARY"), record("x", "RECOVERING"), record("y", "DOWN")];
        let graph = TopologyLayoutEngine::default().layout(&nodes, EngineKind::Mongodb);
        let g = LayoutGeometry::default();
        let x = graph.node("x").unwrap();
        let y = graph.node("y").unwrap();
        assert_eq!(x.role, LayoutRole::Other);
        assert_eq!(x.y, y.y);
        assert!(x.y > g.center_y + g.follower_radius);
        assert!((x.x + y.x - 2.0 * g.center_x).abs() < 1e-9);
        assert!((y.x - x.x - g.overflow_spacing).abs() < 1e-9);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let nodes = vec![
            record("p", "PRIMARY"),
            record("s1", "SECONDARY"),
            record("a", "ARBITER"),
            record("o", "STARTUP2"),
        ];
        let engine = TopologyLayoutEngine::default();
        assert_eq!(engine.layout(&nodes, EngineKind::Mongodb), engine.layout(&nodes, EngineKind::Mongodb));
    }

    #[test]
    fn test_empty_input() {
        let nodes: Vec<NodeRecord> = Vec::new();
        for engine in EngineKind::ALL {
            let graph = TopologyLayoutEngine::default().layout(&nodes, engine);
            assert!(graph.nodes.is_empty());
            assert!(graph.edges.is_empty());
        }
    }
}
