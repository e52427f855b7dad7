pub mod dashboard;
pub mod health;
pub mod node;
pub mod topology;

pub use dashboard::HealthSummary;
pub use health::{ClusterGroup, EvaluatedNode, Severity};
pub use node::{AgReplica, EngineKind, NodeRecord, UnknownEngine};
pub use topology::{CommitTier, LagTier, LayoutEdge, LayoutNode, LayoutRole, SyncState, TopologyGraph};
