pub mod aggregator;
pub mod evaluator;
pub mod thresholds;

pub use aggregator::{promotable_nodes, ClusterAggregator};
pub use evaluator::NodeHealthEvaluator;
pub use thresholds::Thresholds;
