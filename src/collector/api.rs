use anyhow::Result;
use serde_json::Value;

use super::client::CollectorClient;
use crate::models::EngineKind;

impl CollectorClient {
    /// Získá surové záznamy nodů pro daný engine
    pub async fn fetch_nodes(&self, engine: EngineKind) -> Result<Vec<Value>> {
        let path = format!("/{}/nodes", engine.as_str());
        let response: Value = self.get(&path).await?;
        let nodes = extract_node_list(response);

        tracing::debug!("Fetched {} {} node records from {}", nodes.len(), engine, self.base_url());
        Ok(nodes)
    }
}

/// Collectory vrací buď holé pole, nebo obálku {"nodes": [...]} / {"data": [...]}
pub fn extract_node_list(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            for key in ["nodes", "data"] {
                if let Some(Value::Array(items)) = obj.remove(key) {
                    return items;
                }
            }
            tracing::warn!("Collector response has no node list, treating as empty");
            Vec::new()
        }
        other => {
            tracing::warn!("Unexpected collector response: {}", other);
            Vec::new()
        }
    }
}
