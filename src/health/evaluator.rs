use crate::health::Thresholds;
use crate::models::{EngineKind, EvaluatedNode, NodeRecord, Severity};
use crate::utils::{format_lag, format_percent};

const HEALTHY_ROLES: &[&str] = &["PRIMARY", "MASTER", "SECONDARY", "SLAVE"];
const RUNNING: &str = "RUNNING";

/// Klasifikuje zdraví jednoho nodu. Nikdy nepadá - chybějící pole vedou
/// na nejméně informativní výchozí hodnotu.
#[derive(Debug, Clone, Default)]
pub struct NodeHealthEvaluator {
    thresholds: Thresholds,
}

impl NodeHealthEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(&self, node: NodeRecord, engine: EngineKind) -> EvaluatedNode {
        let (mut severity, mut reason) = self.primary_severity(&node, engine);

        // Lag se vyhodnocuje vždy, jen doplňuje důvod
        if let Some(lag) = node.replication_lag_seconds {
            if lag > self.thresholds.replication_lag_warning_secs {
                let lag_reason = format!("High replication lag: {}s", format_lag(lag));
                if severity == Severity::Healthy {
                    severity = Severity::Warning;
                    reason = lag_reason;
                } else {
                    reason = format!("{}, {}", reason, lag_reason);
                }
            }
        }

        EvaluatedNode { node, severity, reason }
    }

    fn primary_severity(&self, node: &NodeRecord, engine: EngineKind) -> (Severity, String) {
        if let Some(status) = node.service_status.as_deref() {
            if status != RUNNING {
                return (Severity::Critical, "Service is not running".to_string());
            }
        }

        match node.role.as_deref() {
            None => return (Severity::Critical, "Node status unknown".to_string()),
            Some(role) if !is_healthy_role(role, engine) => {
                return (Severity::Critical, format!("Node is in unhealthy state: {}", role));
            }
            Some(_) => {}
        }

        if let Some(used) = node.used_disk_percent() {
            if used > self.thresholds.disk_used_warning_percent {
                let free = node.free_disk_percent().unwrap_or(100.0 - used);
                return (
                    Severity::Warning,
                    format!("Low disk space ({}% free)", format_percent(free)),
                );
            }
        }

        (Severity::Healthy, String::new())
    }
}

fn is_healthy_role(role: &str, engine: EngineKind) -> bool {
    HEALTHY_ROLES.contains(&role) || (engine == EngineKind::Mssql && role == "STANDALONE")
}
