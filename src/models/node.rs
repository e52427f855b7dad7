use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Druh databázového enginu - určuje názvy polí, prahy i tvar topologie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Mongodb,
    Postgresql,
    Mssql,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown engine kind: {0}")]
pub struct UnknownEngine(pub String);

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [EngineKind::Mongodb, EngineKind::Postgresql, EngineKind::Mssql];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Mongodb => "mongodb",
            EngineKind::Postgresql => "postgresql",
            EngineKind::Mssql => "mssql",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EngineKind::Mongodb => "MongoDB",
            EngineKind::Postgresql => "PostgreSQL",
            EngineKind::Mssql => "MSSQL",
        }
    }

    fn field_names(self) -> &'static FieldNames {
        match self {
            EngineKind::Mongodb => &MONGODB_FIELDS,
            EngineKind::Postgresql => &POSTGRESQL_FIELDS,
            EngineKind::Mssql => &MSSQL_FIELDS,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(EngineKind::Mongodb),
            "postgresql" | "postgres" | "pg" => Ok(EngineKind::Postgresql),
            "mssql" | "sqlserver" => Ok(EngineKind::Mssql),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

/// Pořadí preferovaných klíčů pro jednotlivá logická pole.
/// Vyhrává první klíč, který má neprázdnou hodnotu.
struct FieldNames {
    hostname: &'static [&'static str],
    cluster_id: &'static [&'static str],
    role: &'static [&'static str],
    service_status: &'static [&'static str],
}

static MONGODB_FIELDS: FieldNames = FieldNames {
    hostname: &["hostname", "host", "name"],
    cluster_id: &["cluster_id", "clusterId", "replica_set"],
    role: &["role", "state_str", "state"],
    service_status: &["mongod_service_status", "service_status"],
};

static POSTGRESQL_FIELDS: FieldNames = FieldNames {
    hostname: &["hostname", "host", "server_name"],
    cluster_id: &["cluster_id", "clusterId", "cluster_name"],
    role: &["role", "node_role", "replication_role"],
    service_status: &["postgres_service_status", "service_status"],
};

static MSSQL_FIELDS: FieldNames = FieldNames {
    hostname: &["hostname", "server_name", "replica_server_name"],
    cluster_id: &["cluster_id", "clusterId", "ag_name"],
    role: &["ha_role", "role", "NodeStatus", "node_status"],
    service_status: &["mssql_service_status", "service_status"],
};

const DISK_USED_FIELDS: &[&str] = &["disk_used_percent", "diskUsedPercent", "disk_usage_percent"];
const DISK_FREE_FIELDS: &[&str] = &["disk_free_percent", "freeDiskPercent", "free_disk_percent"];
const LAG_FIELDS: &[&str] = &["replication_lag_seconds", "replicationLagSeconds", "lag_seconds"];
const ADDRESS_FIELDS: &[&str] = &["ip", "address", "ip_address"];
const VERSION_FIELDS: &[&str] = &["version", "server_version"];
const AVAILABILITY_MODE_FIELDS: &[&str] = &["availability_mode", "availability_mode_desc", "commit_mode"];
const SYNC_STATE_FIELDS: &[&str] = &["synchronization_state", "synchronization_state_desc", "sync_state"];
const AG_REPLICA_FIELDS: &[&str] = &["ag_replicas", "availability_replicas"];
const LISTENER_FIELDS: &[&str] = &["ag_listener", "listener", "listener_name"];

/// Replika z AlwaysOn availability group tak, jak ji hlásí některý z nodů
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgReplica {
    pub replica_server_name: String,
    pub role: Option<String>,
    pub availability_mode: Option<String>,
    pub synchronization_state: Option<String>,
}

/// Normalizovaný záznam jednoho monitorovaného nodu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub hostname: String,
    pub cluster_id: Option<String>,
    pub role: Option<String>,
    pub service_status: Option<String>,
    pub disk_used_percent: Option<f64>,
    pub disk_free_percent: Option<f64>,
    pub replication_lag_seconds: Option<f64>,

    // Pouze pro zobrazení
    pub address: Option<String>,
    pub port: Option<u16>,
    pub version: Option<String>,

    // MSSQL AlwaysOn
    pub availability_mode: Option<String>,
    pub synchronization_state: Option<String>,
    #[serde(default)]
    pub ag_replicas: Vec<AgReplica>,
    pub listener: Option<String>,
}

impl AsRef<NodeRecord> for NodeRecord {
    fn as_ref(&self) -> &NodeRecord {
        self
    }
}

impl NodeRecord {
    /// Prázdný záznam s daným hostname, ostatní pole chybí
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            cluster_id: None,
            role: None,
            service_status: None,
            disk_used_percent: None,
            disk_free_percent: None,
            replication_lag_seconds: None,
            address: None,
            port: None,
            version: None,
            availability_mode: None,
            synchronization_state: None,
            ag_replicas: Vec::new(),
            listener: None,
        }
    }

    /// Převede volně typovaný JSON objekt na striktní záznam.
    /// Vrací None pouze pokud hodnota není objekt.
    pub fn from_value(value: &Value, engine: EngineKind) -> Option<Self> {
        let obj = value.as_object()?;
        let names = engine.field_names();

        let hostname = first_string(obj, names.hostname).unwrap_or_else(|| "unknown".to_string());

        let role = first_string(obj, names.role)
            .map(|r| normalize_role(&r, engine))
            .filter(|r| r != "N/A");

        let ag_replicas = first_value(obj, AG_REPLICA_FIELDS)
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(parse_replica).collect())
            .unwrap_or_default();

        Some(Self {
            hostname,
            cluster_id: first_string(obj, names.cluster_id),
            role,
            service_status: first_string(obj, names.service_status),
            disk_used_percent: first_number(obj, DISK_USED_FIELDS),
            disk_free_percent: first_number(obj, DISK_FREE_FIELDS),
            replication_lag_seconds: first_number(obj, LAG_FIELDS),
            address: first_string(obj, ADDRESS_FIELDS),
            port: first_number(obj, &["port"])
                .filter(|p| *p >= 0.0 && *p <= u16::MAX as f64)
                .map(|p| p as u16),
            version: first_string(obj, VERSION_FIELDS),
            availability_mode: first_string(obj, AVAILABILITY_MODE_FIELDS),
            synchronization_state: first_string(obj, SYNC_STATE_FIELDS),
            ag_replicas,
            listener: first_string(obj, LISTENER_FIELDS),
        })
    }

    /// Normalizuje celý seznam z collectoru, ne-objekty přeskočí s varováním
    pub fn parse_list(values: &[Value], engine: EngineKind) -> Vec<Self> {
        values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let record = Self::from_value(value, engine);
                if record.is_none() {
                    tracing::warn!(
                        "Skipping malformed {} node record at index {}: expected object, got {}",
                        engine,
                        index,
                        json_kind(value)
                    );
                }
                record
            })
            .collect()
    }

    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or("N/A")
    }

    /// Procento volného místa; used% má přednost před free%
    pub fn free_disk_percent(&self) -> Option<f64> {
        self.disk_used_percent
            .map(|used| 100.0 - used)
            .or(self.disk_free_percent)
    }

    pub fn used_disk_percent(&self) -> Option<f64> {
        self.disk_used_percent
            .or_else(|| self.disk_free_percent.map(|free| 100.0 - free))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

/// Převede engine-specifické kódy na textové role. Velikost písmen se
/// nemění, "secondary" není zdravá role.
fn normalize_role(raw: &str, engine: EngineKind) -> String {
    let role = raw.trim().to_string();
    match engine {
        // Kódy stavů členů replica setu (rs.status().members[].state)
        EngineKind::Mongodb => match role.as_str() {
            "0" => "STARTUP".to_string(),
            "1" => "PRIMARY".to_string(),
            "2" => "SECONDARY".to_string(),
            "3" => "RECOVERING".to_string(),
            "5" => "STARTUP2".to_string(),
            "6" => "UNKNOWN".to_string(),
            "7" => "ARBITER".to_string(),
            "8" => "DOWN".to_string(),
            "9" => "ROLLBACK".to_string(),
            "10" => "REMOVED".to_string(),
            _ => role,
        },
        EngineKind::Postgresql => match role.as_str() {
            "PRIMARY" => "MASTER".to_string(),
            "STANDBY" | "REPLICA" => "SLAVE".to_string(),
            _ => role,
        },
        EngineKind::Mssql => role,
    }
}

fn parse_replica(value: &Value) -> Option<AgReplica> {
    let obj = value.as_object()?;
    let replica_server_name = first_string(obj, &["replica_server_name", "server_name", "hostname"])?;
    Some(AgReplica {
        replica_server_name,
        role: first_string(obj, &["role", "role_desc"]),
        availability_mode: first_string(obj, AVAILABILITY_MODE_FIELDS),
        synchronization_state: first_string(obj, SYNC_STATE_FIELDS),
    })
}

fn first_value<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| {
        let number = match obj.get(*k)? {
            Value::Number(n) => n.as_f64(),
            // Collectory občas posílají "85.3" nebo "85.3%"
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
