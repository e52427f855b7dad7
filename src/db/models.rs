use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EngineKind, UnknownEngine};

/// Collector telemetrie pro jeden engine
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub engine: String,
    pub insecure: bool,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_encrypted: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Source {
    pub fn engine_kind(&self) -> Result<EngineKind, UnknownEngine> {
        self.engine.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSource {
    pub name: String,
    pub url: String,
    pub engine: EngineKind,
    #[serde(default)]
    pub insecure: bool,
    pub username: Option<String>,
    pub password: Option<String>, // Toto se uloží šifrovaně do DB
}
