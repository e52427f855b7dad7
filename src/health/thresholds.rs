use serde::{Deserialize, Serialize};

use crate::models::{EngineKind, LagTier};

/// Použité místo na disku nad touto hodnotou (striktně) = Warning
pub const DISK_USED_WARNING_PERCENT: f64 = 80.0;
/// Replikační lag nad touto hodnotou (striktně) = Warning
pub const REPLICATION_LAG_WARNING_SECS: f64 = 30.0;

pub const MONGODB_LAG_DELAYED_SECS: f64 = 10.0;
pub const MONGODB_LAG_CRITICAL_SECS: f64 = 100.0;
pub const POSTGRESQL_LAG_DELAYED_SECS: f64 = 100.0;
pub const POSTGRESQL_LAG_CRITICAL_SECS: f64 = 300.0;

/// Pásma lagu pro styl hran topologie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagBuckets {
    pub delayed_secs: f64,
    pub critical_secs: f64,
}

impl LagBuckets {
    /// Healthy pod `delayed_secs`, Delayed až do `critical_secs` včetně, pak Critical
    pub fn classify(&self, lag_secs: Option<f64>) -> LagTier {
        match lag_secs {
            None => LagTier::Unknown,
            Some(lag) if lag < self.delayed_secs => LagTier::Healthy,
            Some(lag) if lag <= self.critical_secs => LagTier::Delayed,
            Some(_) => LagTier::Critical,
        }
    }
}

/// Všechny prahy na jednom místě. Lze je přepsat souborem thresholds.json,
/// chybějící klíče zůstávají na výchozích hodnotách.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub disk_used_warning_percent: f64,
    pub replication_lag_warning_secs: f64,
    pub mongodb_lag: LagBuckets,
    pub postgresql_lag: LagBuckets,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            disk_used_warning_percent: DISK_USED_WARNING_PERCENT,
            replication_lag_warning_secs: REPLICATION_LAG_WARNING_SECS,
            mongodb_lag: LagBuckets {
                delayed_secs: MONGODB_LAG_DELAYED_SECS,
                critical_secs: MONGODB_LAG_CRITICAL_SECS,
            },
            postgresql_lag: LagBuckets {
                delayed_secs: POSTGRESQL_LAG_DELAYED_SECS,
                critical_secs: POSTGRESQL_LAG_CRITICAL_SECS,
            },
        }
    }
}

impl Thresholds {
    /// MSSQL hrany se řídí commit módem, ne lagem
    pub fn lag_buckets(&self, engine: EngineKind) -> Option<LagBuckets> {
        match engine {
            EngineKind::Mongodb => Some(self.mongodb_lag),
            EngineKind::Postgresql => Some(self.postgresql_lag),
            EngineKind::Mssql => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongodb_lag_buckets() {
        let buckets = Thresholds::default().mongodb_lag;
        assert_eq!(buckets.classify(None), LagTier::Unknown);
        assert_eq!(buckets.classify(Some(0.0)), LagTier::Healthy);
        assert_eq!(buckets.classify(Some(9.9)), LagTier::Healthy);
        assert_eq!(buckets.classify(Some(10.0)), LagTier::Delayed);
        assert_eq!(buckets.classify(Some(100.0)), LagTier::Delayed);
        assert_eq!(buckets.classify(Some(100.5)), LagTier::Critical);
    }

    #[test]
    fn test_postgresql_lag_buckets_differ_from_mongodb() {
        let thresholds = Thresholds::default();
        let pg = thresholds.lag_buckets(EngineKind::Postgresql).unwrap();
        assert_eq!(pg.classify(Some(50.0)), LagTier::Healthy);
        assert_eq!(pg.classify(Some(150.0)), LagTier::Delayed);
        assert_eq!(pg.classify(Some(301.0)), LagTier::Critical);
        assert!(thresholds.lag_buckets(EngineKind::Mssql).is_none());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{"replication_lag_warning_secs": 60}"#).unwrap();
        assert_eq!(t.replication_lag_warning_secs, 60.0);
        assert_eq!(t.disk_used_warning_percent, DISK_USED_WARNING_PERCENT);
        assert_eq!(t.postgresql_lag.critical_secs, POSTGRESQL_LAG_CRITICAL_SECS);
    }
}
