use anyhow::{Context, Result};
use rand::RngCore;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::health::Thresholds;
use crate::topology::LayoutGeometry;

/// Vrací cestu k application data adresáři dle OS
pub fn get_app_dir() -> Result<PathBuf> {
    let base_dir = if cfg!(target_os = "windows") {
        // Windows: %APPDATA%\replica-monitor
        let appdata: PathBuf = std::env::var("APPDATA")
            .context("APPDATA environment variable not found")?
            .into();
        appdata.join("replica-monitor")
    } else {
        // Linux/macOS: ~/.replica-monitor
        let home = std::env::var("HOME")
            .context("HOME environment variable not found")?;
        PathBuf::from(home).join(".replica-monitor")
    };

    Ok(base_dir)
}

/// Vrací cestu k data adresáři
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = get_app_dir()?.join("data");
    Ok(data_dir)
}

/// Vrací cestu k SQLite databázi se zdroji telemetrie
pub fn get_db_path() -> Result<PathBuf> {
    let db_path = get_data_dir()?.join("replica-monitor.db");
    Ok(db_path)
}

/// Inicializuje adresáře (vytvoří je pokud neexistují)
pub fn init_directories() -> Result<()> {
    let data_dir = get_data_dir()?;

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .context("Failed to create data directory")?;
        tracing::info!("Created data directory: {}", data_dir.display());
    }

    Ok(())
}

/// Načte AES klíč pro hesla ke collectorům, případně vygeneruje nový
pub fn load_or_create_key() -> Result<Vec<u8>> {
    load_or_create_key_at(&get_data_dir()?.join("secret.key"))
}

pub fn load_or_create_key_at(path: &Path) -> Result<Vec<u8>> {
    if path.exists() {
        let key = std::fs::read(path)
            .with_context(|| format!("Failed to read encryption key {}", path.display()))?;
        return Ok(key);
    }

    let mut key = vec![0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut key);
    std::fs::write(path, &key)
        .with_context(|| format!("Failed to write encryption key {}", path.display()))?;
    tracing::info!("Generated new encryption key: {}", path.display());

    Ok(key)
}

/// Prahy z ~/.replica-monitor/thresholds.json, bez souboru výchozí hodnoty
pub fn load_thresholds() -> Result<Thresholds> {
    load_thresholds_from(&get_app_dir()?.join("thresholds.json"))
}

pub fn load_thresholds_from(path: &Path) -> Result<Thresholds> {
    load_json_or_default(path)
}

/// Rozměry topologie z ~/.replica-monitor/layout.json, bez souboru výchozí hodnoty
pub fn load_geometry() -> Result<LayoutGeometry> {
    load_geometry_from(&get_app_dir()?.join("layout.json"))
}

pub fn load_geometry_from(path: &Path) -> Result<LayoutGeometry> {
    load_json_or_default(path)
}

/// Chybějící soubor = výchozí hodnoty, chybějící klíče řeší `serde(default)`
fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_path() {
        let app_dir = get_app_dir().unwrap();
        assert!(app_dir.to_string_lossy().contains("replica-monitor"));
    }

    #[test]
    fn test_db_path() {
        let db_path = get_db_path().unwrap();
        assert!(db_path.to_string_lossy().ends_with("replica-monitor.db"));
    }

    #[test]
    fn test_key_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        let first = load_or_create_key_at(&path).unwrap();
        let second = load_or_create_key_at(&path).unwrap();
        assert_eq!(first.len(), 32);
        assert_eq!(first, second);
    }

    #[test]
    fn test_thresholds_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        assert_eq!(load_thresholds_from(&path).unwrap(), Thresholds::default());

        std::fs::write(&path, r#"{"disk_used_warning_percent": 90}"#).unwrap();
        let t = load_thresholds_from(&path).unwrap();
        assert_eq!(t.disk_used_warning_percent, 90.0);
        assert_eq!(t.replication_lag_warning_secs, 30.0);

        std::fs::write(&path, "not json").unwrap();
        assert!(load_thresholds_from(&path).is_err());
    }

    #[test]
    fn test_geometry_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        assert_eq!(load_geometry_from(&path).unwrap(), LayoutGeometry::default());

        std::fs::write(&path, r#"{"center_x": 600, "follower_radius": 250}"#).unwrap();
        let g = load_geometry_from(&path).unwrap();
        assert_eq!(g.center_x, 600.0);
        assert_eq!(g.follower_radius, 250.0);
        assert_eq!(g.center_y, LayoutGeometry::default().center_y);
    }
}
