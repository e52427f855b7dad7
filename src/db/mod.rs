pub mod models;

use anyhow::{Context, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use rand::RngCore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config;
use crate::db::models::{CreateSource, Source};

/// Registr zdrojů telemetrie. Ukládá se jen konfigurace zdrojů, ne historie zdraví.
pub struct Database {
    pool: SqlitePool,
    encryption_key: [u8; 32],
}

impl Database {
    /// Vytvoří novou instanci databáze v app adresáři a provede migrace
    pub async fn new() -> Result<Self> {
        let db_path = config::get_db_path()?;
        let key = config::load_or_create_key()?;
        Self::open(&db_path, key).await
    }

    pub async fn open(db_path: &Path, key: Vec<u8>) -> Result<Self> {
        let db_url = format!("sqlite://{}", db_path.display());

        tracing::info!("Connecting to database: {}", db_url);

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        // Spustí migrace
        Self::run_migrations(&pool).await?;

        let encryption_key = key
            .try_into()
            .map_err(|_| anyhow::anyhow!("Invalid encryption key length"))?;

        Ok(Self { pool, encryption_key })
    }

    /// Spustí SQL migrace
    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        // Migration 001 - Initial schema
        let migration_001 = include_str!("../../migrations/001_init.sql");
        sqlx::raw_sql(migration_001)
            .execute(pool)
            .await
            .context("Failed to run migration 001")?;

        tracing::info!("Migrations completed successfully");
        Ok(())
    }

    /// Získá všechny zdroje
    pub async fn get_sources(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(
            "SELECT * FROM sources ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch sources")?;

        Ok(sources)
    }

    /// Získá zdroj podle ID
    pub async fn get_source(&self, id: i64) -> Result<Option<Source>> {
        let source = sqlx::query_as::<_, Source>(
            "SELECT * FROM sources WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch source")?;

        Ok(source)
    }

    /// Vytvoří nový zdroj
    pub async fn create_source(&self, source: CreateSource) -> Result<i64> {
        let password_encrypted = source
            .password
            .as_deref()
            .map(|p| self.encrypt_password(p))
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO sources (name, url, engine, insecure, username, password_encrypted)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&source.name)
        .bind(&source.url)
        .bind(source.engine.as_str())
        .bind(source.insecure)
        .bind(&source.username)
        .bind(&password_encrypted)
        .execute(&self.pool)
        .await
        .context("Failed to insert source")?;

        let source_id = result.last_insert_rowid();
        tracing::info!("Created {} source: {} (id: {})", source.engine, source.name, source_id);
        Ok(source_id)
    }

    /// Smaže zdroj, vrací false pokud neexistoval
    pub async fn delete_source(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete source")?;

        tracing::info!("Deleted source: {}", id);
        Ok(result.rows_affected() > 0)
    }

    /// Získá heslo pro zdroj (dešifruje z DB)
    pub async fn get_source_password(&self, source: &Source) -> Option<String> {
        if let Some(ref encrypted) = source.password_encrypted {
            match self.decrypt_password(encrypted) {
                Ok(password) => return Some(password),
                Err(e) => {
                    tracing::warn!(
                        "Failed to decrypt password for source {}: {}",
                        source.id,
                        e
                    );
                }
            }
        }

        if source.username.is_some() {
            tracing::warn!("No password available for source {}", source.id);
        }
        None
    }

    fn encrypt_password(&self, password: &str) -> Result<String> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.encryption_key));
        let mut nonce_bytes = [0u8; 12];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, password.as_bytes())
            .map_err(|_| anyhow::anyhow!("Failed to encrypt password"))?;

        let mut payload = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(base64::prelude::BASE64_STANDARD.encode(payload))
    }

    fn decrypt_password(&self, encrypted: &str) -> Result<String> {
        let payload = base64::prelude::BASE64_STANDARD
            .decode(encrypted)
            .context("Failed to decode encrypted password")?;
        if payload.len() < 12 {
            return Err(anyhow::anyhow!("Encrypted password payload is too short"));
        }
        let (nonce_bytes, ciphertext) = payload.split_at(12);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.encryption_key));
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| anyhow::anyhow!("Failed to decrypt password"))?;
        let password = String::from_utf8(plaintext)
            .context("Decrypted password is not valid UTF-8")?;
        Ok(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EngineKind;

    async fn open_temp(dir: &tempfile::TempDir) -> Database {
        Database::open(&dir.path().join("test.db"), vec![7u8; 32]).await.unwrap()
    }

    fn new_source(name: &str, password: Option<&str>) -> CreateSource {
        CreateSource {
            name: name.to_string(),
            url: "http://collector:9000".to_string(),
            engine: EngineKind::Mssql,
            insecure: false,
            username: password.map(|_| "monitor".to_string()),
            password: password.map(|p| p.to_string()),
        }
    }

    #[tokio::test]
    async fn test_source_crud_and_password_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_temp(&dir).await;

        let id = db.create_source(new_source("prod-ag", Some("s3cret"))).await.unwrap();
        db.create_source(new_source("lab", None)).await.unwrap();

        let source = db.get_source(id).await.unwrap().unwrap();
        assert_eq!(source.engine_kind().unwrap(), EngineKind::Mssql);
        assert_ne!(source.password_encrypted.as_deref(), Some("s3cret"));
        assert_eq!(db.get_source_password(&source).await.as_deref(), Some("s3cret"));

        let names: Vec<String> = db.get_sources().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["lab", "prod-ag"]);

        assert!(db.delete_source(id).await.unwrap());
        assert!(!db.delete_source(id).await.unwrap());
        assert!(db.get_source(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_key_length() {
        let dir = tempfile::tempdir().unwrap();
        let result = Database::open(&dir.path().join("test.db"), vec![1u8; 16]).await;
        assert!(result.is_err());
    }
}
