use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skiff_core::consent::{SettingsError, SettingsStore};

use crate::database::Database;
use crate::error::StoreError;

/// One persisted setting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// String key/value settings, the persistence surface behind the consent
/// flag. The diagnostics facade only ever reads; writes come from the
/// application's settings screens.
pub struct SettingsRepo {
    db: Database,
}

impl SettingsRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fetch the value stored under `key`, if any.
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(StoreError::from(other)),
                })?;
            Ok(value)
        })
    }

    /// Insert or overwrite a setting.
    #[instrument(skip(self, value))]
    pub fn set(&self, key: &str, value: &str) -> Result<SettingRow, StoreError> {
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                rusqlite::params![key, value, now],
            )?;

            Ok(SettingRow {
                key: key.to_string(),
                value: value.to_string(),
                updated_at: now,
            })
        })
    }

    /// Delete a setting.
    #[instrument(skip(self))]
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
            if rows == 0 {
                return Err(StoreError::NotFound(format!("setting {key}")));
            }
            Ok(())
        })
    }

    /// List all settings, ordered by key.
    pub fn all(&self) -> Result<Vec<SettingRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value, updated_at FROM settings ORDER BY key ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(SettingRow {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

#[async_trait]
impl SettingsStore for SettingsRepo {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        SettingsRepo::get(self, key).map_err(|e| SettingsError::Read(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use skiff_core::consent::{ConsentResolver, ConsentState, CONSENT_KEY};

    fn test_repo() -> SettingsRepo {
        SettingsRepo::new(Database::in_memory().unwrap())
    }

    #[test]
    fn missing_key_is_none() {
        let repo = test_repo();
        assert!(repo.get("skiff:theme").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let repo = test_repo();
        repo.set("skiff:theme", "dark").unwrap();
        assert_eq!(repo.get("skiff:theme").unwrap().unwrap(), "dark");
    }

    #[test]
    fn set_overwrites() {
        let repo = test_repo();
        repo.set("skiff:theme", "dark").unwrap();
        repo.set("skiff:theme", "light").unwrap();
        assert_eq!(repo.get("skiff:theme").unwrap().unwrap(), "light");
    }

    #[test]
    fn delete_setting() {
        let repo = test_repo();
        repo.set("skiff:theme", "dark").unwrap();
        repo.delete("skiff:theme").unwrap();
        assert!(repo.get("skiff:theme").unwrap().is_none());
    }

    #[test]
    fn delete_missing_fails() {
        let repo = test_repo();
        assert!(repo.delete("skiff:theme").is_err());
    }

    #[test]
    fn all_sorted_by_key() {
        let repo = test_repo();
        repo.set("skiff:theme", "dark").unwrap();
        repo.set("skiff:locale", "en-GB").unwrap();

        let rows = repo.all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "skiff:locale");
        assert_eq!(rows[1].key, "skiff:theme");
    }

    #[tokio::test]
    async fn serves_consent_reads() {
        let repo = test_repo();
        repo.set(CONSENT_KEY, "agreed").unwrap();

        let resolver = ConsentResolver::new(Arc::new(repo), CONSENT_KEY);
        assert_eq!(resolver.resolve().await, ConsentState::Granted);
    }

    #[tokio::test]
    async fn unset_consent_resolves_unknown() {
        let resolver = ConsentResolver::new(Arc::new(test_repo()), CONSENT_KEY);
        assert_eq!(resolver.resolve().await, ConsentState::Unknown);
    }
}
