//! Settings/Stats Store for ChatLens.
//!
//! A key-value persistence service over two scopes: Sync holds the user
//! settings, Local holds the usage counters. Values are JSON, one row per
//! key, so partial updates touch only the keys they name — the engine can
//! persist `totalMessages` without rewriting `totalImages`. Reads merge
//! stored values with caller-side defaults, so a fresh store behaves as if
//! the defaults had been written.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use serde_json::Value;

use crate::database::connection::Database;
use crate::types::errors::StorageError;
use crate::types::settings::ExtensionSettings;
use crate::types::stats::UsageStats;

/// The two persistence scopes of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Synchronized scope: user preferences.
    Sync,
    /// Local scope: counters and worker bookkeeping.
    Local,
}

impl StorageScope {
    fn table(self) -> &'static str {
        match self {
            StorageScope::Sync => "sync_store",
            StorageScope::Local => "local_store",
        }
    }
}

/// Persisted key names, matching the wire names of the typed records.
pub const KEY_STATS_ENABLED: &str = "statsEnabled";
pub const KEY_IMAGE_PREVIEW_ENABLED: &str = "imagePreviewEnabled";
pub const KEY_AUTO_SAVE_ENABLED: &str = "autoSaveEnabled";
pub const KEY_TOTAL_MESSAGES: &str = "totalMessages";
pub const KEY_TOTAL_IMAGES: &str = "totalImages";

/// Trait defining the settings/stats store interface.
pub trait StorageServiceTrait {
    fn get_value(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StorageError>;
    fn set_value(&self, scope: StorageScope, key: &str, value: &Value) -> Result<(), StorageError>;
    /// Reads the full settings record, defaulting each missing key.
    fn get_settings(&self) -> Result<ExtensionSettings, StorageError>;
    /// Writes the full settings record (all three keys).
    fn set_settings(&self, settings: &ExtensionSettings) -> Result<(), StorageError>;
    /// Reads both counters, defaulting missing keys to zero.
    fn get_stats(&self) -> Result<UsageStats, StorageError>;
    fn set_total_messages(&self, count: u64) -> Result<(), StorageError>;
    fn set_total_images(&self, count: u64) -> Result<(), StorageError>;
    /// Writes zeros to both counters.
    fn reset_stats(&self) -> Result<(), StorageError>;
    /// No-op read used as the background worker's keep-alive heartbeat.
    fn touch(&self, scope: StorageScope, key: &str) -> Result<(), StorageError>;
}

/// Store implementation backed by the shared SQLite database.
pub struct StorageService {
    db: Arc<Database>,
}

impl StorageService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now_ts() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn get_bool(&self, scope: StorageScope, key: &str, default: bool) -> Result<bool, StorageError> {
        match self.get_value(scope, key)? {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(StorageError::SerializationError(format!(
                "expected bool for key '{}', found {}",
                key, other
            ))),
            None => Ok(default),
        }
    }

    fn get_u64(&self, scope: StorageScope, key: &str, default: u64) -> Result<u64, StorageError> {
        match self.get_value(scope, key)? {
            Some(value) => value.as_u64().ok_or_else(|| {
                StorageError::SerializationError(format!(
                    "expected non-negative integer for key '{}', found {}",
                    key, value
                ))
            }),
            None => Ok(default),
        }
    }
}

impl StorageServiceTrait for StorageService {
    fn get_value(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StorageError> {
        let conn = self.db.connection();
        let sql = format!("SELECT value FROM {} WHERE key = ?1", scope.table());
        let result = conn.query_row(&sql, params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::DatabaseError(e.to_string())),
        }
    }

    fn set_value(&self, scope: StorageScope, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let conn = self.db.connection();
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value, updated_at) VALUES (?1, ?2, ?3)",
            scope.table()
        );
        conn.execute(&sql, params![key, text, Self::now_ts()])
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn get_settings(&self) -> Result<ExtensionSettings, StorageError> {
        let defaults = ExtensionSettings::default();
        Ok(ExtensionSettings {
            stats_enabled: self.get_bool(
                StorageScope::Sync,
                KEY_STATS_ENABLED,
                defaults.stats_enabled,
            )?,
            image_preview_enabled: self.get_bool(
                StorageScope::Sync,
                KEY_IMAGE_PREVIEW_ENABLED,
                defaults.image_preview_enabled,
            )?,
            auto_save_enabled: self.get_bool(
                StorageScope::Sync,
                KEY_AUTO_SAVE_ENABLED,
                defaults.auto_save_enabled,
            )?,
        })
    }

    fn set_settings(&self, settings: &ExtensionSettings) -> Result<(), StorageError> {
        self.set_value(
            StorageScope::Sync,
            KEY_STATS_ENABLED,
            &Value::Bool(settings.stats_enabled),
        )?;
        self.set_value(
            StorageScope::Sync,
            KEY_IMAGE_PREVIEW_ENABLED,
            &Value::Bool(settings.image_preview_enabled),
        )?;
        self.set_value(
            StorageScope::Sync,
            KEY_AUTO_SAVE_ENABLED,
            &Value::Bool(settings.auto_save_enabled),
        )?;
        Ok(())
    }

    fn get_stats(&self) -> Result<UsageStats, StorageError> {
        Ok(UsageStats {
            total_messages: self.get_u64(StorageScope::Local, KEY_TOTAL_MESSAGES, 0)?,
            total_images: self.get_u64(StorageScope::Local, KEY_TOTAL_IMAGES, 0)?,
        })
    }

    fn set_total_messages(&self, count: u64) -> Result<(), StorageError> {
        self.set_value(
            StorageScope::Local,
            KEY_TOTAL_MESSAGES,
            &Value::from(count),
        )
    }

    fn set_total_images(&self, count: u64) -> Result<(), StorageError> {
        self.set_value(StorageScope::Local, KEY_TOTAL_IMAGES, &Value::from(count))
    }

    fn reset_stats(&self) -> Result<(), StorageError> {
        self.set_total_messages(0)?;
        self.set_total_images(0)?;
        Ok(())
    }

    fn touch(&self, scope: StorageScope, key: &str) -> Result<(), StorageError> {
        // Keep-alive read; the value is discarded.
        let _ = self.get_value(scope, key)?;
        Ok(())
    }
}
