//! Size-bounded metric history kept in a single JSON file.
//!
//! Reads never fail: a missing or corrupt file is an empty history. Appends
//! load, extend, truncate from the front and replace the file atomically.

use std::sync::Arc;

use brief_core::{HistoryEntry, HistoryLog, RecordStore, Result};
use tracing::{debug, warn};

pub const DEFAULT_RETENTION: usize = 100;
pub const DEFAULT_HISTORY_KEY: &str = "history.json";

pub struct HistoryStore {
    store: Arc<dyn RecordStore>,
    key: String,
    retention: usize,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn RecordStore>, key: impl Into<String>, retention: usize) -> Self {
        Self {
            store,
            key: key.into(),
            retention,
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> HistoryLog {
        match self.store.read(&self.key).await {
            Ok(Some(contents)) => self.decode(&contents).unwrap_or_default(),
            Ok(None) => HistoryLog::default(),
            Err(e) => {
                warn!("⚠️ Could not read history {}: {}", self.key, e);
                HistoryLog::default()
            }
        }
    }

    /// Appends the valid subset of `entries` and returns the stored log.
    pub async fn append(&self, entries: Vec<HistoryEntry>) -> Result<HistoryLog> {
        let log = self.prepare(entries).await?;
        self.store.write_atomic(&self.key, &encode(&log)?).await?;
        debug!("History now holds {} entries", log.len());
        Ok(log)
    }

    /// The log `append` would store, without writing it. A corrupt file is
    /// copied to `<key>.corrupt` and treated as empty.
    pub async fn prepare(&self, entries: Vec<HistoryEntry>) -> Result<HistoryLog> {
        let valid = validate(entries);

        // Only undecodable content counts as corruption; a failed read is surfaced.
        let mut log = match self.store.read(&self.key).await? {
            Some(contents) => match self.decode(&contents) {
                Some(log) => log,
                None => {
                    self.store
                        .write_atomic(&format!("{}.corrupt", self.key), &contents)
                        .await?;
                    HistoryLog::default()
                }
            },
            None => HistoryLog::default(),
        };

        log.entries.extend(valid);
        log.truncate_front(self.retention);
        Ok(log)
    }

    /// Decodes entry by entry so one unreadable entry does not discard the rest.
    fn decode(&self, contents: &str) -> Option<HistoryLog> {
        let values = match serde_json::from_str::<Vec<serde_json::Value>>(contents) {
            Ok(values) => values,
            Err(e) => {
                warn!("⚠️ History {} is corrupt, starting empty: {}", self.key, e);
                return None;
            }
        };

        let entries = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<HistoryEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("⚠️ Dropping unreadable history entry in {}: {}", self.key, e);
                    None
                }
            })
            .collect();
        Some(HistoryLog::new(validate(entries)))
    }
}

/// Serialized form of the history file.
pub fn encode(log: &HistoryLog) -> Result<String> {
    Ok(serde_json::to_string_pretty(log)?)
}

/// Drops entries whose sentiment or impact is out of range.
pub fn validate(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            let ok = entry.is_valid();
            if !ok {
                warn!(
                    "⚠️ Rejecting history entry for {} on {}: sentiment={} impact={}",
                    entry.topic, entry.date, entry.sentiment, entry.impact
                );
            }
            ok
        })
        .collect()
}
