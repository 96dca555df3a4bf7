use std::sync::Arc;

use brief_core::{ArchiveEntry, ArchiveManifest, RecordStore, Result};
use chrono::NaiveDate;
use tracing::warn;

pub const DEFAULT_SNAPSHOT_DIR: &str = "briefings";
const SNAPSHOT_SUFFIX: &str = ".md";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-named snapshot files in one directory of a [`RecordStore`].
pub struct ArchiveIndex {
    store: Arc<dyn RecordStore>,
    dir: String,
}

impl ArchiveIndex {
    pub fn new(store: Arc<dyn RecordStore>, dir: impl Into<String>) -> Self {
        Self {
            store,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn snapshot_key(&self, date: NaiveDate) -> String {
        format!("{}/{}", self.dir, snapshot_id(date))
    }

    /// Up to `max_count` snapshots, most recent first. Rebuilt on every call.
    pub async fn list_recent(&self, max_count: usize) -> ArchiveManifest {
        let names = self.names().await;
        manifest_from_names(names.iter().map(String::as_str), max_count)
    }

    /// Up to `max_count` snapshots dated on or before `date`, most recent first.
    pub async fn list_until(&self, date: NaiveDate, max_count: usize) -> ArchiveManifest {
        let names = self.names().await;
        let eligible = names
            .iter()
            .map(String::as_str)
            .filter(|name| parse_snapshot_id(name).is_some_and(|d| d <= date));
        manifest_from_names(eligible, max_count)
    }

    /// `list_recent` as it will read once the snapshot for `date` is written.
    pub async fn list_recent_with(&self, date: NaiveDate, max_count: usize) -> ArchiveManifest {
        let mut names = self.names().await;
        names.push(snapshot_id(date));
        manifest_from_names(names.iter().map(String::as_str), max_count)
    }

    async fn names(&self) -> Vec<String> {
        self.store.list(&self.dir).await.unwrap_or_else(|e| {
            warn!("⚠️ Could not list snapshots in {}: {}", self.dir, e);
            Vec::new()
        })
    }

    pub async fn read_snapshot(&self, entry: &ArchiveEntry) -> Result<Option<String>> {
        self.store
            .read(&format!("{}/{}", self.dir, entry.id))
            .await
    }

    pub async fn write_snapshot(&self, date: NaiveDate, contents: &str) -> Result<()> {
        self.store
            .write_atomic(&self.snapshot_key(date), contents)
            .await
    }
}

pub fn snapshot_id(date: NaiveDate) -> String {
    format!("{}{}", date.format(DATE_FORMAT), SNAPSHOT_SUFFIX)
}

/// The date of a recognised snapshot name (`YYYY-MM-DD.md`).
pub fn parse_snapshot_id(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(SNAPSHOT_SUFFIX)?;
    if stem.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

/// Builds a manifest from directory entry names, ignoring anything that is not
/// a snapshot. Names sort lexicographically descending, which for zero-padded
/// dates is newest first.
pub fn manifest_from_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
    max_count: usize,
) -> ArchiveManifest {
    let mut entries: Vec<ArchiveEntry> = names
        .into_iter()
        .filter_map(|name| {
            parse_snapshot_id(name).map(|date| ArchiveEntry {
                date,
                id: name.to_string(),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.id.cmp(&a.id));
    entries.dedup_by(|a, b| a.id == b.id);
    entries.truncate(max_count);
    ArchiveManifest { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{FsStore, MemoryStore};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_parse_snapshot_id() {
        assert_eq!(parse_snapshot_id("2024-01-02.md"), Some(day(1, 2)));
        assert_eq!(parse_snapshot_id("2024-1-2.md"), None);
        assert_eq!(parse_snapshot_id("2024-02-30.md"), None);
        assert_eq!(parse_snapshot_id("2024-01-02.md.tmp"), None);
        assert_eq!(parse_snapshot_id("notes.md"), None);
        assert_eq!(parse_snapshot_id("2024-01-02.html"), None);
    }

    #[test]
    fn test_manifest_from_names_sorts_and_truncates() {
        let names = [
            "2024-01-02.md",
            "README.md",
            "2023-12-31.md",
            "2024-02-01.md",
            "2024-01-10.md",
            ".2024-01-11.md.tmp",
        ];
        let manifest = manifest_from_names(names, 3);
        let ids: Vec<_> = manifest.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-02-01.md", "2024-01-10.md", "2024-01-02.md"]);
        assert_eq!(manifest.latest().unwrap().date, day(2, 1));
    }

    #[test]
    fn test_manifest_zero_count() {
        assert!(manifest_from_names(["2024-01-02.md"], 0).is_empty());
    }

    #[tokio::test]
    async fn test_list_recent_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = ArchiveIndex::new(Arc::new(FsStore::new(dir.path().join("nope"))), "briefings");
        assert!(index.list_recent(7).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_until_filters_before_truncating() {
        let store = MemoryStore::new();
        let index = ArchiveIndex::new(Arc::new(store), DEFAULT_SNAPSHOT_DIR);
        for d in [1, 5, 6, 7, 8] {
            index.write_snapshot(day(1, d), "x").await.unwrap();
        }

        let manifest = index.list_until(day(1, 4), 2).await;
        let ids: Vec<_> = manifest.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-01-01.md"]);
        assert_eq!(index.list_until(day(1, 6), 2).await.latest().unwrap().date, day(1, 6));
    }

    #[tokio::test]
    async fn test_list_recent_with_pending_snapshot() {
        let store = MemoryStore::new();
        let index = ArchiveIndex::new(Arc::new(store), DEFAULT_SNAPSHOT_DIR);
        index.write_snapshot(day(1, 1), "x").await.unwrap();

        let manifest = index.list_recent_with(day(1, 2), 10).await;
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.latest().unwrap().date, day(1, 2));
        assert_eq!(index.list_recent_with(day(1, 1), 10).await.entries.len(), 1);
        assert_eq!(index.list_recent(10).await.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_and_read_snapshot() {
        let store = MemoryStore::new();
        let index = ArchiveIndex::new(Arc::new(store.clone()), DEFAULT_SNAPSHOT_DIR);
        index.write_snapshot(day(1, 1), "old").await.unwrap();
        index.write_snapshot(day(1, 3), "new").await.unwrap();

        let manifest = index.list_recent(10).await;
        assert_eq!(manifest.entries.len(), 2);
        let latest = manifest.latest().unwrap();
        assert_eq!(latest.id, "2024-01-03.md");
        assert_eq!(index.read_snapshot(latest).await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.keys().await, vec![
            "briefings/2024-01-01.md".to_string(),
            "briefings/2024-01-03.md".to_string(),
        ]);
    }
}
