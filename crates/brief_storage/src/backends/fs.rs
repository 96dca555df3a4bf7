use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brief_core::{Error, RecordStore, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Files under a root directory. Writes go to a `.tmp` sibling which is then
/// renamed over the target.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn persistence_error(path: &Path, err: std::io::Error) -> Error {
    Error::Persistence(format!("failed to write {}: {}", path.display(), err))
}

#[async_trait]
impl RecordStore for FsStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(String::from_utf8(bytes).unwrap_or_else(|e| {
                warn!("⚠️ {} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_atomic(&self, key: &str, contents: &str) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error(parent, e))?;
        }

        let tmp = temp_path(&path);
        let written = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(contents.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(persistence_error(&path, e));
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Persistence(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(self.path_for(dir)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fs_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());

        assert_eq!(store.read("briefings/2024-01-01.md").await.unwrap(), None);
        store.write_atomic("briefings/2024-01-01.md", "hello").await.unwrap();
        assert_eq!(
            store.read("briefings/2024-01-01.md").await.unwrap().as_deref(),
            Some("hello")
        );

        store.write_atomic("briefings/2024-01-01.md", "replaced").await.unwrap();
        assert_eq!(
            store.read("briefings/2024-01-01.md").await.unwrap().as_deref(),
            Some("replaced")
        );
        assert!(!dir.path().join("briefings/2024-01-01.md.tmp").exists());
    }

    #[tokio::test]
    async fn test_fs_store_reads_invalid_utf8_lossily() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("history.json"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let store = FsStore::new(dir.path());

        let contents = store.read("history.json").await.unwrap().unwrap();
        assert!(contents.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_fs_store_remove() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());
        store.write_atomic("briefings/a.md", "a").await.unwrap();

        store.remove("briefings/a.md").await.unwrap();
        assert_eq!(store.read("briefings/a.md").await.unwrap(), None);
        store.remove("briefings/a.md").await.unwrap();
    }

    #[tokio::test]
    async fn test_fs_store_list() {
        let dir = tempdir().unwrap();
        let store = FsStore::new(dir.path());

        assert!(store.list("briefings").await.unwrap().is_empty());

        store.write_atomic("briefings/b.md", "b").await.unwrap();
        store.write_atomic("briefings/a.md", "a").await.unwrap();
        std::fs::create_dir_all(dir.path().join("briefings/nested")).unwrap();

        assert_eq!(
            store.list("briefings").await.unwrap(),
            vec!["a.md".to_string(), "b.md".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fs_store_write_failure_is_persistence_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("blocker"), "file, not a directory").unwrap();
        let store = FsStore::new(dir.path());

        let err = store.write_atomic("blocker/history.json", "[]").await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }

    #[test]
    fn test_path_for_stays_under_root() {
        let store = FsStore::new("/data");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/etc/passwd"));
        assert_eq!(store.path_for("briefings//x.md"), PathBuf::from("/data/briefings/x.md"));
    }
}
