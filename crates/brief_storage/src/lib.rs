use std::path::Path;
use std::sync::Arc;

use brief_core::{Error, RecordStore, Result};

pub mod archive;
pub mod backends;
pub mod history;
pub mod snapshot;

pub use archive::ArchiveIndex;
pub use backends::*;
pub use history::HistoryStore;
pub use snapshot::TopicText;

/// Builds a record store by name: `fs` (rooted at `root`) or `memory`.
pub fn create_storage(kind: &str, root: &Path) -> Result<Arc<dyn RecordStore>> {
    match kind {
        "fs" | "file" => Ok(Arc::new(FsStore::new(root))),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Config(format!(
            "unknown storage backend `{}` (expected fs or memory)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::archive::ArchiveIndex;
    pub use super::backends::*;
    pub use super::history::HistoryStore;
    pub use super::snapshot::TopicText;
    pub use brief_core::RecordStore;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_storage() {
        let root = Path::new(".");
        assert!(create_storage("fs", root).is_ok());
        assert!(create_storage("memory", root).is_ok());
        let err = create_storage("qdrant", root).err().unwrap();
        assert!(err.to_string().contains("unknown storage backend"));
    }
}
