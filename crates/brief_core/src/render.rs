use crate::types::{ArchiveManifest, Briefing, HistoryLog};
use crate::Result;

pub trait Renderer: Send + Sync {
    /// Renders the presentation artifact. Must be deterministic for equal inputs.
    fn render(&self, briefing: &Briefing, manifest: &ArchiveManifest, history: &HistoryLog) -> Result<String>;
}
