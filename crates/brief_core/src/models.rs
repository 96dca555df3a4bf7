use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// External text generator (a search-grounded LLM in production).
#[async_trait]
pub trait Generator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Returns raw delimiter-separated story blocks for `query`.
    async fn fetch(&self, query: &str) -> Result<String>;
}
