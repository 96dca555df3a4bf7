use std::fmt;

use brief_core::Result;
use brief_core::Generator;

/// Offline generator returning fixed stories in the block format.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

const STORIES: &str = "\
### [Open model tops reasoning benchmark](https://example.com/benchmark)
Summary: A new open-weights model posts record scores on a public research benchmark.
---
### [Chipmaker raises $2B for new fab](https://example.com/fab)
**Summary:** The funding round expands capacity for advanced packaging.
---
### Cloud outage disrupts services
- Several regions were affected for two hours.
- The provider has promised a full incident report.
---
";

#[async_trait::async_trait]
impl Generator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn fetch(&self, _query: &str) -> Result<String> {
        Ok(STORIES.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let text = model.fetch("anything").await.unwrap();
        assert_eq!(text.matches("\n---\n").count(), 3);
        assert!(text.starts_with("### [Open model"));
    }
}
