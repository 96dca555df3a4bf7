use std::path::Path;
use std::time::Duration;

use brief_core::{Error, Result};
use brief_parser::classifier::{default_rules, DEFAULT_TAG};
use brief_parser::{Classifier, ClassifierRule, ParserConfig};
use brief_render::{RenderOptions, Theme};
use brief_storage::archive::DEFAULT_SNAPSHOT_DIR;
use brief_storage::history::{DEFAULT_HISTORY_KEY, DEFAULT_RETENTION};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "Global Tech & AI News";

/// Everything a run needs to know, passed explicitly into the pipeline.
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefingConfig {
    pub topics: Vec<String>,
    pub title: String,
    pub theme: Theme,
    pub delimiter: String,
    pub labels: Vec<String>,
    pub rules: Vec<ClassifierRule>,
    pub default_tag: String,
    pub retention: usize,
    pub archive_links: usize,
    pub recovery_depth: usize,
    pub fetch_timeout_secs: u64,
    pub fetch_attempts: u32,
    pub retry_delay_secs: u64,
    pub snapshot_dir: String,
    pub history_file: String,
    pub page_file: String,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        let parser = ParserConfig::default();
        Self {
            topics: vec![DEFAULT_TOPIC.to_string()],
            title: "Daily Briefing".to_string(),
            theme: Theme::default(),
            delimiter: parser.delimiter,
            labels: parser.labels,
            rules: default_rules(),
            default_tag: DEFAULT_TAG.to_string(),
            retention: DEFAULT_RETENTION,
            archive_links: 7,
            recovery_depth: 14,
            fetch_timeout_secs: 120,
            fetch_attempts: 2,
            retry_delay_secs: 2,
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
            history_file: DEFAULT_HISTORY_KEY.to_string(),
            page_file: "index.html".to_string(),
        }
    }
}

impl BriefingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.topics.iter().all(|t| t.trim().is_empty()) {
            Some("at least one topic is required")
        } else if self.delimiter.trim().is_empty() {
            Some("delimiter must not be blank")
        } else if self.retention == 0 {
            Some("retention must be at least 1")
        } else if self.fetch_attempts == 0 {
            Some("fetch_attempts must be at least 1")
        } else if self.snapshot_dir.trim().is_empty() || self.page_file.trim().is_empty() {
            Some("snapshot_dir and page_file must be set")
        } else {
            None
        };
        match problem {
            Some(msg) => Err(Error::Config(msg.to_string())),
            None => Ok(()),
        }
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            delimiter: self.delimiter.clone(),
            labels: self.labels.clone(),
        }
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.rules.clone(), self.default_tag.clone())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: self.theme,
            title: self.title.clone(),
            archive_href: self.snapshot_dir.clone(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}
