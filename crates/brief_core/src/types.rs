use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Url value used when a story carries no usable link.
pub const NO_URL: &str = "none";

pub const SENTIMENT_RANGE: std::ops::RangeInclusive<f64> = -1.0..=1.0;
pub const IMPACT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Body of a story, keeping the layout the generator used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Body {
    Paragraph(String),
    Items(Vec<String>),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Paragraph(text) => text.is_empty(),
            Body::Items(items) => items.is_empty(),
        }
    }

    /// Flattened text, used for keyword matching.
    pub fn text(&self) -> String {
        match self {
            Body::Paragraph(text) => text.clone(),
            Body::Items(items) => items.join(" "),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Paragraph(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub url: String,
    pub body: Body,
    pub tags: BTreeSet<String>,
}

impl NewsRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, body: Body) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            body,
            tags: BTreeSet::new(),
        }
    }

    pub fn has_link(&self) -> bool {
        self.url != NO_URL
    }

    /// The first tag, if classification has run.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.iter().next().map(String::as_str)
    }
}

/// Records produced for one configured topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBriefing {
    pub topic: String,
    pub records: Vec<NewsRecord>,
}

/// Where the records of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "date")]
pub enum BriefingSource {
    Fresh,
    Archived(NaiveDate),
}

/// Everything the renderer needs about one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Briefing {
    pub date: NaiveDate,
    pub source: BriefingSource,
    pub topics: Vec<TopicBriefing>,
}

impl Briefing {
    pub fn record_count(&self) -> usize {
        self.topics.iter().map(|t| t.records.len()).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &NewsRecord> {
        self.topics.iter().flat_map(|t| t.records.iter())
    }
}

/// One persisted metric observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub topic: String,
    pub sentiment: f64,
    pub impact: u8,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, topic: impl Into<String>, sentiment: f64, impact: u8) -> Self {
        Self {
            date,
            topic: topic.into(),
            sentiment,
            impact,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.sentiment.is_finite()
            && SENTIMENT_RANGE.contains(&self.sentiment)
            && IMPACT_RANGE.contains(&self.impact)
    }
}

/// Insertion-ordered history. Not guaranteed sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    pub entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the oldest entries so that at most `bound` remain.
    pub fn truncate_front(&mut self, bound: usize) {
        if self.entries.len() > bound {
            let excess = self.entries.len() - bound;
            self.entries.drain(..excess);
        }
    }

    /// Topic labels in order of first appearance.
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.topic.as_str()) {
                seen.push(entry.topic.as_str());
            }
        }
        seen
    }

    /// `(date, sentiment, impact)` points for one topic, in insertion order.
    pub fn series(&self, topic: &str) -> Vec<(NaiveDate, f64, u8)> {
        self.entries
            .iter()
            .filter(|e| e.topic == topic)
            .map(|e| (e.date, e.sentiment, e.impact))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub date: NaiveDate,
    /// Snapshot file name, e.g. `2024-01-01.md`.
    pub id: String,
}

/// Persisted snapshots, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveManifest {
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveManifest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ArchiveEntry> {
        self.entries.first()
    }
}
