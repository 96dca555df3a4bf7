//! Markdown snapshot layout.
//!
//! ```text
//! # Daily Briefing: 2024-01-01
//!
//! <!-- topic: Global Tech & AI News -->
//! ...raw generator text...
//! ```
//!
//! The topic markers are HTML comments so the file still reads as plain
//! markdown. Files without markers load as a single section.

use chrono::NaiveDate;

pub const HEADER_PREFIX: &str = "# Daily Briefing:";
const MARKER_OPEN: &str = "<!-- topic:";
const MARKER_CLOSE: &str = "-->";

/// Raw generator output for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicText {
    pub topic: String,
    pub raw: String,
}

impl TopicText {
    pub fn new(topic: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            raw: raw.into(),
        }
    }
}

pub fn compose(date: NaiveDate, sections: &[TopicText]) -> String {
    let mut out = format!("{} {}\n", HEADER_PREFIX, date.format("%Y-%m-%d"));
    for section in sections {
        let topic = section.topic.replace(MARKER_CLOSE, "").replace('\n', " ");
        out.push('\n');
        out.push_str(&format!("{} {} {}\n", MARKER_OPEN, topic.trim(), MARKER_CLOSE));
        out.push_str(section.raw.trim_end());
        out.push('\n');
    }
    out
}

/// Splits snapshot contents back into topic sections. Text before the first
/// marker is attributed to `default_topic`. Blank sections are dropped.
pub fn split(contents: &str, default_topic: &str) -> Vec<TopicText> {
    let mut sections: Vec<TopicText> = Vec::new();
    let mut current = TopicText::new(default_topic, String::new());
    let mut header_checked = false;

    for line in contents.lines() {
        let trimmed = line.trim();
        if !header_checked && !trimmed.is_empty() {
            header_checked = true;
            if trimmed.starts_with(HEADER_PREFIX) {
                continue;
            }
        }
        if let Some(topic) = marker_topic(trimmed) {
            sections.push(std::mem::replace(&mut current, TopicText::new(topic, String::new())));
            continue;
        }
        current.raw.push_str(line);
        current.raw.push('\n');
    }
    sections.push(current);

    sections.retain(|s| !s.raw.trim().is_empty());
    for section in &mut sections {
        let end = section.raw.trim_end().len();
        section.raw.truncate(end);
        section.raw.push('\n');
    }
    sections
}

fn marker_topic(line: &str) -> Option<&str> {
    line.strip_prefix(MARKER_OPEN)?
        .strip_suffix(MARKER_CLOSE)
        .map(str::trim)
}
