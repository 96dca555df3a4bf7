//! Turns generator output into [`NewsRecord`]s.
//!
//! The work is split into named steps so each can be checked on its own:
//! [`split_blocks`] cuts the raw text on delimiter lines, [`block_lines`]
//! normalises a block, [`title::extract_title`] handles the first line and
//! [`body::build_body`] the rest. None of the steps can fail; malformed input
//! degrades to plain text and the [`NO_URL`](brief_core::NO_URL) sentinel.

use brief_core::NewsRecord;
use serde::{Deserialize, Serialize};

pub mod body;
pub mod title;

pub const DEFAULT_DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Content of a line that separates two story blocks.
    pub delimiter: String,
    /// Label tokens stripped from the start of body lines.
    pub labels: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            labels: vec![
                "Summary".to_string(),
                "Source".to_string(),
                "Why it matters".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    config: ParserConfig,
}

impl RecordParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses every story block in `raw`, in order of appearance.
    pub fn parse(&self, raw: &str) -> Vec<NewsRecord> {
        split_blocks(raw, &self.config.delimiter)
            .iter()
            .filter_map(|block| self.parse_block(block))
            .collect()
    }

    /// Returns `None` for a block without any non-blank line.
    pub fn parse_block(&self, block: &str) -> Option<NewsRecord> {
        let lines = block_lines(block);
        let (first, rest) = lines.split_first()?;
        let (title, url) = title::extract_title(first);
        let body = body::build_body(rest, &self.config.labels);
        Some(NewsRecord::new(title, url, body))
    }
}

/// Splits `raw` on lines whose trimmed content equals `delimiter`, dropping
/// blocks that are blank.
pub fn split_blocks(raw: &str, delimiter: &str) -> Vec<String> {
    let delimiter = delimiter.trim();
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in raw.lines() {
        if line.trim() == delimiter {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    blocks.push(current);

    blocks.retain(|block| !block.trim().is_empty());
    blocks
}

/// Non-empty, trimmed lines of a block.
pub fn block_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::{Body, NO_URL};

    fn parser() -> RecordParser {
        RecordParser::default()
    }

    #[test]
    fn test_split_blocks_drops_blank_segments() {
        let raw = "---\nA\n---\n   \n---\nB\nmore\n---\n";
        let blocks = split_blocks(raw, "---");
        assert_eq!(blocks, vec!["A\n".to_string(), "B\nmore\n".to_string()]);
    }

    #[test]
    fn test_split_blocks_ignores_inline_dashes() {
        let blocks = split_blocks("A --- B\nstill A\n  ---  \nC", "---");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("A --- B"));
    }

    #[test]
    fn test_parse_linked_story() {
        let records = parser().parse("### [A](http://x)\nSummary: hi\n---");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].url, "http://x");
        assert_eq!(records[0].body, Body::Paragraph("hi".to_string()));
        assert!(records[0].tags.is_empty());
    }

    #[test]
    fn test_parse_title_without_link() {
        let records = parser().parse("### Some Title Without Link\nbody text\n---");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Some Title Without Link");
        assert_eq!(records[0].url, NO_URL);
        assert!(records[0].body.text().contains("body text"));
    }

    #[test]
    fn test_parse_preserves_block_order() {
        let raw = "### [One](https://one.example)\nfirst\n---\n### [Two](https://two.example)\nsecond\n---\n### Three\nthird";
        let titles: Vec<_> = parser().parse(raw).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_parse_bulleted_body() {
        let raw = "**[Chip news](https://chips.example/a)**\n- first point\n* second point\n---";
        let records = parser().parse(raw);
        assert_eq!(records[0].title, "Chip news");
        assert_eq!(
            records[0].body,
            Body::Items(vec!["first point".to_string(), "second point".to_string()])
        );
    }

    #[test]
    fn test_parse_title_only_block() {
        let records = parser().parse("Just a headline");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Just a headline");
        assert!(records[0].body.is_empty());
    }

    #[test]
    fn test_parse_degenerate_inputs() {
        let p = parser();
        assert!(p.parse("").is_empty());
        assert!(p.parse("---").is_empty());
        assert!(p.parse("---\n---\n\n   \n---").is_empty());
        assert!(p.parse("\n\n\t\n").is_empty());
    }

    #[test]
    fn test_parse_never_panics_on_garbage() {
        let inputs = [
            "[[[[((((",
            "### [unclosed](http://x\n---",
            "]]]))) [a](b)(c)",
            "\u{0}\u{1}\u{7f}\n---\n\u{fffd}",
            "#\n##\n###",
            "[](   )\n- \n* \n•",
            "**[**](**)**",
            "🚀 [🚀](🚀)\n---\n🔥",
        ];
        for input in inputs {
            let records = parser().parse(input);
            for record in records {
                assert!(!record.title.is_empty());
                assert!(!record.url.is_empty());
            }
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = "### [A](http://x)\nSummary: hi\n---\n1. **B**\n- x\n- y\n---\nC\nplain";
        assert_eq!(parser().parse(raw), parser().parse(raw));
    }

    #[test]
    fn test_custom_delimiter() {
        let p = RecordParser::new(ParserConfig {
            delimiter: "***".to_string(),
            ..ParserConfig::default()
        });
        let records = p.parse("A\n***\nB\n---\nstill B");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].body.text(), "--- still B");
    }
}
