//! Per-topic sentiment and impact for the history log.

use brief_core::{HistoryEntry, NewsRecord, IMPACT_RANGE};
use chrono::NaiveDate;

use crate::classifier::Classifier;

const POSITIVE: &[&str] = &[
    "gain", "growth", "surge", "record", "win", "boost", "improv", "breakthrough", "success",
    "launch", "rais", "expand", "rally", "approv", "partner", "profit", "rise", "soar",
];

const NEGATIVE: &[&str] = &[
    "loss", "lose", "drop", "fall", "decline", "cut", "layoff", "breach", "hack", "lawsuit",
    "ban", "fine", "crash", "outage", "fail", "risk", "concern", "warn", "delay", "slump",
];

/// Lexicon score in [-1, 1]; 0 when no sentiment word appears.
pub fn record_sentiment(record: &NewsRecord) -> f64 {
    let text = format!("{} {}", record.title, record.body.text()).to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let count = |lexicon: &[&str]| {
        words
            .iter()
            .filter(|w| lexicon.iter().any(|stem| w.starts_with(stem)))
            .count() as f64
    };
    let (pos, neg) = (count(POSITIVE), count(NEGATIVE));
    if pos + neg == 0.0 {
        0.0
    } else {
        (pos - neg) / (pos + neg)
    }
}

/// Derives the history entry for one topic of one run. Records must already
/// be classified; untagged records count with the default weight.
pub fn derive_entry(
    date: NaiveDate,
    topic: &str,
    records: &[NewsRecord],
    classifier: &Classifier,
) -> HistoryEntry {
    if records.is_empty() {
        return HistoryEntry::new(date, topic, 0.0, *IMPACT_RANGE.start());
    }

    let n = records.len() as f64;
    let sentiment = records.iter().map(record_sentiment).sum::<f64>() / n;
    let weight = records
        .iter()
        .map(|r| classifier.weight(r.primary_tag().unwrap_or_default()) as f64)
        .sum::<f64>()
        / n;

    let impact = (weight.round() as u8).clamp(*IMPACT_RANGE.start(), *IMPACT_RANGE.end());
    HistoryEntry::new(date, topic, sentiment.clamp(-1.0, 1.0), impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::Body;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn tagged(title: &str, tag: &str) -> NewsRecord {
        let mut r = NewsRecord::new(title, "none", Body::default());
        r.tags.insert(tag.to_string());
        r
    }

    #[test]
    fn test_record_sentiment() {
        let neutral = NewsRecord::new("Meeting today", "none", Body::default());
        assert_eq!(record_sentiment(&neutral), 0.0);

        let good = NewsRecord::new("Shares surge on record growth", "none", Body::default());
        assert_eq!(record_sentiment(&good), 1.0);

        let mixed = NewsRecord::new("Profit rises despite outage", "none", Body::default());
        assert!((record_sentiment(&mixed) - (1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_derive_entry_empty_topic() {
        let entry = derive_entry(date(), "tech", &[], &Classifier::default());
        assert_eq!(entry, HistoryEntry::new(date(), "tech", 0.0, 1));
        assert!(entry.is_valid());
    }

    #[test]
    fn test_derive_entry_uses_tag_weights() {
        let classifier = Classifier::default();
        let records = vec![tagged("Breaking crash", "breaking"), tagged("Lab study", "research")];
        let entry = derive_entry(date(), "tech", &records, &classifier);
        // (9 + 4) / 2 = 6.5
        assert_eq!(entry.impact, 7);
        assert_eq!(entry.sentiment, -0.5);
        assert_eq!(entry.date, date());
        assert!(entry.is_valid());
    }
}
