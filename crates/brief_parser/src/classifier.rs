use brief_core::NewsRecord;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TAG: &str = "general";
pub const DEFAULT_WEIGHT: u8 = 3;

/// Tags a record when any keyword matches. `weight` feeds the impact score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub tag: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: u8,
}

fn default_weight() -> u8 {
    DEFAULT_WEIGHT
}

impl ClassifierRule {
    pub fn new(tag: &str, keywords: &[&str], weight: u8) -> Self {
        Self {
            tag: tag.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            weight,
        }
    }
}

pub fn default_rules() -> Vec<ClassifierRule> {
    vec![
        ClassifierRule::new("breaking", &["breaking", "urgent", "just in"], 9),
        ClassifierRule::new(
            "security",
            &["breach", "vulnerab", "hack", "exploit", "ransomware", "leak"],
            8,
        ),
        ClassifierRule::new(
            "regulation",
            &["regulat", "lawsuit", "antitrust", "ban", "court", "fine", "legislat"],
            7,
        ),
        ClassifierRule::new(
            "funding",
            &["raises", "funding", "acquisition", "acquire", "ipo", "valuation", "investment"],
            6,
        ),
        ClassifierRule::new("launch", &["launch", "release", "unveil", "announce", "debut"], 5),
        ClassifierRule::new("research", &["research", "study", "paper", "benchmark", "breakthrough"], 4),
    ]
}

/// First-match keyword classifier. Pure: output depends only on the record.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassifierRule>,
    default_tag: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_TAG)
    }
}

impl Classifier {
    pub fn new(rules: Vec<ClassifierRule>, default_tag: impl Into<String>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| ClassifierRule {
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.trim().is_empty())
                    .collect(),
                ..rule
            })
            .collect();
        Self {
            rules,
            default_tag: default_tag.into(),
        }
    }

    pub fn classify(&self, record: &NewsRecord) -> String {
        let haystack = normalize(&format!("{} {}", record.title, record.body.text()));
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|rule| rule.tag.clone())
            .unwrap_or_else(|| self.default_tag.clone())
    }

    /// Weight of `tag`, or the default weight for unknown tags.
    pub fn weight(&self, tag: &str) -> u8 {
        self.rules
            .iter()
            .find(|rule| rule.tag == tag)
            .map(|rule| rule.weight)
            .unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Lowercased words separated by single spaces, with a leading space so that
/// `contains(" key")` only matches at word starts.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push(' ');
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::Body;

    fn record(title: &str, body: &str) -> NewsRecord {
        NewsRecord::new(title, "none", Body::Paragraph(body.to_string()))
    }

    #[test]
    fn test_classify_matches_case_insensitively() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&record("Startup RAISES $10M", "")), "funding");
        assert_eq!(classifier.classify(&record("Quiet day", "New RESEARCH paper")), "research");
    }

    #[test]
    fn test_classify_first_rule_wins() {
        let classifier = Classifier::default();
        let r = record("Breaking: ransomware hits lab", "funding round announced");
        assert_eq!(classifier.classify(&r), "breaking");
    }

    #[test]
    fn test_classify_matches_word_prefixes_only() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&record("Urban planning", "")), DEFAULT_TAG);
        assert_eq!(classifier.classify(&record("Country banned the app", "")), "regulation");
    }

    #[test]
    fn test_classify_phrase_keyword() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(&record("Just in: chips", "")), "breaking");
        assert_eq!(classifier.classify(&record("Justin spoke", "in Paris")), DEFAULT_TAG);
    }

    #[test]
    fn test_classify_reads_list_bodies() {
        let classifier = Classifier::default();
        let r = NewsRecord::new(
            "Weekly roundup",
            "none",
            Body::Items(vec!["nothing".into(), "a new exploit".into()]),
        );
        assert_eq!(classifier.classify(&r), "security");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = Classifier::default();
        let r = record("Model release", "benchmarks and funding");
        assert_eq!(classifier.classify(&r), classifier.classify(&r));
        assert_eq!(classifier.classify(&r), "funding");
    }

    #[test]
    fn test_custom_rules_and_default() {
        let classifier = Classifier::new(vec![ClassifierRule::new("ai", &["AI", "LLM"], 6)], "misc");
        assert_eq!(classifier.classify(&record("New LLM", "")), "ai");
        assert_eq!(classifier.classify(&record("Trains", "")), "misc");
        assert_eq!(classifier.weight("ai"), 6);
        assert_eq!(classifier.weight("misc"), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_rules_deserialize_with_default_weight() {
        let rule: ClassifierRule = serde_json::from_str(r#"{"tag":"x","keywords":["y"]}"#).unwrap();
        assert_eq!(rule.weight, DEFAULT_WEIGHT);
    }
}
