use std::fmt::Write;

use brief_core::{
    ArchiveManifest, Body, Briefing, BriefingSource, HistoryLog, NewsRecord, Renderer, Result,
    TopicBriefing,
};

use crate::theme::Theme;

const BASE_STYLE: &str = "body{max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.5;}\
    article{margin:1rem 0;}h3{margin:0 0 .25rem;}\
    .tag{font-size:.75rem;padding:.1rem .4rem;border-radius:.3rem;}\
    .stale{padding:.5rem 1rem;border-radius:.3rem;}\
    table{border-collapse:collapse;}td,th{padding:.2rem .6rem;text-align:left;}";

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const TREND_POINTS: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub theme: Theme,
    pub title: String,
    /// Directory that archive links point into, relative to the page.
    pub archive_href: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            title: "Daily Briefing".to_string(),
            archive_href: "briefings".to_string(),
        }
    }
}

/// Single-page HTML rendering of a briefing.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn write_topic(&self, out: &mut String, topic: &TopicBriefing) -> std::fmt::Result {
        writeln!(out, "<section class=\"topic\">")?;
        writeln!(out, "<h2>{}</h2>", escape(&topic.topic))?;
        if topic.records.is_empty() {
            writeln!(out, "<p class=\"empty\">No stories today.</p>")?;
        }
        for record in &topic.records {
            self.write_record(out, record)?;
        }
        writeln!(out, "</section>")
    }

    fn write_record(&self, out: &mut String, record: &NewsRecord) -> std::fmt::Result {
        writeln!(out, "<article>")?;
        let title = escape(&record.title);
        if record.has_link() {
            write!(out, "<h3><a href=\"{}\">{}</a>", escape(&record.url), title)?;
        } else {
            write!(out, "<h3>{}", title)?;
        }
        for tag in &record.tags {
            write!(out, " <span class=\"tag\">{}</span>", escape(tag))?;
        }
        writeln!(out, "</h3>")?;

        match &record.body {
            Body::Paragraph(text) if text.is_empty() => {}
            Body::Paragraph(text) => writeln!(out, "<p>{}</p>", escape(text))?,
            Body::Items(items) => {
                writeln!(out, "<ul>")?;
                for item in items {
                    writeln!(out, "<li>{}</li>", escape(item))?;
                }
                writeln!(out, "</ul>")?;
            }
        }
        writeln!(out, "</article>")
    }

    fn write_trends(&self, out: &mut String, history: &HistoryLog) -> std::fmt::Result {
        if history.is_empty() {
            return Ok(());
        }
        writeln!(out, "<section class=\"trends\">\n<h2>Trends</h2>\n<table>")?;
        writeln!(
            out,
            "<tr><th>Topic</th><th>Sentiment</th><th>Latest</th><th>Impact</th></tr>"
        )?;
        for topic in history.topics() {
            let series = history.series(topic);
            let recent = &series[series.len().saturating_sub(TREND_POINTS)..];
            let Some(&(_, sentiment, impact)) = recent.last() else {
                continue;
            };
            let spark: String = recent.iter().map(|&(_, s, _)| spark(s)).collect();
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{:+.2}</td><td>{}/10</td></tr>",
                escape(topic),
                spark,
                sentiment,
                impact
            )?;
        }
        writeln!(out, "</table>\n</section>")
    }

    fn write_archive(&self, out: &mut String, manifest: &ArchiveManifest) -> std::fmt::Result {
        if manifest.is_empty() {
            return Ok(());
        }
        writeln!(out, "<nav class=\"archive\">\n<h2>Archive</h2>\n<ul>")?;
        for entry in &manifest.entries {
            writeln!(
                out,
                "<li><a href=\"{}/{}\">{}</a></li>",
                escape(&self.options.archive_href),
                escape(&entry.id),
                entry.date.format("%Y-%m-%d")
            )?;
        }
        writeln!(out, "</ul>\n</nav>")
    }

    fn write_page(
        &self,
        out: &mut String,
        briefing: &Briefing,
        manifest: &ArchiveManifest,
        history: &HistoryLog,
    ) -> std::fmt::Result {
        let title = escape(&self.options.title);
        let date = briefing.date.format("%Y-%m-%d");

        writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{} · {}</title>", title, date)?;
        writeln!(
            out,
            "<style>{}{}</style>",
            BASE_STYLE,
            self.options.theme.stylesheet()
        )?;
        writeln!(out, "</head>\n<body class=\"theme-{}\">", self.options.theme)?;
        writeln!(out, "<header><h1>{}</h1><p class=\"date\">{}</p></header>", title, date)?;

        if let BriefingSource::Archived(from) = briefing.source {
            writeln!(
                out,
                "<p class=\"stale\">Today's update was unavailable. Showing the briefing from {}.</p>",
                from.format("%Y-%m-%d")
            )?;
        }

        writeln!(out, "<main>")?;
        for topic in &briefing.topics {
            self.write_topic(out, topic)?;
        }
        writeln!(out, "</main>")?;

        self.write_trends(out, history)?;
        self.write_archive(out, manifest)?;
        writeln!(out, "</body>\n</html>")
    }
}

impl Renderer for HtmlRenderer {
    fn render(
        &self,
        briefing: &Briefing,
        manifest: &ArchiveManifest,
        history: &HistoryLog,
    ) -> Result<String> {
        let mut out = String::with_capacity(4096);
        self.write_page(&mut out, briefing, manifest, history)
            .map_err(|e| anyhow::anyhow!("failed to render page: {}", e))?;
        Ok(out)
    }
}

fn spark(sentiment: f64) -> char {
    let scaled = ((sentiment.clamp(-1.0, 1.0) + 1.0) / 2.0 * (SPARKS.len() - 1) as f64).round();
    SPARKS[scaled as usize]
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::{ArchiveEntry, HistoryEntry};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn briefing(source: BriefingSource) -> Briefing {
        let mut linked = NewsRecord::new("A <b>", "http://x", Body::Paragraph("hi & bye".into()));
        linked.tags.insert("launch".to_string());
        let plain = NewsRecord::new(
            "🚀 Plain",
            brief_core::NO_URL,
            Body::Items(vec!["one".into(), "two".into()]),
        );
        Briefing {
            date: day(2),
            source,
            topics: vec![
                TopicBriefing {
                    topic: "Tech".to_string(),
                    records: vec![linked, plain],
                },
                TopicBriefing {
                    topic: "Quiet".to_string(),
                    records: vec![],
                },
            ],
        }
    }

    fn manifest() -> ArchiveManifest {
        ArchiveManifest {
            entries: vec![ArchiveEntry {
                date: day(1),
                id: "2024-01-01.md".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_records() {
        let html = HtmlRenderer::default()
            .render(&briefing(BriefingSource::Fresh), &manifest(), &HistoryLog::default())
            .unwrap();
        assert!(html.contains("<h3><a href=\"http://x\">A &lt;b&gt;</a> <span class=\"tag\">launch</span></h3>"));
        assert!(html.contains("<p>hi &amp; bye</p>"));
        assert!(html.contains("<h3>🚀 Plain</h3>"));
        assert!(html.contains("<li>one</li>\n<li>two</li>"));
        assert!(html.contains("No stories today."));
        assert!(html.contains("<a href=\"briefings/2024-01-01.md\">2024-01-01</a>"));
        assert!(!html.contains("class=\"stale\""));
        assert!(!html.contains("Trends"));
    }

    #[test]
    fn test_render_archived_banner() {
        let html = HtmlRenderer::default()
            .render(&briefing(BriefingSource::Archived(day(1))), &manifest(), &HistoryLog::default())
            .unwrap();
        assert!(html.contains("Showing the briefing from 2024-01-01."));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = HtmlRenderer::new(RenderOptions {
            theme: Theme::Dark,
            ..RenderOptions::default()
        });
        let b = briefing(BriefingSource::Fresh);
        let first = renderer.render(&b, &manifest(), &HistoryLog::default()).unwrap();
        let second = renderer.render(&b, &manifest(), &HistoryLog::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("theme-dark"));
        assert!(first.contains(Theme::Dark.stylesheet()));
    }

    #[test]
    fn test_render_trends() {
        let history = HistoryLog::new(vec![
            HistoryEntry::new(day(1), "Tech", -1.0, 3),
            HistoryEntry::new(day(2), "Tech", 1.0, 8),
        ]);
        let html = HtmlRenderer::default()
            .render(&briefing(BriefingSource::Fresh), &ArchiveManifest::default(), &history)
            .unwrap();
        assert!(html.contains("<tr><td>Tech</td><td>▁█</td><td>+1.00</td><td>8/10</td></tr>"));
        assert!(!html.contains("Archive"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
