use brief_core::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use crate::pipeline::Pipeline;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BriefCommands {
    /// Fetch, parse, classify and publish today's briefing
    Run,
    /// List archived snapshots, newest first
    Archive {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the recorded sentiment/impact history
    History {
        /// Only show entries for this topic
        #[arg(long)]
        topic: Option<String>,
    },
}

/// Runs one command. `Ok(false)` means the command ran but did not succeed.
pub async fn handle_command(command: BriefCommands, pipeline: &Pipeline, date: NaiveDate) -> Result<bool> {
    match command {
        BriefCommands::Run => {
            let report = pipeline.run(date).await;
            match report.recovered_from() {
                Some(from) => println!("♻️ {} ({} from archived {})", report.state, date, from),
                None => println!("{} ({})", report.state, date),
            }
            if let Some(briefing) = &report.briefing {
                for topic in &briefing.topics {
                    println!("  {}: {} stories", topic.topic, topic.records.len());
                }
            }
            if let Some(error) = &report.error {
                eprintln!("❌ {}", error);
            }
            Ok(report.is_success())
        }
        BriefCommands::Archive { limit } => {
            let manifest = pipeline.archive().list_recent(limit).await;
            if manifest.is_empty() {
                println!("No snapshots in {}", pipeline.archive().dir());
            }
            for entry in &manifest.entries {
                println!("{}  {}", entry.date, pipeline.archive().snapshot_key(entry.date));
            }
            Ok(true)
        }
        BriefCommands::History { topic } => {
            let log = pipeline.history().load().await;
            let entries: Vec<_> = log
                .entries
                .iter()
                .filter(|e| topic.as_deref().map_or(true, |t| e.topic == t))
                .collect();
            if entries.is_empty() {
                println!("No history recorded");
            }
            for entry in entries {
                println!(
                    "{}  {:<30} {:+.2}  {}/10",
                    entry.date, entry.topic, entry.sentiment, entry.impact
                );
            }
            Ok(true)
        }
    }
}
