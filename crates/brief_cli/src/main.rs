use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use brief_core::Result;
use brief_inference::DEFAULT_TIMEOUT;
use brief_pipeline::{handle_command, init_logging, BriefCommands, BriefingConfig, Pipeline};
use brief_render::{HtmlRenderer, Theme};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily news briefing generator", long_about = None)]
pub struct Cli {
    /// Directory holding snapshots, history and the rendered page
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[arg(long, default_value = "fs", help = "Record storage: fs (default), memory")]
    storage: String,
    /// JSON configuration file; every field is optional
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "gemini", help = "Generator to use. Available models: gemini (default), dummy")]
    model: String,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long)]
    model_name: Option<String>,
    #[arg(long)]
    base_url: Option<String>,
    /// Topic to brief on; repeat for several. Replaces the configured topics.
    #[arg(long = "topic")]
    topics: Vec<String>,
    /// Run date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    theme: Option<Theme>,
    #[arg(long, default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Option<BriefCommands>,
}

impl Cli {
    fn briefing_config(&self) -> Result<BriefingConfig> {
        let mut config = match &self.config {
            Some(path) => BriefingConfig::load(path)?,
            None => BriefingConfig::default(),
        };
        if !self.topics.is_empty() {
            config.topics = self.topics.clone();
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        Ok(config)
    }

    fn model_config(&self, config: &BriefingConfig) -> brief_inference::Config {
        brief_inference::Config {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            model_name: self.model_name.clone(),
            base_url: self.base_url.clone(),
            // Never shorter than the pipeline's per-attempt timeout.
            timeout: config.fetch_timeout().max(DEFAULT_TIMEOUT),
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli.briefing_config()?;

    let store = brief_storage::create_storage(&cli.storage, &cli.root)?;
    info!("💾 Storage initialized (using {} at {})", cli.storage, cli.root.display());

    let generator = brief_inference::create_model(cli.model_config(&config))?;
    info!("🧠 Generator initialized (using {})", generator.name());

    let renderer = Arc::new(HtmlRenderer::new(config.render_options()));
    let pipeline = Pipeline::new(config, generator, store, renderer)?;

    let date = cli.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let command = cli.command.unwrap_or(BriefCommands::Run);
    handle_command(command, &pipeline, date).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
