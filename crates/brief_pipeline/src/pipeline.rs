//! One briefing run as an explicit state machine.
//!
//! ```text
//! Fetching ──► Parsing ──► Classifying ──► Persisting ──► Done
//!    │            ▲                             │
//!    ▼            │                             ▼
//! Recovering ─────┘ ─────────────────────────► Failed
//! ```
//!
//! Recovering replays the most recent archived snapshot when the generator
//! produced nothing usable for any topic. Only a failed recovery or a failed
//! write ends the run in `Failed`.

use std::fmt;
use std::sync::Arc;

use brief_core::{
    Briefing, BriefingSource, Error, Generator, HistoryLog, RecordStore, Renderer, Result,
    TopicBriefing,
};
use brief_inference::prompt::briefing_query;
use brief_parser::metrics::derive_entry;
use brief_parser::{Classifier, RecordParser};
use brief_storage::history::encode;
use brief_storage::snapshot::{self, TopicText};
use brief_storage::{ArchiveIndex, HistoryStore};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::BriefingConfig;
use crate::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Fetching,
    Parsing,
    Classifying,
    Persisting,
    Recovering,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Fetching => "FETCHING",
            PipelineState::Parsing => "PARSING",
            PipelineState::Classifying => "CLASSIFYING",
            PipelineState::Persisting => "PERSISTING",
            PipelineState::Recovering => "RECOVERING",
            PipelineState::Done => "DONE",
            PipelineState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug)]
pub struct RunReport {
    pub state: PipelineState,
    /// Every state the run passed through, ending with `Done` or `Failed`.
    pub trail: Vec<PipelineState>,
    pub briefing: Option<Briefing>,
    pub page: Option<String>,
    pub history: Option<HistoryLog>,
    pub error: Option<Error>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn recovered_from(&self) -> Option<NaiveDate> {
        match self.briefing.as_ref()?.source {
            BriefingSource::Archived(date) => Some(date),
            BriefingSource::Fresh => None,
        }
    }
}

struct Batch {
    source: BriefingSource,
    texts: Vec<TopicText>,
    topics: Vec<TopicBriefing>,
}

impl Batch {
    fn new(source: BriefingSource, texts: Vec<TopicText>) -> Self {
        Self {
            source,
            texts,
            topics: Vec::new(),
        }
    }
}

struct Published {
    briefing: Briefing,
    page: String,
    history: HistoryLog,
}

enum Stage {
    Fetching,
    Recovering,
    Parsing(Batch),
    Classifying(Batch),
    Persisting(Batch),
    Done(Published),
    Failed(Error),
}

impl Stage {
    fn state(&self) -> PipelineState {
        match self {
            Stage::Fetching => PipelineState::Fetching,
            Stage::Recovering => PipelineState::Recovering,
            Stage::Parsing(_) => PipelineState::Parsing,
            Stage::Classifying(_) => PipelineState::Classifying,
            Stage::Persisting(_) => PipelineState::Persisting,
            Stage::Done(_) => PipelineState::Done,
            Stage::Failed(_) => PipelineState::Failed,
        }
    }
}

pub struct Pipeline {
    config: BriefingConfig,
    generator: Arc<dyn Generator>,
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn Renderer>,
    parser: RecordParser,
    classifier: Classifier,
    history: HistoryStore,
    archive: ArchiveIndex,
}

impl Pipeline {
    pub fn new(
        config: BriefingConfig,
        generator: Arc<dyn Generator>,
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: RecordParser::new(config.parser_config()),
            classifier: config.classifier(),
            history: HistoryStore::new(store.clone(), config.history_file.clone(), config.retention),
            archive: ArchiveIndex::new(store.clone(), config.snapshot_dir.clone()),
            config,
            generator,
            store,
            renderer,
        })
    }

    pub fn config(&self) -> &BriefingConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn archive(&self) -> &ArchiveIndex {
        &self.archive
    }

    /// Runs one briefing for `date`. Never panics and never returns early:
    /// the report always ends in `Done` or `Failed`.
    pub async fn run(&self, date: NaiveDate) -> RunReport {
        let mut trail = Vec::new();
        let mut stage = Stage::Fetching;

        loop {
            let state = stage.state();
            trail.push(state);
            debug!("➡️ {}", state);

            stage = match stage {
                Stage::Fetching => {
                    let texts = self.fetch_all().await;
                    if texts.is_empty() {
                        warn!("⚠️ {} produced nothing usable, falling back to the archive", self.generator.name());
                        Stage::Recovering
                    } else {
                        Stage::Parsing(Batch::new(BriefingSource::Fresh, texts))
                    }
                }
                Stage::Recovering => match self.recover(date).await {
                    Ok(batch) => Stage::Parsing(batch),
                    Err(e) => Stage::Failed(e),
                },
                Stage::Parsing(mut batch) => {
                    batch.topics = batch
                        .texts
                        .iter()
                        .map(|text| TopicBriefing {
                            topic: text.topic.clone(),
                            records: self.parser.parse(&text.raw),
                        })
                        .collect();
                    for topic in &batch.topics {
                        info!("📰 [{}] parsed {} stories", topic.topic, topic.records.len());
                    }
                    Stage::Classifying(batch)
                }
                Stage::Classifying(mut batch) => {
                    for record in batch.topics.iter_mut().flat_map(|t| t.records.iter_mut()) {
                        let tag = self.classifier.classify(record);
                        record.tags.insert(tag);
                    }
                    Stage::Persisting(batch)
                }
                Stage::Persisting(batch) => match self.persist(date, batch).await {
                    Ok(published) => Stage::Done(published),
                    Err(e) => Stage::Failed(e),
                },
                Stage::Done(published) => {
                    info!("✅ Briefing for {} published ({} stories)", date, published.briefing.record_count());
                    return RunReport {
                        state,
                        trail,
                        briefing: Some(published.briefing),
                        page: Some(published.page),
                        history: Some(published.history),
                        error: None,
                    };
                }
                Stage::Failed(error) => {
                    tracing::error!("❌ Briefing for {} failed: {}", date, error);
                    return RunReport {
                        state,
                        trail,
                        briefing: None,
                        page: None,
                        history: None,
                        error: Some(error),
                    };
                }
            };
        }
    }

    /// Fetches every configured topic; topics without usable text are skipped.
    async fn fetch_all(&self) -> Vec<TopicText> {
        let mut texts = Vec::new();
        for topic in self.config.topics.iter().filter(|t| !t.trim().is_empty()) {
            let logger = Logger::new().with_prefix(format!("[{}]", topic));
            logger.info(&format!("🔎 Searching with {}", self.generator.name()));
            match self.fetch_topic(topic, &logger).await {
                Ok(raw) => texts.push(TopicText::new(topic.as_str(), raw)),
                Err(e) => logger.warn(&format!("⚠️ Skipping topic: {}", e)),
            }
        }
        texts
    }

    async fn fetch_topic(&self, topic: &str, logger: &Logger) -> Result<String> {
        let query = briefing_query(topic, &self.config.delimiter);
        let attempts = self.config.fetch_attempts;
        let mut last_error = None;

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(self.config.fetch_timeout(), self.generator.fetch(&query)).await;
            let error = match outcome {
                Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
                Ok(Ok(_)) => Error::Generation("empty response".to_string()),
                Ok(Err(e)) => e,
                Err(_) => Error::Generation(format!(
                    "timed out after {}s",
                    self.config.fetch_timeout_secs
                )),
            };
            if error.is_fatal() {
                return Err(error);
            }
            if attempt < attempts {
                logger.debug(&format!("Attempt {}/{} failed ({}), retrying", attempt, attempts, error));
                tokio::time::sleep(self.config.retry_delay()).await;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| Error::Generation("no attempts made".to_string())))
    }

    /// Loads the most recent readable snapshot dated on or before `date`.
    async fn recover(&self, date: NaiveDate) -> Result<Batch> {
        let manifest = self.archive.list_until(date, self.config.recovery_depth).await;
        let default_topic = self
            .config
            .topics
            .first()
            .map(String::as_str)
            .unwrap_or(crate::config::DEFAULT_TOPIC);

        for entry in &manifest.entries {
            match self.archive.read_snapshot(entry).await {
                Ok(Some(contents)) => {
                    let texts = snapshot::split(&contents, default_topic);
                    if texts.is_empty() {
                        warn!("⚠️ Snapshot {} is empty, trying an older one", entry.id);
                        continue;
                    }
                    info!("♻️ Recovering from snapshot {}", entry.id);
                    return Ok(Batch::new(BriefingSource::Archived(entry.date), texts));
                }
                Ok(None) => warn!("⚠️ Snapshot {} disappeared", entry.id),
                Err(e) => warn!("⚠️ Could not read snapshot {}: {}", entry.id, e),
            }
        }

        Err(Error::Recovery(format!(
            "no usable snapshot on or before {} in {}",
            date,
            self.archive.dir()
        )))
    }

    /// Computes the snapshot, history and page first, then writes them. A
    /// failed write puts back whatever the earlier writes replaced.
    async fn persist(&self, date: NaiveDate, batch: Batch) -> Result<Published> {
        let briefing = Briefing {
            date,
            source: batch.source,
            topics: batch.topics,
        };

        let (snapshot, history, manifest) = match briefing.source {
            BriefingSource::Fresh => {
                let entries = briefing
                    .topics
                    .iter()
                    .map(|t| derive_entry(date, &t.topic, &t.records, &self.classifier))
                    .collect();
                let history = self.history.prepare(entries).await?;
                let manifest = self
                    .archive
                    .list_recent_with(date, self.config.archive_links)
                    .await;
                (Some(snapshot::compose(date, &batch.texts)), history, manifest)
            }
            BriefingSource::Archived(from) => {
                info!("Recovered content from {} is not recorded in the history", from);
                let manifest = self.archive.list_recent(self.config.archive_links).await;
                (None, self.history.load().await, manifest)
            }
        };
        let page = self.renderer.render(&briefing, &manifest, &history)?;

        let mut staged = StagedWrites::new(self.store.as_ref());
        if let Err(e) = self
            .publish(&mut staged, date, snapshot.as_deref(), &history, &page)
            .await
        {
            staged.rollback().await;
            return Err(e);
        }

        Ok(Published {
            briefing,
            page,
            history,
        })
    }

    async fn publish(
        &self,
        staged: &mut StagedWrites<'_>,
        date: NaiveDate,
        snapshot: Option<&str>,
        history: &HistoryLog,
        page: &str,
    ) -> Result<()> {
        if let Some(contents) = snapshot {
            let key = self.archive.snapshot_key(date);
            staged.write(&key, contents).await?;
            info!("✅ Snapshot saved to {}", key);

            staged.write(self.history.key(), &encode(history)?).await?;
            debug!("History now holds {} entries", history.len());
        }
        staged.write(&self.config.page_file, page).await?;
        info!("✅ Page saved to {}", self.config.page_file);
        Ok(())
    }
}

/// Writes that remember what each key held before, so a run that fails
/// halfway leaves the store as it found it.
struct StagedWrites<'a> {
    store: &'a dyn RecordStore,
    replaced: Vec<(String, Option<String>)>,
}

impl<'a> StagedWrites<'a> {
    fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            replaced: Vec::new(),
        }
    }

    async fn write(&mut self, key: &str, contents: &str) -> Result<()> {
        let previous = self.store.read(key).await?;
        self.store.write_atomic(key, contents).await?;
        self.replaced.push((key.to_string(), previous));
        Ok(())
    }

    async fn rollback(self) {
        for (key, previous) in self.replaced.into_iter().rev() {
            let restored = match &previous {
                Some(contents) => self.store.write_atomic(&key, contents).await,
                None => self.store.remove(&key).await,
            };
            match restored {
                Ok(()) => warn!("↩️ Restored {}", key),
                Err(e) => tracing::error!("❌ Could not restore {}: {}", key, e),
            }
        }
    }
}
