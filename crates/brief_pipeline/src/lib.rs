pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;

pub use cli::{handle_command, BriefCommands};
pub use config::BriefingConfig;
pub use logging::{init_logging, Logger};
pub use pipeline::{Pipeline, PipelineState, RunReport};

pub mod prelude {
    pub use super::config::BriefingConfig;
    pub use super::pipeline::{Pipeline, PipelineState, RunReport};
    pub use brief_core::{Briefing, Error, NewsRecord, Result};
}
