use std::fmt;
use std::time::Duration;

pub mod models;
pub mod prompt;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    /// Which generator to build: `gemini` or `dummy`.
    pub model: String,
    /// Provider-side model name, e.g. `gemini-2.0-flash`.
    pub model_name: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini".to_string(),
            model_name: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::prompt::briefing_query;
    pub use super::Config;
    pub use brief_core::{Error, Generator, Result};
}

pub use models::create_model;
