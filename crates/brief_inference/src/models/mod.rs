use std::sync::Arc;

use brief_core::{Error, Generator, Result};

use crate::Config;

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Builds the generator named by `config.model`.
pub fn create_model(config: Config) -> Result<Arc<dyn Generator>> {
    match config.model.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiModel::new(&config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "unknown model `{}`. Available models: gemini (default), dummy",
            other
        ))),
    }
}
