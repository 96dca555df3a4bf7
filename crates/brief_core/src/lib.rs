pub mod error;
pub mod models;
pub mod render;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::Generator;
pub use render::Renderer;
pub use storage::RecordStore;
pub use types::*;
