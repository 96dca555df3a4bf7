pub mod classifier;
pub mod metrics;
pub mod parser;

pub use classifier::{Classifier, ClassifierRule};
pub use parser::{ParserConfig, RecordParser};

pub mod prelude {
    pub use super::classifier::{Classifier, ClassifierRule};
    pub use super::metrics::derive_entry;
    pub use super::parser::{ParserConfig, RecordParser};
    pub use brief_core::{Body, NewsRecord, Result, Error};
}
