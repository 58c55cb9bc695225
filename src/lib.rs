#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Error, Result};
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

pub mod batch;
pub mod categories;
pub mod classifier;
pub mod fallback;
pub mod jobs;
pub mod llms;
pub mod logging;
pub mod prelude;
pub mod store;

pub use batch::{BatchConfig, BatchItem, TenderId};
pub use categories::{Category, UnknownCategory};
pub use classifier::{
    builder::TenderClassifierBuilder,
    Classification,
    ClassificationInput,
    ClassificationOutcome,
    FallbackReason,
    RemoteClassificationError,
    RemoteClassifier,
    TenderClassifier,
};
pub use fallback::KeywordTable;

pub struct TenderCategorizer {}

impl TenderCategorizer {
    /// Classifier backed by the Groq chat-completion API, falling back to keywords when no key is found.
    pub fn groq() -> TenderClassifierBuilder {
        TenderClassifierBuilder::default()
    }

    /// Classifier that never leaves the process. An opt-out, so no ConfigurationAbsent warning.
    pub fn keyword_only() -> TenderClassifierBuilder {
        TenderClassifierBuilder::default().remote_enabled(false)
    }
}
