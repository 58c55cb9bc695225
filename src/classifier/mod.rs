pub mod builder;
mod input;
pub mod prompt;
pub mod response;

pub use input::ClassificationInput;
pub use response::{interpret_response, RemoteLabel};

use crate::{
    categories::Category,
    fallback::KeywordTable,
    llms::api::ClientError,
    logging::LoggingConfig,
};
use futures::FutureExt;
use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum RemoteClassificationError {
    #[error("ConfigurationAbsent: no remote credential configured")]
    ConfigurationAbsent,
    #[error("RemoteCallFailure: {0}")]
    Client(#[from] ClientError),
    #[error("RemoteCallFailure: timed out after {0:?}")]
    Timeout(Duration),
    #[error("RemoteCallFailure: remote classifier panicked: {0}")]
    Panicked(String),
}

/// A remote service that answers with a raw category label.
///
/// Implementations return whatever text the service produced; validation and repair
/// happen in [`TenderClassifier`].
#[async_trait::async_trait]
pub trait RemoteClassifier: Send + Sync {
    fn name(&self) -> &str;

    async fn try_classify(
        &self,
        input: &ClassificationInput,
    ) -> Result<String, RemoteClassificationError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    ConfigurationAbsent,
    RemoteCallFailure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// The remote answer was exactly one of the labels.
    RemoteExact,
    /// The remote answer contained a category's primary label.
    RemotePrefix,
    /// The remote call succeeded but matched nothing. Resolved as Miscellaneous.
    AmbiguousRemoteResponse,
    Fallback {
        reason: FallbackReason,
        keyword_matched: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub outcome: ClassificationOutcome,
}

pub struct TenderClassifier {
    remote: Option<Arc<dyn RemoteClassifier>>,
    keywords: KeywordTable,
    remote_timeout: Duration,
    _logging_config: LoggingConfig,
}

impl TenderClassifier {
    pub(crate) fn from_parts(
        remote: Option<Arc<dyn RemoteClassifier>>,
        keywords: KeywordTable,
        remote_timeout: Duration,
        logging_config: LoggingConfig,
    ) -> Self {
        Self {
            remote,
            keywords,
            remote_timeout,
            _logging_config: logging_config,
        }
    }

    /// Keyword matching only, no logger installed.
    ///
    /// An explicit opt-out: no credential is expected, so no ConfigurationAbsent
    /// warning is logged. Calls still report `FallbackReason::ConfigurationAbsent`
    /// and log at DEBUG. Use [`crate::TenderCategorizer::groq`] to warn when a key is missing.
    pub fn keyword_only() -> Self {
        Self::from_parts(
            None,
            KeywordTable::default(),
            DEFAULT_REMOTE_TIMEOUT,
            LoggingConfig::disabled(),
        )
    }

    pub fn with_remote(remote: Arc<dyn RemoteClassifier>) -> Self {
        Self {
            remote: Some(remote),
            ..Self::keyword_only()
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_remote_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Always yields a member of the closed set. Classification problems are logged, never returned.
    pub async fn classify(
        &self,
        title: &str,
        department: Option<&str>,
        item_category: Option<&str>,
    ) -> Category {
        self.classify_input(&ClassificationInput::new(title, department, item_category))
            .await
    }

    pub async fn classify_input(&self, input: &ClassificationInput) -> Category {
        self.classify_detailed(input).await.category
    }

    /// Like [`TenderClassifier::classify_input`], but also reports which path produced the category.
    pub async fn classify_detailed(&self, input: &ClassificationInput) -> Classification {
        let Some(remote) = self.remote.as_ref() else {
            crate::debug!(title = %input.title, "ConfigurationAbsent: classifying with keywords");
            return self.fallback(input, FallbackReason::ConfigurationAbsent);
        };

        match self.try_remote(remote.as_ref(), input).await {
            Ok(raw) => {
                let label = interpret_response(&raw);
                let outcome = match label {
                    RemoteLabel::Exact(_) => ClassificationOutcome::RemoteExact,
                    RemoteLabel::Prefix(_) => ClassificationOutcome::RemotePrefix,
                    RemoteLabel::Unrecognized => {
                        crate::warn!(
                            remote = remote.name(),
                            response = %raw,
                            "AmbiguousRemoteResponse: no category matched, using Miscellaneous"
                        );
                        ClassificationOutcome::AmbiguousRemoteResponse
                    }
                };
                crate::debug!(title = %input.title, category = %label.category(), ?outcome, "Classified by remote");
                Classification {
                    category: label.category(),
                    outcome,
                }
            }
            Err(RemoteClassificationError::ConfigurationAbsent) => {
                crate::warn!(
                    remote = remote.name(),
                    "ConfigurationAbsent: remote has no credential, classifying with keywords"
                );
                self.fallback(input, FallbackReason::ConfigurationAbsent)
            }
            Err(e) => {
                crate::warn!(remote = remote.name(), error = %e, "Remote classification failed, classifying with keywords");
                self.fallback(input, FallbackReason::RemoteCallFailure)
            }
        }
    }

    async fn try_remote(
        &self,
        remote: &dyn RemoteClassifier,
        input: &ClassificationInput,
    ) -> Result<String, RemoteClassificationError> {
        let call = AssertUnwindSafe(remote.try_classify(input)).catch_unwind();
        match tokio::time::timeout(self.remote_timeout, call).await {
            Err(_) => Err(RemoteClassificationError::Timeout(self.remote_timeout)),
            Ok(Err(panic)) => Err(RemoteClassificationError::Panicked(panic_message(&*panic))),
            Ok(Ok(result)) => result,
        }
    }

    fn fallback(&self, input: &ClassificationInput, reason: FallbackReason) -> Classification {
        let matched = self.keywords.categorize(input);
        if matched.is_none() {
            crate::debug!(title = %input.title, "NoFallbackMatch: using Miscellaneous");
        }
        Classification {
            category: matched.unwrap_or(Category::Miscellaneous),
            outcome: ClassificationOutcome::Fallback {
                reason,
                keyword_matched: matched.is_some(),
            },
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
