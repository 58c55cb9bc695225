use super::{RemoteClassifier, TenderClassifier, DEFAULT_REMOTE_TIMEOUT};
use crate::{
    fallback::KeywordTable,
    llms::api::{
        groq::{GroqBackend, GroqConfig},
        ApiConfig,
        LlmApiConfigTrait,
    },
    logging::{LoggingConfig, LoggingConfigTrait},
};
use std::{sync::Arc, time::Duration};

pub struct TenderClassifierBuilder {
    pub groq_config: GroqConfig,
    pub logging_config: LoggingConfig,
    pub keywords: KeywordTable,
    pub remote_enabled: bool,
    pub remote_timeout: Duration,
}

impl Default for TenderClassifierBuilder {
    fn default() -> Self {
        Self {
            groq_config: Default::default(),
            logging_config: Default::default(),
            keywords: Default::default(),
            remote_enabled: true,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl TenderClassifierBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// When false, the classifier never calls out and uses keywords only.
    pub fn remote_enabled(mut self, remote_enabled: bool) -> Self {
        self.remote_enabled = remote_enabled;
        self
    }

    /// Deadline for one remote call. Expiry counts as a remote failure.
    pub fn remote_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self.groq_config.request_timeout = remote_timeout;
        self
    }

    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.groq_config.model = model.into();
        self
    }

    pub fn keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Loads the logger and the API key. A missing key is not an error: the
    /// classifier is built keyword-only and a ConfigurationAbsent warning is logged.
    pub fn init(mut self) -> crate::Result<TenderClassifier> {
        self.logging_config.load_logger()?;

        let remote: Option<Arc<dyn RemoteClassifier>> = if !self.remote_enabled {
            crate::info!("Remote classification disabled, using keyword matching only");
            None
        } else {
            let env_var = self.groq_config.api_config.api_key_env_var.clone();
            match GroqBackend::new(self.groq_config) {
                Ok(backend) => {
                    crate::info!(model = %backend.config().model, "Remote classification enabled");
                    Some(Arc::new(backend) as Arc<dyn RemoteClassifier>)
                }
                Err(e) => {
                    crate::warn!(
                        error = %e,
                        "ConfigurationAbsent: {env_var} not set, using fallback categorization"
                    );
                    None
                }
            }
        };

        Ok(TenderClassifier::from_parts(
            remote,
            self.keywords,
            self.remote_timeout,
            self.logging_config,
        ))
    }
}

impl LlmApiConfigTrait for TenderClassifierBuilder {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.groq_config.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.groq_config.api_config
    }
}

impl LoggingConfigTrait for TenderClassifierBuilder {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig {
        &mut self.logging_config
    }
}
