pub mod completion;

use super::{ApiClient, ApiConfig, ApiConfigTrait, ClientError, LlmApiConfigTrait};
use crate::classifier::{
    prompt::{build_prompt, SYSTEM_PROMPT},
    ClassificationInput,
    RemoteClassificationError,
    RemoteClassifier,
};
use completion::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Default v1 API base url (OpenAI-compatible)
pub const GROQ_API_HOST: &str = "api.groq.com/openai/v1";
pub const GROQ_COMPLETION_PATH: &str = "/chat/completions";
pub const GROQ_API_KEY_ENV_VAR: &str = "GROQ_API_KEY";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

pub struct GroqBackend {
    pub(crate) client: ApiClient<GroqConfig>,
}

impl GroqBackend {
    /// Fails when no API key can be found, so callers can route to the keyword fallback.
    pub fn new(mut config: GroqConfig) -> crate::Result<Self> {
        config.api_config.api_key = Some(config.api_config.load_api_key()?);
        let (request_timeout, retry_window) = (config.request_timeout, config.retry_window);
        Ok(Self {
            client: ApiClient::new(config, request_timeout, retry_window),
        })
    }

    pub fn config(&self) -> &GroqConfig {
        &self.client.config
    }

    pub fn classification_request(&self, input: &ClassificationInput) -> ChatCompletionRequest {
        let config = &self.client.config;
        ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(input)),
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// First choice's text, trimmed.
    pub async fn completion(&self, request: ChatCompletionRequest) -> Result<String, ClientError> {
        let response: ChatCompletionResponse = self
            .client
            .post(&self.client.config.completion_path, request)
            .await?;
        Ok(response.first_content())
    }
}

#[async_trait::async_trait]
impl RemoteClassifier for GroqBackend {
    fn name(&self) -> &str {
        "groq"
    }

    async fn try_classify(
        &self,
        input: &ClassificationInput,
    ) -> Result<String, RemoteClassificationError> {
        if self.client.config.api_key().is_none() {
            return Err(RemoteClassificationError::ConfigurationAbsent);
        }
        let request = self.classification_request(input);
        Ok(self.completion(request).await?)
    }
}

#[derive(Clone, Debug)]
pub struct GroqConfig {
    pub api_config: ApiConfig,
    pub completion_path: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub retry_window: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_config: ApiConfig {
                host: GROQ_API_HOST.to_string(),
                port: None,
                api_key: None,
                api_key_env_var: GROQ_API_KEY_ENV_VAR.to_string(),
            },
            completion_path: GROQ_COMPLETION_PATH.to_string(),
            model: GROQ_DEFAULT_MODEL.to_string(),
            max_tokens: 50,
            temperature: 0.1,
            request_timeout: Duration::from_secs(10),
            retry_window: Duration::from_secs(10),
        }
    }
}

impl GroqConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_completion_path<S: Into<String>>(mut self, path: S) -> Self {
        self.completion_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl LlmApiConfigTrait for GroqConfig {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.api_config
    }
}

impl ApiConfigTrait for GroqConfig {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = self.api_key() {
            if let Ok(header_value) =
                HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            {
                headers.insert(AUTHORIZATION, header_value);
            } else {
                crate::error!("Failed to create header value from authorization value");
            }
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_config.base_url(), path)
    }

    fn api_key(&self) -> &Option<Secret<String>> {
        &self.api_config.api_key
    }
}
