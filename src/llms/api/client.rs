use super::{
    config::ApiConfigTrait,
    error::{map_deserialization_error, map_serialization_error, ClientError, WrappedError},
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct ApiClient<C: ApiConfigTrait> {
    http_client: reqwest::Client,
    pub config: C,
    pub backoff: backoff::ExponentialBackoff,
    pub request_timeout: Duration,
}

impl<C: ApiConfigTrait> ApiClient<C> {
    /// `retry_window` bounds how long rate-limited (429) calls keep retrying.
    pub fn new(config: C, request_timeout: Duration, retry_window: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
            backoff: backoff::ExponentialBackoffBuilder::new()
                .with_max_elapsed_time(Some(retry_window))
                .build(),
            request_timeout,
        }
    }

    /// Make a POST request to {path} and deserialize the response body
    pub(crate) async fn post<I, O>(&self, path: &str, request: I) -> Result<O, ClientError>
    where
        I: Serialize + std::fmt::Debug,
        O: DeserializeOwned,
    {
        let request_maker = || async {
            let serialized_request =
                serde_json::to_string(&request).map_err(map_serialization_error)?;
            crate::trace!("Serialized request: {}", serialized_request);
            let request = self
                .http_client
                .post(self.config.url(path))
                .headers(self.config.headers())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .timeout(self.request_timeout)
                .body(serialized_request)
                .build()
                .map_err(ClientError::from_reqwest)?;
            Ok(request)
        };
        self.execute(request_maker).await
    }

    /// Execute a HTTP request and retry on rate limit
    ///
    /// request_maker serves one purpose: to be able to create request again
    /// to retry API call after getting rate limited. Every other non-2xx status is permanent.
    async fn execute_raw<M, Fut>(&self, request_maker: M) -> Result<Bytes, ClientError>
    where
        M: Fn() -> Fut,
        Fut: core::future::Future<Output = Result<reqwest::Request, ClientError>>,
    {
        let client = self.http_client.clone();

        backoff::future::retry(self.backoff.clone(), || async {
            let request = request_maker().await.map_err(backoff::Error::Permanent)?;
            let response = client
                .execute(request)
                .await
                .map_err(ClientError::from_reqwest)
                .map_err(backoff::Error::Permanent)?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(ClientError::from_reqwest)
                .map_err(backoff::Error::Permanent)?;

            if status.is_success() {
                return Ok(bytes);
            }

            // Deserialize response body from either error object or a bare status
            let error = match serde_json::from_slice::<WrappedError>(bytes.as_ref()) {
                Ok(wrapped_error) => ClientError::ApiError(wrapped_error.error),
                Err(_) => ClientError::HttpStatus {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(bytes.as_ref()).into_owned(),
                },
            };

            let quota_exhausted = matches!(
                &error,
                ClientError::ApiError(api_error)
                    if api_error.r#type.as_deref() == Some("insufficient_quota")
            );
            if status.as_u16() == 429 && !quota_exhausted {
                crate::warn!("Rate limited: {}", error);
                Err(backoff::Error::Transient {
                    err: error,
                    retry_after: None,
                })
            } else {
                Err(backoff::Error::Permanent(error))
            }
        })
        .await
    }

    async fn execute<O, M, Fut>(&self, request_maker: M) -> Result<O, ClientError>
    where
        O: DeserializeOwned,
        M: Fn() -> Fut,
        Fut: core::future::Future<Output = Result<reqwest::Request, ClientError>>,
    {
        let bytes = self.execute_raw(request_maker).await?;

        // Deserialize once into a generic Value
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| map_deserialization_error(e, &bytes))?;

        crate::trace!("Serialized response: {}", value);

        let response: O =
            serde_json::from_value(value).map_err(|e| map_deserialization_error(e, &bytes))?;

        Ok(response)
    }
}
