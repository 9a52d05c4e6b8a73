use super::api::{GenerateContentRequest, GenerateContentResponse};
use crate::{
    client_utils, ContentGenerator, GenerateError, GenerateResult, RetryError, RetryPolicy,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;
use tracing::debug;

const PROVIDER: &str = "google";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash-preview-09-2025";

/// Reject a base URL that requests could never be sent to: it must parse as
/// an absolute `http` or `https` URL.
pub fn check_base_url(base_url: &str) -> GenerateResult<()> {
    let url = reqwest::Url::parse(base_url).map_err(|error| {
        GenerateError::InvalidInput(format!("Invalid base URL '{base_url}': {error}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GenerateError::InvalidInput(format!(
            "Invalid base URL '{base_url}': expected an http or https URL"
        )));
    }
    Ok(())
}

pub struct GeminiModel {
    model_id: String,
    base_url: String,
    client: Client,
    retry: RetryPolicy,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GeminiModelOptions {
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
    pub retry: Option<RetryPolicy>,
}

impl GeminiModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GeminiModelOptions) -> Self {
        let GeminiModelOptions {
            base_url,
            headers,
            client,
            retry,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            base_url,
            client,
            retry: retry.unwrap_or_default(),
            headers,
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_id)
    }

    fn request_headers(&self) -> GenerateResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerateError::InvalidInput(format!("Invalid header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerateError::InvalidInput(format!("Invalid header value for '{key}': {error}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ContentGenerator for GeminiModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate_content(
        &self,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> GenerateResult<GenerateContentResponse> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::InvalidInput(
                "Gemini API key is not configured".to_string(),
            ));
        }

        crate::opentelemetry::trace_generate(PROVIDER, &self.model_id, &request, || async {
            let headers = match self.request_headers() {
                Ok(headers) => headers,
                Err(error) => return (Err(error), 0),
            };
            let url = self.endpoint();
            let query = [("key", api_key)];
            let mut attempts = 0;

            let result = self
                .retry
                .run(
                    |attempt| {
                        attempts = attempt;
                        debug!(model = %self.model_id, attempt, "sending generateContent request");
                        client_utils::send_json(
                            &self.client,
                            &url,
                            &query,
                            &request,
                            headers.clone(),
                        )
                    },
                    GenerateError::is_retryable,
                )
                .await
                .map_err(|error| match error {
                    RetryError::Terminal(error) => error,
                    RetryError::Exhausted { attempts, last } => GenerateError::RetriesExhausted {
                        attempts,
                        source: Box::new(last),
                    },
                });

            (result, attempts)
        })
        .await
    }
}
