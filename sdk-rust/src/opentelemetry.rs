use crate::{
    google::api::{GenerateContentRequest, GenerateContentResponse},
    GenerateResult,
};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct GenerateSpan {
    span: Span,
    start_time: Instant,
    attempts: Option<u32>,
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
    temperature: Option<f64>,
}

impl GenerateSpan {
    pub fn new(provider: &str, model_id: &str, request: &GenerateContentRequest) -> Self {
        let span = info_span!("wayfarer.generate");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());

        let config = request.generation_config.as_ref();
        span.set_attribute(
            "wayfarer.request.search_tool",
            request.tools.as_ref().is_some_and(|tools| !tools.is_empty()),
        );
        if let Some(mime_type) = config.and_then(|c| c.response_mime_type.clone()) {
            span.set_attribute("wayfarer.request.response_mime_type", mime_type);
        }

        Self {
            span,
            start_time: Instant::now(),
            attempts: None,
            input_tokens: None,
            output_tokens: None,
            temperature: config.and_then(|c| c.temperature),
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_attempts(&mut self, attempts: u32) {
        self.attempts = Some(attempts);
    }

    pub fn on_response(&mut self, response: &GenerateContentResponse) {
        if let Some(usage) = &response.usage_metadata {
            self.input_tokens = usage.prompt_token_count;
            self.output_tokens = usage.candidates_token_count;
        }
        if let Some(model_version) = &response.model_version {
            self.span.set_attribute("gen_ai.response.model", model_version.clone());
        }
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span.set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(input_tokens) = self.input_tokens {
            self.span.set_attribute("gen_ai.usage.input_tokens", i64::from(input_tokens));
        }
        if let Some(output_tokens) = self.output_tokens {
            self.span.set_attribute("gen_ai.usage.output_tokens", i64::from(output_tokens));
        }
        if let Some(temperature) = self.temperature {
            self.span.set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(attempts) = self.attempts {
            self.span.set_attribute("wayfarer.attempts", i64::from(attempts));
        }
        self.span.set_attribute(
            "wayfarer.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for GenerateSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run `f` inside a `wayfarer.generate` span. `f` resolves to the result and
/// the number of attempts it took.
pub async fn trace_generate<F, Fut>(
    provider: &str,
    model_id: &str,
    request: &GenerateContentRequest,
    f: F,
) -> GenerateResult<GenerateContentResponse>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = (GenerateResult<GenerateContentResponse>, u32)>,
{
    let mut span = GenerateSpan::new(provider, model_id, request);
    let (result, attempts) = span.instrument_future(f()).await;
    span.on_attempts(attempts);

    match &result {
        Ok(response) => span.on_response(response),
        Err(error) => span.on_error(error),
    }

    result
}
