use std::{collections::VecDeque, sync::Mutex, time::Duration};

use crate::{
    google::api::{Candidate, Content, GenerateContentRequest, GenerateContentResponse},
    ContentGenerator, GenerateError, GenerateResult,
};

/// Result for a mocked `generate_content` call.
/// It can either be a full response or an error to return.
pub enum MockGenerateResult {
    Response(GenerateContentResponse),
    Error(GenerateError),
}

impl MockGenerateResult {
    /// Construct a result that yields the provided response.
    pub fn response(response: GenerateContentResponse) -> Self {
        Self::Response(response)
    }

    /// Construct a result whose first candidate holds `text` as its only
    /// part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Response(GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    ..Content::text(text)
                }),
                finish_reason: Some("STOP".to_string()),
                index: Some(0),
            }]),
            ..Default::default()
        })
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: GenerateError) -> Self {
        Self::Error(error)
    }
}

impl From<GenerateContentResponse> for MockGenerateResult {
    fn from(response: GenerateContentResponse) -> Self {
        Self::response(response)
    }
}

impl From<GenerateError> for MockGenerateResult {
    fn from(error: GenerateError) -> Self {
        Self::error(error)
    }
}

/// A call received by [`MockContentGenerator`].
#[derive(Debug, Clone)]
pub struct TrackedCall {
    pub api_key: String,
    pub request: GenerateContentRequest,
}

#[derive(Default)]
struct MockContentGeneratorState {
    mocked_results: VecDeque<(MockGenerateResult, Option<Duration>)>,
    tracked_calls: Vec<TrackedCall>,
}

impl MockContentGeneratorState {
    fn enqueue_result(&mut self, result: MockGenerateResult, delay: Option<Duration>) {
        self.mocked_results.push_back((result, delay));
    }

    fn reset(&mut self) {
        self.tracked_calls.clear();
    }

    fn restore(&mut self) {
        self.mocked_results.clear();
        self.reset();
    }
}

/// A mock generator for testing that tracks calls and yields predefined
/// results in order.
pub struct MockContentGenerator {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockContentGeneratorState>,
}

impl Default for MockContentGenerator {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-model".to_string(),
            state: Mutex::new(MockContentGeneratorState::default()),
        }
    }
}

impl MockContentGenerator {
    /// Construct a new mock generator instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the model identifier returned by the mock.
    pub fn set_model_id<S: Into<String>>(&mut self, model_id: S) {
        self.model_id = model_id.into();
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        for result in results {
            state.enqueue_result(result, None);
        }
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        self.enqueue_results(std::iter::once(result.into()))
    }

    /// Enqueue a result that resolves only after `delay`, to control the
    /// completion order of concurrent calls.
    pub fn enqueue_delayed<R>(&self, result: R, delay: Duration) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.enqueue_result(result.into(), Some(delay));
        drop(state);
        self
    }

    /// Retrieve the calls received so far.
    pub fn tracked_calls(&self) -> Vec<TrackedCall> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_calls.clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_calls.len()
    }

    /// Reset tracked calls without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked calls and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl ContentGenerator for MockContentGenerator {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate_content(
        &self,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> GenerateResult<GenerateContentResponse> {
        let (result, delay) = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.tracked_calls.push(TrackedCall {
                api_key: api_key.to_string(),
                request,
            });

            state.mocked_results.pop_front().ok_or_else(|| {
                GenerateError::InvalidInput("no mocked generate results available".into())
            })?
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match result {
            MockGenerateResult::Response(response) => Ok(response),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
