use crate::{
    google::api::{GenerateContentRequest, GenerateContentResponse},
    GenerateResult,
};

/// Something that answers `generateContent` requests.
///
/// The API key is passed per call so callers can pick up a credential that
/// changed since the generator was built.
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate_content(
        &self,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> GenerateResult<GenerateContentResponse>;
}
