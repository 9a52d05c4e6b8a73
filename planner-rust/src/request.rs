use crate::PlannerError;
use wayfarer_sdk::google::api::{Content, GenerateContentRequest, GenerationConfig, Tool};

/// The two requests the planner sends. The kind fixes the provider options:
/// titles are grounded with Google Search, recommendations use JSON mode.
/// The provider rejects JSON mode combined with a tool, so no request ever
/// carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Titles,
    Recommendations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// Options applied when building requests.
/// # Default Values
/// - `output_language`: `"Korean"`
/// - `title_temperature`: `0.9`
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Language the titles and destination names are written in.
    pub output_language: String,
    pub title_temperature: f64,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            output_language: "Korean".to_string(),
            title_temperature: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    kind: OperationKind,
    prompt_text: String,
    system_instruction: String,
    temperature: Option<f64>,
}

impl GenerationRequest {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    #[must_use]
    pub fn use_search_tool(&self) -> bool {
        matches!(self.kind, OperationKind::Titles)
    }

    #[must_use]
    pub fn response_format(&self) -> ResponseFormat {
        match self.kind {
            OperationKind::Titles => ResponseFormat::Text,
            OperationKind::Recommendations => ResponseFormat::Json,
        }
    }

    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    #[must_use]
    pub fn to_api_request(&self) -> GenerateContentRequest {
        let response_mime_type = match self.response_format() {
            ResponseFormat::Json => Some("application/json".to_string()),
            ResponseFormat::Text => None,
        };

        GenerateContentRequest {
            contents: vec![Content::text(self.prompt_text.clone())],
            system_instruction: Some(Content::text(self.system_instruction.clone())),
            tools: self
                .use_search_tool()
                .then(|| vec![Tool::google_search()]),
            generation_config: Some(GenerationConfig {
                temperature: self.temperature,
                response_mime_type,
            }),
        }
    }
}

pub fn build_title_request(
    destination: &str,
    credential: &str,
    options: &RequestOptions,
) -> Result<GenerationRequest, PlannerError> {
    let destination = require_text(destination, "Enter a destination to generate titles for")?;
    require_credential(credential)?;

    let system_instruction = format!(
        "You are a professional travel blogger. Respond with only a JSON object in exactly \
         this structure and nothing else: {{ \"info\": [\"title 1\", ..., \"title 20\"], \
         \"tips\": [\"title 1\", ..., \"title 20\"], \"hotspots\": [\"title 1\", ..., \
         \"title 20\"] }}. Write exactly 20 SEO-optimized blog post titles per category, 60 in \
         total, in {language}. \"info\" holds essential travel information, \"tips\" holds \
         expert travel tips and \"hotspots\" holds restaurants and trending places.",
        language = options.output_language
    );

    Ok(GenerationRequest {
        kind: OperationKind::Titles,
        prompt_text: format!("Suggest 60 travel blog post titles for {destination}."),
        system_instruction,
        temperature: Some(options.title_temperature),
    })
}

pub fn build_recommendation_request(
    theme: &str,
    credential: &str,
    options: &RequestOptions,
) -> Result<GenerationRequest, PlannerError> {
    let theme = require_text(theme, "Enter a theme to get destination recommendations")?;
    require_credential(credential)?;

    let system_instruction = format!(
        "You are a travel expert. Recommend exactly 5 travel destinations that match the \
         user's theme, named in {language}. Respond with only a JSON array of 5 strings, for \
         example: [\"City 1\", \"City 2\"].",
        language = options.output_language
    );

    Ok(GenerationRequest {
        kind: OperationKind::Recommendations,
        prompt_text: format!(
            "Theme: {theme}. Recommend 5 specific travel destinations that fit this theme."
        ),
        system_instruction,
        temperature: None,
    })
}

fn require_text<'a>(text: &'a str, message: &str) -> Result<&'a str, PlannerError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlannerError::Validation(message.to_string()));
    }
    Ok(text)
}

fn require_credential(credential: &str) -> Result<(), PlannerError> {
    if credential.trim().is_empty() {
        return Err(PlannerError::Validation(
            "No Gemini API key is configured. Add one in the settings before generating."
                .to_string(),
        ));
    }
    Ok(())
}
