use crate::{PlannerError, RequestOptions};
use std::{path::PathBuf, str::FromStr, time::Duration};
use wayfarer_sdk::{
    google::{check_base_url, GeminiModel, GeminiModelOptions, DEFAULT_MODEL_ID},
    RetryPolicy,
};

/// Runtime configuration.
/// # Default Values
/// - `model_id`: `gemini-2.5-flash-preview-09-2025`
/// - `base_url`: `None` (the public Gemini endpoint)
/// - `retry`: 5 attempts, 1 second initial backoff, doubling
/// - `request`: [`RequestOptions::default`]
/// - `strict_counts`: `true`
/// - `credential_file`: `wayfarer-credentials.json`
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub model_id: String,
    pub base_url: Option<String>,
    pub retry: RetryPolicy,
    pub request: RequestOptions,
    /// Reject results that do not have exactly 20 titles per category or
    /// exactly 5 destinations.
    pub strict_counts: bool,
    /// File backing the credential store.
    pub credential_file: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: None,
            retry: RetryPolicy::default(),
            request: RequestOptions::default(),
            strict_counts: true,
            credential_file: PathBuf::from("wayfarer-credentials.json"),
        }
    }
}

impl PlannerConfig {
    /// Load `.env` if present, then read the `WAYFARER_*` variables on top of
    /// the defaults.
    pub fn from_env() -> Result<Self, PlannerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup. Unset or
    /// blank variables keep their default; unparsable ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(model_id) = var("WAYFARER_MODEL") {
            config.model_id = model_id;
        }
        if let Some(base_url) = var("WAYFARER_BASE_URL") {
            check_base_url(&base_url)
                .map_err(|error| PlannerError::Config(format!("WAYFARER_BASE_URL: {error}")))?;
            config.base_url = Some(base_url);
        }
        if let Some(max_attempts) =
            parse_var::<u32>("WAYFARER_MAX_ATTEMPTS", var("WAYFARER_MAX_ATTEMPTS"))?
        {
            if max_attempts == 0 {
                return Err(PlannerError::Config(
                    "WAYFARER_MAX_ATTEMPTS must be at least 1".to_string(),
                ));
            }
            config.retry.max_attempts = max_attempts;
        }
        if let Some(millis) = parse_var::<u64>(
            "WAYFARER_INITIAL_BACKOFF_MS",
            var("WAYFARER_INITIAL_BACKOFF_MS"),
        )? {
            config.retry.initial_delay = Duration::from_millis(millis);
        }
        if let Some(language) = var("WAYFARER_OUTPUT_LANGUAGE") {
            config.request.output_language = language;
        }
        if let Some(temperature) = parse_var::<f64>(
            "WAYFARER_TITLE_TEMPERATURE",
            var("WAYFARER_TITLE_TEMPERATURE"),
        )? {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PlannerError::Config(format!(
                    "WAYFARER_TITLE_TEMPERATURE must be between 0 and 2, got {temperature}"
                )));
            }
            config.request.title_temperature = temperature;
        }
        if let Some(strict) = var("WAYFARER_STRICT_COUNTS") {
            config.strict_counts = parse_bool("WAYFARER_STRICT_COUNTS", &strict)?;
        }
        if let Some(path) = var("WAYFARER_CREDENTIAL_FILE") {
            config.credential_file = PathBuf::from(path);
        }

        Ok(config)
    }

    #[must_use]
    pub fn gemini_model(&self) -> GeminiModel {
        GeminiModel::new(
            self.model_id.clone(),
            GeminiModelOptions {
                base_url: self.base_url.clone(),
                retry: Some(self.retry),
                ..Default::default()
            },
        )
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, PlannerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            value
                .parse()
                .map_err(|error| PlannerError::Config(format!("{key}={value}: {error}")))
        })
        .transpose()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, PlannerError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PlannerError::Config(format!(
            "{key}={value}: expected true or false"
        ))),
    }
}
