use crate::{
    parse::{parse_recommendations, parse_titles, validate_recommendations, validate_titles},
    request::{build_recommendation_request, build_title_request},
    state::OperationSlot,
    CityRecommendations, GenerationRequest, PlannerConfig, PlannerContext, PlannerError,
    RequestOptions, RequestState, TitleSet,
};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use wayfarer_sdk::{extract_text, ContentGenerator};

/// Runs title generation and destination recommendation against a
/// [`ContentGenerator`] and keeps the state of each in its own slot.
///
/// Each operation goes build → execute (with retries) → extract → parse.
/// The two operations are independent and may be in flight at the same
/// time. Triggering an operation again while it is in flight starts a new
/// request; whichever trigger came last owns the slot and older completions
/// are discarded.
pub struct Planner {
    context: PlannerContext,
    generator: Arc<dyn ContentGenerator>,
    options: RequestOptions,
    strict_counts: bool,
    titles: OperationSlot<TitleSet>,
    recommendations: OperationSlot<CityRecommendations>,
}

impl Planner {
    #[must_use]
    pub fn new(
        context: PlannerContext,
        generator: Arc<dyn ContentGenerator>,
        options: RequestOptions,
    ) -> Self {
        Self {
            context,
            generator,
            options,
            strict_counts: true,
            titles: OperationSlot::new("titles"),
            recommendations: OperationSlot::new("recommendations"),
        }
    }

    /// Planner talking to Gemini with the model, endpoint, retry policy and
    /// request options from `config`.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, context: PlannerContext) -> Self {
        Self::new(
            context,
            Arc::new(config.gemini_model()),
            config.request.clone(),
        )
        .with_strict_counts(config.strict_counts)
    }

    /// Whether results must hold exactly 20 titles per category and exactly
    /// 5 destinations. On by default.
    #[must_use]
    pub fn with_strict_counts(mut self, strict_counts: bool) -> Self {
        self.strict_counts = strict_counts;
        self
    }

    #[must_use]
    pub fn context(&self) -> &PlannerContext {
        &self.context
    }

    #[must_use]
    pub fn titles_state(&self) -> RequestState<TitleSet> {
        self.titles.state()
    }

    #[must_use]
    pub fn recommendations_state(&self) -> RequestState<CityRecommendations> {
        self.recommendations.state()
    }

    /// Generate 60 blog titles for `destination`.
    ///
    /// Blank input or a missing API key fails with
    /// [`PlannerError::Validation`] without sending anything or touching
    /// the titles state.
    pub async fn generate_titles(&self, destination: &str) -> Result<TitleSet, PlannerError> {
        let credential = self.context.credential()?;
        let request = build_title_request(destination, &credential, &self.options)?;
        let strict_counts = self.strict_counts;

        self.run(&self.titles, &credential, &request, |text| {
            let titles = parse_titles(text)?;
            if strict_counts {
                validate_titles(&titles)?;
            }
            Ok(titles)
        })
        .await
    }

    /// Recommend 5 destinations matching `theme`.
    pub async fn recommend_cities(&self, theme: &str) -> Result<CityRecommendations, PlannerError> {
        let credential = self.context.credential()?;
        let request = build_recommendation_request(theme, &credential, &self.options)?;
        let strict_counts = self.strict_counts;

        self.run(&self.recommendations, &credential, &request, |text| {
            let cities = parse_recommendations(text)?;
            if strict_counts {
                validate_recommendations(&cities)?;
            }
            Ok(cities)
        })
        .await
    }

    /// Generate titles for the recommended destination at `index` of the
    /// current recommendations.
    pub async fn generate_titles_for_recommendation(
        &self,
        index: usize,
    ) -> Result<TitleSet, PlannerError> {
        let destination = self
            .recommendations
            .state()
            .payload()
            .and_then(|cities| cities.get(index).cloned())
            .ok_or_else(|| {
                PlannerError::Validation(format!("No recommended destination at position {index}"))
            })?;

        self.generate_titles(&destination).await
    }

    async fn run<T, P>(
        &self,
        slot: &OperationSlot<T>,
        credential: &str,
        request: &GenerationRequest,
        parse: P,
    ) -> Result<T, PlannerError>
    where
        T: Clone,
        P: FnOnce(&str) -> Result<T, PlannerError>,
    {
        let ticket = slot.begin();
        let span = info_span!(
            "wayfarer.operation",
            kind = ?request.kind(),
            generation = ticket.generation(),
        );

        let result = async {
            let response = self
                .generator
                .generate_content(credential, request.to_api_request())
                .await?;
            let text = extract_text(&response)?;
            parse(&text)
        }
        .instrument(span.clone())
        .await;

        let _entered = span.enter();
        match &result {
            Ok(_) => info!("operation succeeded"),
            Err(error) => warn!(%error, kind = ?error.kind(), "operation failed"),
        }

        let outcome = match &result {
            Ok(payload) => Ok(payload.clone()),
            Err(error) => Err(error.to_string()),
        };
        if !slot.commit(ticket, outcome) {
            info!("a newer request owns the slot; result not published");
        }

        result
    }
}
