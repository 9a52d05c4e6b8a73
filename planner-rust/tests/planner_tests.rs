use reqwest::StatusCode;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wayfarer_planner::{
    CredentialStore, ErrorKind, FileCredentialStore, MemoryCredentialStore, Planner,
    PlannerContext, PlannerError, RequestOptions, RequestState, TitleSet, CREDENTIAL_KEY,
};
use wayfarer_sdk::{
    sdk_test::{MockContentGenerator, MockGenerateResult},
    GenerateError,
};

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix} {i}")).collect()
}

fn title_json(prefix: &str) -> String {
    json!({
        "info": numbered(&format!("{prefix} info"), 20),
        "tips": numbered(&format!("{prefix} tip"), 20),
        "hotspots": numbered(&format!("{prefix} spot"), 20),
    })
    .to_string()
}

fn cities_json() -> String {
    json!(["Bangkok", "Hanoi", "Cebu", "Bali", "Okinawa"]).to_string()
}

struct Harness {
    planner: Arc<Planner>,
    generator: Arc<MockContentGenerator>,
    store: Arc<MemoryCredentialStore>,
}

fn harness(api_key: &str) -> Harness {
    let generator = Arc::new(MockContentGenerator::new());
    let store = Arc::new(MemoryCredentialStore::with_api_key(api_key));
    let context = PlannerContext::load(store.clone()).unwrap();
    let planner = Planner::new(context, generator.clone(), RequestOptions::default());
    Harness {
        planner: Arc::new(planner),
        generator,
        store,
    }
}

#[tokio::test(start_paused = true)]
async fn titles_move_from_idle_through_in_flight_to_succeeded() {
    let h = harness("test-key");
    h.generator.enqueue_delayed(
        MockGenerateResult::text(title_json("Osaka")),
        Duration::from_millis(100),
    );
    assert!(h.planner.titles_state().is_idle());

    let planner = h.planner.clone();
    let task = tokio::spawn(async move { planner.generate_titles("Osaka").await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(h.planner.titles_state().is_in_flight());

    let titles = task.await.unwrap().unwrap();
    assert_eq!(titles.len(), 60);
    assert_eq!(titles.info[0], "Osaka info 1");
    assert_eq!(h.planner.titles_state(), RequestState::Succeeded(titles));
    assert!(h.planner.recommendations_state().is_idle());

    let calls = h.generator.tracked_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, "test-key");
    let body = serde_json::to_value(&calls[0].request).unwrap();
    assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        json!("Suggest 60 travel blog post titles for Osaka.")
    );
}

#[tokio::test]
async fn prose_output_fails_with_parse_error() {
    let h = harness("test-key");
    h.generator.enqueue(MockGenerateResult::text(
        "Here are some wonderful title ideas for Osaka!",
    ));

    let error = h.planner.generate_titles("Osaka").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
    assert!(matches!(error, PlannerError::Parse { .. }));

    let message = h.planner.titles_state().error_message().map(str::to_string);
    assert_eq!(message, Some(error.to_string()));
}

#[tokio::test]
async fn blank_input_sends_nothing_and_keeps_state() {
    let h = harness("test-key");

    let error = h.planner.generate_titles("   ").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    let error = h.planner.recommend_cities("").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);

    assert_eq!(h.generator.call_count(), 0);
    assert!(h.planner.titles_state().is_idle());
    assert!(h.planner.recommendations_state().is_idle());
}

#[tokio::test]
async fn validation_failure_leaves_previous_result_in_place() {
    let h = harness("test-key");
    h.generator.enqueue(MockGenerateResult::text(cities_json()));
    let cities = h.planner.recommend_cities("beaches").await.unwrap();

    h.planner.recommend_cities(" ").await.unwrap_err();
    assert_eq!(
        h.planner.recommendations_state(),
        RequestState::Succeeded(cities)
    );
    assert_eq!(h.generator.call_count(), 1);
}

#[tokio::test]
async fn missing_key_is_a_validation_error() {
    let h = harness("   ");

    let error = h.planner.generate_titles("Osaka").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(error.to_string().contains("API key"));
    assert_eq!(h.generator.call_count(), 0);
    assert!(h.planner.titles_state().is_idle());
}

#[tokio::test]
async fn reads_key_on_every_call() {
    let h = harness("first-key");
    h.generator.enqueue_results([
        MockGenerateResult::text(cities_json()),
        MockGenerateResult::text(cities_json()),
    ]);

    h.planner.recommend_cities("islands").await.unwrap();
    h.store.set(CREDENTIAL_KEY, " second-key ").unwrap();
    h.planner.recommend_cities("islands").await.unwrap();

    let keys: Vec<String> = h
        .generator
        .tracked_calls()
        .into_iter()
        .map(|call| call.api_key)
        .collect();
    assert_eq!(keys, vec!["first-key", "second-key"]);
}

#[tokio::test]
async fn recommendations_accept_fenced_json() {
    let h = harness("test-key");
    h.generator
        .enqueue(MockGenerateResult::text("```json\n[\"Seoul\",\"Tokyo\"]\n```"));
    let planner = Planner::new(
        h.planner.context().clone(),
        h.generator.clone(),
        RequestOptions::default(),
    )
    .with_strict_counts(false);

    let cities = planner.recommend_cities("food").await.unwrap();
    assert_eq!(cities, vec!["Seoul".to_string(), "Tokyo".to_string()]);

    let body = serde_json::to_value(&h.generator.tracked_calls()[0].request).unwrap();
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        json!("application/json")
    );
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn strict_mode_rejects_wrong_counts() {
    let h = harness("test-key");
    h.generator.enqueue_results([
        MockGenerateResult::text(json!(["Seoul", "Tokyo"]).to_string()),
        MockGenerateResult::text(
            json!({
                "info": numbered("info", 20),
                "tips": numbered("tip", 18),
                "hotspots": numbered("spot", 20),
            })
            .to_string(),
        ),
    ]);

    let error = h.planner.recommend_cities("food").await.unwrap_err();
    assert!(matches!(
        error,
        PlannerError::UnexpectedCount {
            expected: 5,
            actual: 2,
            ..
        }
    ));
    assert_eq!(
        h.planner.recommendations_state().error_message(),
        Some("Expected 5 entries in recommendations, got 2")
    );

    let error = h.planner.generate_titles("Seoul").await.unwrap_err();
    assert_eq!(error.to_string(), "Expected 20 entries in tips, got 18");
}

#[tokio::test]
async fn operations_run_independently() {
    let h = harness("test-key");
    h.generator.enqueue_results([
        MockGenerateResult::text(title_json("Lisbon")),
        MockGenerateResult::error(GenerateError::StatusCode(
            StatusCode::SERVICE_UNAVAILABLE,
            "The model is overloaded.".to_string(),
        )),
    ]);

    let (titles, cities) = tokio::join!(
        h.planner.generate_titles("Lisbon"),
        h.planner.recommend_cities("old towns"),
    );

    assert_eq!(titles.unwrap().len(), 60);
    assert_eq!(cities.unwrap_err().kind(), ErrorKind::Network);
    assert!(h.planner.titles_state().payload().is_some());
    assert_eq!(
        h.planner.recommendations_state().error_message(),
        Some("The model is overloaded.")
    );
}

#[tokio::test(start_paused = true)]
async fn latest_trigger_owns_the_slot() {
    let h = harness("test-key");
    h.generator
        .enqueue_delayed(
            MockGenerateResult::text(title_json("slow")),
            Duration::from_millis(200),
        )
        .enqueue(MockGenerateResult::text(title_json("fast")));

    let (first, second) = tokio::join!(
        h.planner.generate_titles("Kyoto"),
        h.planner.generate_titles("Nara"),
    );

    assert_eq!(first.unwrap().info[0], "slow info 1");
    let second = second.unwrap();
    assert_eq!(second.info[0], "fast info 1");
    assert_eq!(h.planner.titles_state(), RequestState::Succeeded(second));
    assert_eq!(h.generator.call_count(), 2);
}

#[tokio::test]
async fn generates_titles_for_a_recommended_destination() {
    let h = harness("test-key");

    let error = h
        .planner
        .generate_titles_for_recommendation(0)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);

    h.generator.enqueue_results([
        MockGenerateResult::text(cities_json()),
        MockGenerateResult::text(title_json("Cebu")),
    ]);
    h.planner.recommend_cities("diving").await.unwrap();

    let titles: TitleSet = h
        .planner
        .generate_titles_for_recommendation(2)
        .await
        .unwrap();
    assert_eq!(titles.hotspots[19], "Cebu spot 20");

    let calls = h.generator.tracked_calls();
    assert_eq!(calls.len(), 2);
    let body = serde_json::to_value(&calls[1].request).unwrap();
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        json!("Suggest 60 travel blog post titles for Cebu.")
    );

    assert!(h
        .planner
        .generate_titles_for_recommendation(5)
        .await
        .is_err());
}

#[tokio::test]
async fn exhausted_retries_surface_their_message() {
    let h = harness("test-key");
    h.generator.enqueue(MockGenerateResult::error(
        GenerateError::RetriesExhausted {
            attempts: 5,
            source: Box::new(GenerateError::StatusCode(
                StatusCode::SERVICE_UNAVAILABLE,
                "HTTP 503".to_string(),
            )),
        },
    ));

    let error = h.planner.generate_titles("Busan").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(
        h.planner.titles_state(),
        RequestState::Failed(
            "Request failed repeatedly after 5 attempts; check your network connection"
                .to_string()
        )
    );
}

#[tokio::test]
async fn missing_candidates_fail_as_malformed_response() {
    let h = harness("test-key");
    h.generator
        .enqueue(MockGenerateResult::response(Default::default()));

    let error = h.planner.recommend_cities("rain").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    assert!(h
        .planner
        .recommendations_state()
        .error_message()
        .is_some());
}

#[tokio::test]
async fn file_store_key_edits_apply_to_the_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    let generator = Arc::new(MockContentGenerator::new());
    generator.enqueue_results([
        MockGenerateResult::text(cities_json()),
        MockGenerateResult::text(cities_json()),
    ]);

    let context = PlannerContext::load(Arc::new(FileCredentialStore::new(&path))).unwrap();
    let planner = Planner::new(context, generator.clone(), RequestOptions::default());

    let error = planner.recommend_cities("lakes").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(generator.call_count(), 0);

    planner.context().set_credential(" from-settings ").unwrap();
    planner.recommend_cities("lakes").await.unwrap();

    std::fs::write(&path, r#"{ "gemini_api_key": "edited-on-disk" }"#).unwrap();
    planner.recommend_cities("lakes").await.unwrap();

    let keys: Vec<String> = generator
        .tracked_calls()
        .into_iter()
        .map(|call| call.api_key)
        .collect();
    assert_eq!(keys, vec!["from-settings", "edited-on-disk"]);
}
