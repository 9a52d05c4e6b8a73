use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;
use wayfarer_sdk::{
    extract_text,
    google::{
        api::{Content, GenerateContentRequest, GenerationConfig},
        GeminiModel, GeminiModelOptions, DEFAULT_MODEL_ID,
    },
    ContentGenerator,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key =
        std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY environment variable must be set");
    let model = GeminiModel::new(DEFAULT_MODEL_ID, GeminiModelOptions::default());

    let response = model
        .generate_content(
            &api_key,
            GenerateContentRequest {
                contents: vec![Content::text("Describe Lisbon in two sentences.")],
                system_instruction: Some(Content::text("You are a concise travel writer.")),
                generation_config: Some(GenerationConfig {
                    temperature: Some(0.7),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    println!("{}", extract_text(&response).unwrap());
}
