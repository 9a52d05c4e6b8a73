use std::sync::Arc;
use wayfarer_planner::{FileCredentialStore, PlannerConfig, PlannerContext};

fn main() {
    let config = PlannerConfig::from_env().unwrap();
    let api_key = std::env::args()
        .nth(1)
        .expect("usage: set-api-key <GEMINI_API_KEY>");

    let store = FileCredentialStore::new(config.credential_file.clone());
    let context = PlannerContext::load(Arc::new(store)).unwrap();
    context.set_credential(&api_key).unwrap();

    println!(
        "Saved API key to {} (configured: {})",
        config.credential_file.display(),
        context.has_credential().unwrap()
    );
}
