use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wayfarer_planner::{FileCredentialStore, Planner, PlannerConfig, PlannerContext};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

pub fn get_planner() -> Planner {
    let config = PlannerConfig::from_env().expect("invalid WAYFARER_* configuration");
    let store = FileCredentialStore::new(config.credential_file.clone());
    let context = PlannerContext::load(Arc::new(store)).expect("failed to open credential store");
    Planner::from_config(&config, context)
}
