mod config;
mod context;
mod credential;
mod errors;
pub mod export;
mod parse;
mod planner;
mod request;
mod state;

pub use config::PlannerConfig;
pub use context::PlannerContext;
pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore, CREDENTIAL_KEY};
pub use errors::PlannerError;
pub use parse::{
    parse_recommendations, parse_titles, validate_recommendations, validate_titles, Category,
    CityRecommendations, TitleSet, RECOMMENDATION_COUNT, TITLES_PER_CATEGORY,
};
pub use planner::Planner;
pub use request::{
    build_recommendation_request, build_title_request, GenerationRequest, OperationKind,
    RequestOptions, ResponseFormat,
};
pub use state::{OperationSlot, RequestState, Ticket};
pub use wayfarer_sdk::ErrorKind;
