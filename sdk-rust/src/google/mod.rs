pub mod api;
mod model;

pub use model::{
    check_base_url, GeminiModel, GeminiModelOptions, DEFAULT_BASE_URL, DEFAULT_MODEL_ID,
};
