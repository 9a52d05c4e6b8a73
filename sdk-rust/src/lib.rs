mod client_utils;
mod content_generator;
mod errors;
pub mod extract;
pub mod google;
mod opentelemetry;
pub mod retry;
pub mod sdk_test;

pub use content_generator::ContentGenerator;
pub use errors::*;
pub use extract::{extract_text, strip_code_fence};
pub use retry::{RetryError, RetryPolicy};
