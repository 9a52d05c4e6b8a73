//! Test doubles for code built on [`ContentGenerator`](crate::ContentGenerator).

mod model;

pub use model::{MockContentGenerator, MockGenerateResult, TrackedCall};
