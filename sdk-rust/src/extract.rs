//! Reading the generated text out of a `generateContent` response.

use crate::{google::api::GenerateContentResponse, GenerateError, GenerateResult};

/// Read `candidates[0].content.parts[0].text` and strip any markdown code
/// fence around it.
///
/// A missing segment anywhere on that path is a
/// [`GenerateError::MalformedResponse`]. An empty text is returned as is.
pub fn extract_text(response: &GenerateContentResponse) -> GenerateResult<String> {
    let candidate = response
        .candidates
        .as_deref()
        .and_then(<[_]>::first)
        .ok_or_else(|| malformed("No candidate in response"))?;

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| malformed("First candidate has no content"))?;

    let part = content
        .parts
        .as_deref()
        .and_then(<[_]>::first)
        .ok_or_else(|| malformed("First candidate content has no parts"))?;

    let text = part
        .text
        .as_deref()
        .ok_or_else(|| malformed("First content part has no text"))?;

    Ok(strip_code_fence(text).to_string())
}

/// Remove a leading "```" or "```json" marker, a trailing "```" marker and
/// the whitespace around them. Text without fences is only trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

fn malformed(message: &str) -> GenerateError {
    GenerateError::MalformedResponse(message.to_string())
}
