use crate::{google::api::ErrorResponse, GenerateError, GenerateResult};
use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// Create a JSON request, parse the response.
/// Returns an error on any non-success status code, carrying the provider's
/// error message when the body has one.
///
/// `query` is percent-encoded onto `url`. The URL is stripped from transport
/// errors since the query carries the API key.
pub async fn send_json<T: Serialize + ?Sized, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    data: &T,
    headers: HeaderMap,
) -> GenerateResult<R> {
    let response = client
        .post(url)
        .query(query)
        .headers(headers)
        .json(data)
        .send()
        .await
        .map_err(|error| GenerateError::Transport(error.without_url()))?;

    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    let body = response
        .text()
        .await
        .map_err(|error| GenerateError::Transport(error.without_url()))?;

    serde_json::from_str(&body).map_err(|error| {
        GenerateError::MalformedResponse(format!("Failed to decode response body: {error}"))
    })
}

async fn status_error(response: Response) -> GenerateError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    GenerateError::StatusCode(status, error_message(status, &body))
}

/// The upstream `error.message`, or `HTTP <status>` when the body is not a
/// decodable error envelope.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let envelope: ErrorResponse = serde_json::from_str(body).unwrap_or_default();

    envelope
        .error
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
