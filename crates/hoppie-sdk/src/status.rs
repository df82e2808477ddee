//! Hoppie status endpoint.

use hoppie_models::Status;
use tracing::debug;

use crate::error::SdkError;

/// Parse a status document.
///
/// # Errors
///
/// [`SdkError::Serialization`] if `body` is not a valid status document.
pub fn parse_status(body: &str) -> Result<Status, SdkError> {
    Ok(serde_json::from_str(body)?)
}

/// Fetch the current status document from `status_url`.
///
/// # Errors
///
/// [`SdkError::Http`] on request failure or a non-success status code,
/// [`SdkError::Serialization`] if the body does not parse.
pub async fn fetch_status(http: &reqwest::Client, status_url: &str) -> Result<Status, SdkError> {
    debug!(url = status_url, "fetching hoppie status");
    let body = http
        .get(status_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_status(&body)
}

/// Fetch the active NOTAMs.
///
/// # Errors
///
/// As [`fetch_status`].
pub async fn fetch_notams(
    http: &reqwest::Client,
    status_url: &str,
) -> Result<Vec<String>, SdkError> {
    Ok(fetch_status(http, status_url).await?.notams)
}
