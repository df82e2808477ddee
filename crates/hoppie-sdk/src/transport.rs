//! Request/response transport to the Hoppie ACARS server.
//!
//! The session engine only needs one operation: send a typed packet from
//! one callsign to another and get the raw response text back. That seam
//! is the [`Transport`] trait; [`HttpTransport`] is the production
//! implementation over `GET connect.html?logon=…&from=…&to=…&type=…&packet=…`.

use async_trait::async_trait;
use hoppie_models::{AcarsEndpointCallsign, MessageType};
use reqwest::Url;
use tracing::debug;

use crate::error::SdkError;

/// One outbound exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcarsRequest {
    /// Hoppie logon code.
    pub logon: String,
    /// Sending callsign.
    pub from: AcarsEndpointCallsign,
    /// Receiving station.
    pub to: AcarsEndpointCallsign,
    /// Message type.
    pub message_type: MessageType,
    /// Packet content; empty for polls.
    pub packet: String,
}

impl AcarsRequest {
    /// The query parameters Hoppie expects, in order.
    pub fn query_pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("logon", self.logon.as_str()),
            ("from", self.from.as_str()),
            ("to", self.to.as_str()),
            ("type", self.message_type.code()),
            ("packet", self.packet.as_str()),
        ]
    }
}

/// Performs the actual exchange with the ACARS server.
///
/// Implementations return the response text on success. Server-side
/// rejections (`error {…}`) and I/O failures are errors.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send `request` and return the raw response text.
    async fn send(&self, request: AcarsRequest) -> Result<String, SdkError>;
}

/// Interpret a Hoppie response body.
///
/// - `ok…` → the full body.
/// - `error {message}` → [`SdkError::Remote`] with the bracketed message.
/// - anything else → an empty success.
///
/// # Errors
///
/// [`SdkError::Remote`] when the body starts with `error`.
///
/// ```
/// use hoppie_sdk::transport::interpret_response;
///
/// assert_eq!(interpret_response("ok {WLS2 telex {HELLO}}").unwrap(), "ok {WLS2 telex {HELLO}}");
/// assert!(interpret_response("error {illegal logon code}").is_err());
/// assert_eq!(interpret_response("").unwrap(), "");
/// ```
pub fn interpret_response(body: &str) -> Result<String, SdkError> {
    if body.starts_with("ok") {
        return Ok(body.to_string());
    }
    if let Some(rest) = body.strip_prefix("error") {
        let message = rest
            .split_once('{')
            .and_then(|(_, inner)| inner.split_once('}'))
            .map_or_else(|| rest.trim(), |(message, _)| message);
        return Err(SdkError::Remote(message.to_string()));
    }
    Ok(String::new())
}

/// [`Transport`] over the Hoppie HTTP interface.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    connect_url: Url,
}

impl HttpTransport {
    /// Create a transport against `connect_url`.
    ///
    /// # Errors
    ///
    /// [`SdkError::Validation`] if `connect_url` is not a valid URL.
    pub fn new(connect_url: &str) -> Result<Self, SdkError> {
        Self::with_client(reqwest::Client::new(), connect_url)
    }

    /// Create a transport reusing an existing HTTP client.
    ///
    /// # Errors
    ///
    /// [`SdkError::Validation`] if `connect_url` is not a valid URL.
    pub fn with_client(http: reqwest::Client, connect_url: &str) -> Result<Self, SdkError> {
        let connect_url = Url::parse(connect_url)
            .map_err(|e| SdkError::Validation(format!("invalid connect URL {connect_url}: {e}")))?;
        Ok(Self { http, connect_url })
    }

    /// Build the full request URL for `request`.
    ///
    /// # Errors
    ///
    /// [`SdkError::Validation`] if the parameters cannot be encoded.
    pub fn request_url(&self, request: &AcarsRequest) -> Result<Url, SdkError> {
        Url::parse_with_params(self.connect_url.as_str(), request.query_pairs())
            .map_err(|e| SdkError::Validation(format!("cannot build request URL: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: AcarsRequest) -> Result<String, SdkError> {
        let url = self.request_url(&request)?;
        debug!(
            from = %request.from,
            to = %request.to,
            message_type = %request.message_type,
            "sending ACARS request"
        );

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        interpret_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONNECT_URL;

    fn sample_request() -> AcarsRequest {
        AcarsRequest {
            logon: "s3cr3t".into(),
            from: "AFR1234".into(),
            to: "WLS2".into(),
            message_type: MessageType::Cpdlc,
            packet: "/data2/1//Y/REQUEST LOGON".into(),
        }
    }

    #[test]
    fn ok_response_is_returned_whole() {
        let body = "ok {WLS2 cpdlc {/data2/8/1/NE/LOGON ACCEPTED}}";
        assert_eq!(interpret_response(body).unwrap(), body);
    }

    #[test]
    fn error_response_carries_bracketed_message() {
        let err = interpret_response("error {illegal logon code}").unwrap_err();
        assert!(matches!(err, SdkError::Remote(ref m) if m == "illegal logon code"));
    }

    #[test]
    fn error_without_brackets_keeps_remaining_text() {
        let err = interpret_response("error bad request").unwrap_err();
        assert!(matches!(err, SdkError::Remote(ref m) if m == "bad request"));
    }

    #[test]
    fn unknown_prefix_is_empty_success() {
        assert_eq!(interpret_response("<html>maintenance</html>").unwrap(), "");
    }

    #[test]
    fn request_url_encodes_parameters() {
        let transport = HttpTransport::new(DEFAULT_CONNECT_URL).unwrap();
        let url = transport.request_url(&sample_request()).unwrap();
        assert_eq!(url.path(), "/acars/system/connect.html");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("logon".into(), "s3cr3t".into()),
                ("from".into(), "AFR1234".into()),
                ("to".into(), "WLS2".into()),
                ("type".into(), "cpdlc".into()),
                ("packet".into(), "/data2/1//Y/REQUEST LOGON".into()),
            ]
        );
    }

    #[test]
    fn invalid_connect_url_is_rejected() {
        let err = HttpTransport::new("not a url").unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }
}
