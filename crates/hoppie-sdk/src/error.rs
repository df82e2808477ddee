//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. Codec failures are wrapped from
//! [`hoppie_models::ModelError`]; everything else is a session, state or
//! transport failure.

use std::time::Duration;

use hoppie_models::ModelError;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// A wire message failed to decode.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An argument was empty or out of its domain, or a response had an
    /// unexpected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation is not valid in the current connection state.
    #[error("state error: {0}")]
    State(String),

    /// The transport could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP request failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Hoppie server answered with `error {…}`.
    #[error("hoppie returned an error: {0}")]
    Remote(String),

    /// JSON deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The logon was not accepted within the configured window.
    #[error("CPDLC logon timed out after {0:?}")]
    Timeout(Duration),

    /// The session was cancelled.
    #[error("session cancelled")]
    Cancelled,
}

impl SdkError {
    /// Returns `true` for failures of the underlying exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_) | Self::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_display_transparently() {
        let err: SdkError = ModelError::InvalidMin { value: "x".into() }.into();
        assert_eq!(err.to_string(), "MIN \"x\" is not a valid identification number");
        assert!(!err.is_transport());
    }

    #[test]
    fn remote_is_a_transport_error() {
        let err = SdkError::Remote("illegal logon code".into());
        assert_eq!(err.to_string(), "hoppie returned an error: illegal logon code");
        assert!(err.is_transport());
    }

    #[test]
    fn timeout_display() {
        let err = SdkError::Timeout(Duration::from_secs(90));
        assert_eq!(err.to_string(), "CPDLC logon timed out after 90s");
    }
}
