//! `RequestError` - the single failure type of every client operation.

use std::error::Error as StdError;
use std::fmt;

/// Boxed underlying cause.
type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error returned by authentication and endpoint calls.
///
/// Carries the HTTP status whenever a response was received. Transport
/// failures (DNS, connect, timeout) have no status. Client errors (4xx)
/// and server errors (5xx) are not distinguished.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RequestError {
    /// Human-readable message (service `Error` field or transport message).
    message: String,
    /// HTTP status code, if a response was received.
    status: Option<u16>,
    /// Underlying cause.
    source: Option<BoxError>,
}

impl RequestError {
    /// Transport-level failure before any response was received.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self {
            message: format!("request failed: {err}"),
            status: None,
            source: Some(Box::new(err)),
        }
    }

    /// Endpoint path that cannot be joined onto the base URL.
    pub(crate) fn invalid_url(err: url::ParseError, path: &str) -> Self {
        Self {
            message: format!("failed to join URL path: {path}"),
            status: None,
            source: Some(Box::new(err)),
        }
    }

    /// Failure reading the body of a received response.
    pub(crate) fn body(err: reqwest::Error, status: u16) -> Self {
        Self {
            message: format!("failed to read response body: {err}"),
            status: Some(status),
            source: Some(Box::new(err)),
        }
    }

    /// Error reported by the service through the `Error` body field.
    pub(crate) fn service(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Non-200 response without an `Error` body field.
    pub(crate) fn unexpected_status(status: u16) -> Self {
        Self {
            message: String::from("unexpected HTTP status"),
            status: Some(status),
            source: None,
        }
    }

    /// Response body that is not valid JSON.
    pub(crate) fn decode(err: serde_json::Error, status: u16) -> Self {
        Self {
            message: format!("failed to decode JSON response: {err}"),
            status: Some(status),
            source: Some(Box::new(err)),
        }
    }

    /// Response body without the expected envelope field.
    pub(crate) fn missing_field(pointer: &str, status: u16) -> Self {
        Self {
            message: format!("response is missing `{pointer}`"),
            status: Some(status),
            source: None,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "TheTVDB API error (HTTP {status}): {}", self.message),
            None => write!(f, "TheTVDB API error: {}", self.message),
        }
    }
}

impl StdError for RequestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let source: &(dyn StdError + 'static) = self.source.as_deref()?;
        Some(source)
    }
}
