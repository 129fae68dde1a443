use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// The error type for awscall operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
    response: Option<Box<http::Response<Bytes>>>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request URL could not be parsed into scheme/host/path.
    MalformedUrl,

    /// The signing region could not be determined, neither from an explicit
    /// override nor from the request's host name.
    RegionResolution,

    /// The signing service could not be determined, neither from an explicit
    /// override nor from the request's host name.
    ServiceResolution,

    /// No credential could be obtained for signing.
    CredentialsUnavailable,

    /// A header value could not be represented in the encoding signing requires.
    Encoding,

    /// A connection-level failure: connection refused, DNS failure, timeout.
    Transport,

    /// The transport succeeded but the service answered with a non-2xx status.
    ///
    /// Errors of this kind carry the full response for diagnostic display.
    HttpStatus,

    /// Unexpected errors (I/O, invalid internal state, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            response: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the response that produced this error.
    pub fn with_response(mut self, response: http::Response<Bytes>) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the response carried by this error, if any.
    ///
    /// Only errors of kind [`ErrorKind::HttpStatus`] carry a response.
    pub fn response(&self) -> Option<&http::Response<Bytes>> {
        self.response.as_deref()
    }

    /// Take the response out of this error, if any.
    pub fn into_response(self) -> Option<http::Response<Bytes>> {
        self.response.map(|v| *v)
    }

    /// Check if this error means the request could not be resolved against
    /// a credential scope.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RegionResolution | ErrorKind::ServiceResolution
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a malformed URL error.
    pub fn malformed_url(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedUrl, message)
    }

    /// Create a region resolution error.
    pub fn region_resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RegionResolution, message)
    }

    /// Create a service resolution error.
    pub fn service_resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceResolution, message)
    }

    /// Create a credentials unavailable error.
    pub fn credentials_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialsUnavailable, message)
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encoding, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an HTTP status error carrying the offending response.
    pub fn http_status(message: impl Into<String>, response: http::Response<Bytes>) -> Self {
        Self::new(ErrorKind::HttpStatus, message).with_response(response)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedUrl => write!(f, "malformed url"),
            ErrorKind::RegionResolution => write!(f, "region resolution failed"),
            ErrorKind::ServiceResolution => write!(f, "service resolution failed"),
            ErrorKind::CredentialsUnavailable => write!(f, "credentials unavailable"),
            ErrorKind::Encoding => write!(f, "encoding error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::HttpStatus => write!(f, "http status error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::unexpected(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_is_preserved() {
        let err = Error::region_resolution("no region for host example.com");
        assert_eq!(err.kind(), ErrorKind::RegionResolution);
        assert!(err.is_resolution_error());
        assert!(err.response().is_none());
    }

    #[test]
    fn test_http_status_carries_response() {
        let resp = http::Response::builder()
            .status(403)
            .body(Bytes::from_static(b"AccessDenied"))
            .unwrap();

        let err = Error::http_status("request rejected with status 403", resp);
        assert_eq!(err.kind(), ErrorKind::HttpStatus);

        let resp = err.into_response().expect("response must be carried");
        assert_eq!(resp.status(), 403);
        assert_eq!(resp.body().as_ref(), b"AccessDenied");
    }

    #[test]
    fn test_error_message_display() {
        let err = Error::service_resolution("no service for host localhost");
        assert_eq!(err.to_string(), "no service for host localhost");
    }
}
