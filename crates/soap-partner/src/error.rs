//! Error types for sforce-soap-partner.

/// Result type alias for Partner API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Partner API operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an input validation error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Shorthand for a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode(message.into()))
    }

    /// Returns true if this is a SOAP-level fault from the server.
    pub fn is_fault(&self) -> bool {
        matches!(self.kind, ErrorKind::Fault { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Malformed or ambiguous input, detected before any network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A data operation was attempted without an authenticated session.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Network/timeout/connection failure from the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A well-formed SOAP fault reported by the server.
    #[error("SOAP fault: {code} - {message}")]
    Fault { code: String, message: String },

    /// A reply that cannot be parsed into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<sforce_soap_client::Error> for Error {
    fn from(err: sforce_soap_client::Error) -> Self {
        Error {
            kind: ErrorKind::Transport(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        let err = Error::new(ErrorKind::Fault {
            code: "sf:INVALID_SESSION_ID".into(),
            message: "Session expired or invalid".into(),
        });
        assert!(err.is_fault());
        assert!(err.to_string().contains("INVALID_SESSION_ID"));

        assert!(!Error::invalid_argument("bad shape").is_fault());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::new(ErrorKind::NotLoggedIn).to_string(),
            "Not logged in"
        );
        assert!(Error::decode("missing result")
            .to_string()
            .contains("Decode error"));
    }

    #[test]
    fn test_from_transport_error() {
        let transport = sforce_soap_client::Error::new(sforce_soap_client::ErrorKind::Timeout);
        let err: Error = transport.into();
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
        assert!(err.source.is_some());
    }
}
