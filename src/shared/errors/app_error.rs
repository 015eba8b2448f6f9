use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Transport-level failure class, used by the retry classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkErrorKind {
    ConnectionReset,
    ConnectionAborted,
    Timeout,
    DnsResolution,
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkErrorKind::ConnectionReset => "connection reset",
            NetworkErrorKind::ConnectionAborted => "connection aborted",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::DnsResolution => "dns resolution",
            NetworkErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        AppError::Network {
            kind,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        AppError::UpstreamStatus {
            status,
            message: message.into(),
        }
    }

    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Connection resets/aborts, timeouts, DNS failures, HTTP 429 and 5xx are
    /// transient. Every other failure (4xx, malformed payloads, cancellation)
    /// is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network { kind, .. } => !matches!(kind, NetworkErrorKind::Other),
            AppError::UpstreamStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            AppError::SerializationError(_)
            | AppError::ValidationError(_)
            | AppError::Cancelled(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::network(NetworkErrorKind::Timeout, err.to_string())
        } else if err.is_connect() {
            // reqwest folds resolver failures into connect errors; the cause chain names them
            let chain = error_chain(&err).to_lowercase();
            if chain.contains("dns") || chain.contains("lookup address") || chain.contains("resolve") {
                AppError::network(NetworkErrorKind::DnsResolution, err.to_string())
            } else {
                AppError::network(NetworkErrorKind::ConnectionReset, err.to_string())
            }
        } else if let Some(status) = err.status() {
            AppError::status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            AppError::SerializationError(err.to_string())
        } else if err.is_request() || err.is_body() {
            let chain = error_chain(&err).to_lowercase();
            if chain.contains("reset") {
                AppError::network(NetworkErrorKind::ConnectionReset, err.to_string())
            } else if chain.contains("abort") || chain.contains("broken pipe") {
                AppError::network(NetworkErrorKind::ConnectionAborted, err.to_string())
            } else {
                AppError::network(NetworkErrorKind::Other, err.to_string())
            }
        } else {
            AppError::network(NetworkErrorKind::Other, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(AppError::status(429, "slow down").is_transient());
        assert!(AppError::status(500, "boom").is_transient());
        assert!(AppError::status(503, "unavailable").is_transient());
        assert!(!AppError::status(404, "missing").is_transient());
        assert!(!AppError::status(401, "bad key").is_transient());
    }

    #[test]
    fn test_transient_network_kinds() {
        assert!(AppError::network(NetworkErrorKind::ConnectionReset, "reset").is_transient());
        assert!(AppError::network(NetworkErrorKind::ConnectionAborted, "aborted").is_transient());
        assert!(AppError::network(NetworkErrorKind::Timeout, "timed out").is_transient());
        assert!(AppError::network(NetworkErrorKind::DnsResolution, "nxdomain").is_transient());
        assert!(!AppError::network(NetworkErrorKind::Other, "tls").is_transient());
    }

    #[test]
    fn test_permanent_classes() {
        assert!(!AppError::SerializationError("bad json".into()).is_transient());
        assert!(!AppError::Cancelled("superseded".into()).is_transient());
        assert!(AppError::Cancelled("superseded".into()).is_cancelled());
        assert!(!AppError::InternalError("oops".into()).is_cancelled());
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(AppError::status(404, "missing")).unwrap();
        assert_eq!(json["type"], "UpstreamStatus");
        assert_eq!(json["details"]["status"], 404);
    }
}
