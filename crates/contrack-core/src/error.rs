//! Error types module
//!
//! Two error families live here: [`CoreError`] for failures inside the domain
//! layer (bad dates, bad config), and [`ServiceError`] for failures talking to
//! the remote contract store. Validation of upload candidates has its own error
//! type in `contrack-workflows` because those failures never reach the network.

/// Errors raised by the domain layer itself.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid contract date: {0}")]
    InvalidDate(String),

    #[error("unknown report status: {0}")]
    UnknownReportStatus(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from a remote contract-store call.
///
/// `Remote` carries the `detail` message from the response body when the server
/// provided one. `Timeout` is distinct from other transport failures so callers
/// can tell a slow AI-generation call from an unreachable server.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("remote error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Remote { status: u16, detail: Option<String> },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Timeout)
    }

    /// Message to surface to a user: the remote `detail` when present,
    /// otherwise a generic line naming the operation that failed.
    pub fn user_message(&self, operation: &str) -> String {
        match self {
            ServiceError::Remote {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ServiceError::Timeout => format!("{} timed out", operation),
            _ => format!("{} failed", operation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_prefers_detail() {
        let err = ServiceError::Remote {
            status: 422,
            detail: Some("File is not a contract".to_string()),
        };
        assert_eq!(err.user_message("Upload"), "File is not a contract");
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn remote_error_without_detail_names_operation() {
        let err = ServiceError::Remote {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message("Upload"), "Upload failed");
    }

    #[test]
    fn timeout_is_distinguishable() {
        let err = ServiceError::Timeout;
        assert!(err.is_timeout());
        assert_eq!(err.user_message("Report generation"), "Report generation timed out");
        assert!(!ServiceError::Transport("connection refused".into()).is_timeout());
    }
}
