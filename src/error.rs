//! Error types for GitLab API operations.

use thiserror::Error;

/// Errors that can occur during GitLab API operations.
#[derive(Debug, Error)]
pub enum GitlabError {
    /// Configuration is missing or incomplete.
    #[error("GitLab configuration required: {0}")]
    ConfigMissing(String),

    /// API request returned a non-success status.
    #[error("GitLab API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body is not valid JSON.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response body is JSON but does not have the expected shape.
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// The worker running the operation ended without an outcome.
    #[error("Task aborted: {0}")]
    TaskAborted(String),
}

/// Broad classification of a [`GitlabError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure, timeout or non-success HTTP status.
    Transport,
    /// Malformed or incomplete JSON.
    Decode,
    /// Cancelled before or during execution.
    Cancelled,
    /// Client configuration problem.
    Config,
}

impl GitlabError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ApiError { .. } | Self::HttpError(_) | Self::UrlError(_) => ErrorKind::Transport,
            Self::ParseError(_) | Self::DecodeError(_) => ErrorKind::Decode,
            Self::Cancelled | Self::TaskAborted(_) => ErrorKind::Cancelled,
            Self::ConfigMissing(_) => ErrorKind::Config,
        }
    }

    /// HTTP status code of a failed API response, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

/// Result type alias for GitLab operations.
pub type Result<T> = core::result::Result<T, GitlabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let api = GitlabError::ApiError {
            message: "404 Project Not Found".to_string(),
            status_code: Some(404),
        };
        assert_eq!(api.kind(), ErrorKind::Transport);
        assert_eq!(api.status_code(), Some(404));

        assert_eq!(GitlabError::decode("missing id").kind(), ErrorKind::Decode);
        assert_eq!(GitlabError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            GitlabError::ConfigMissing("GITLAB_TOKEN".into()).kind(),
            ErrorKind::Config
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(GitlabError::from(parse).kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_error_display() {
        let err = GitlabError::ApiError {
            message: "401 Unauthorized".to_string(),
            status_code: Some(401),
        };
        assert_eq!(err.to_string(), "GitLab API error: 401 Unauthorized");
        assert_eq!(GitlabError::Cancelled.to_string(), "Operation cancelled");
    }
}
