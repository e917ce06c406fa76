//! # Error Types
//!
//! Errors raised while talking to the progress API. They stop at the loader
//! boundary: the loader turns them into a display string on its state and the
//! heatmap builder never sees them.

use thiserror::Error;

/// Failure modes of the progress API client.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The request could not be sent or the connection failed
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client was configured with an unusable value
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProgressError {
    /// Message shown to the user in place of the commit list.
    ///
    /// A non-success status carries the server's body text when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ProgressError::Status { body, .. } if !body.trim().is_empty() => {
                body.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProgressError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_message_prefers_body() {
        let err = ProgressError::Status {
            status: 502,
            body: "upstream rate limited\n".to_string(),
        };
        assert_eq!(err.user_message(), "upstream rate limited");
    }

    #[test]
    fn test_status_message_without_body() {
        let err = ProgressError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.user_message(), "request failed with status 500: ");
    }
}
