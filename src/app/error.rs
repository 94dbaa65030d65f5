use thiserror::Error;

use crate::domain::PostId;

/// Classified failure of a single API Gateway call.
///
/// The gateway never surfaces anything outside this set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Message shown on the screen or post that issued the request.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Unauthorized access. Please log in again.".to_string(),
            ApiError::InvalidCredentials => "Invalid username or password".to_string(),
            ApiError::Validation(reason) => reason.clone(),
            ApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Server { status, message } if message.is_empty() => {
                format!("The server returned an error ({})", status)
            }
            ApiError::Server { message, .. } => message.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[derive(Error, Debug)]
pub enum MurmurError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MurmurError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message_asks_for_login() {
        assert_eq!(
            ApiError::Unauthorized.user_message(),
            "Unauthorized access. Please log in again."
        );
    }

    #[test]
    fn test_server_message_prefers_body_text() {
        let err = ApiError::Server {
            status: 400,
            message: "You cannot follow yourself.".into(),
        };
        assert_eq!(err.user_message(), "You cannot follow yourself.");

        let bare = ApiError::Server {
            status: 502,
            message: String::new(),
        };
        assert_eq!(bare.user_message(), "The server returned an error (502)");
    }

    #[test]
    fn test_api_error_converts_transparently() {
        let err: MurmurError = ApiError::Validation("Comment cannot be empty".into()).into();
        assert_eq!(err.to_string(), "Validation failed: Comment cannot be empty");
    }
}
