use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("You must be logged in to do that")]
    AuthRequired,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Build the error for a non-success response. `message` is whatever
    /// could be extracted from the body; `None` falls back to a generic text.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(
                message.unwrap_or_else(|| "The server rejected the request".to_string()),
            ),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Forbidden(
                message.unwrap_or_else(|| "You are not allowed to do that".to_string()),
            ),
            StatusCode::NOT_FOUND => ClientError::NotFound(
                message.unwrap_or_else(|| "The requested item no longer exists".to_string()),
            ),
            _ => ClientError::Server {
                status,
                message: message.unwrap_or_else(|| "Something went wrong".to_string()),
            },
        }
    }

    /// Text suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::AuthRequired => "You must be logged in to do that.".to_string(),
            ClientError::AuthFailed(msg)
            | ClientError::Validation(msg)
            | ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::NotReady(msg) => msg.clone(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Network(e) => {
                tracing::warn!("Network error: {}", e);
                "Could not reach the server. Please try again.".to_string()
            }
            ClientError::Url(e) => {
                tracing::warn!("URL error: {}", e);
                "The configured API address is invalid.".to_string()
            }
            ClientError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Local session storage failed.".to_string()
            }
            ClientError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                "Local session storage failed.".to_string()
            }
            ClientError::Json(e) => {
                tracing::warn!("JSON error: {}", e);
                "The server sent a response that could not be read.".to_string()
            }
            ClientError::Io(e) => {
                tracing::warn!("IO error: {}", e);
                format!("Could not read file: {}", e)
            }
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
