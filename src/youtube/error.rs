use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("video {video_id} is not editable with the current credentials")]
    NotEditable { video_id: String },

    #[error("server is temporarily unavailable ({status}): {body}")]
    TransientServer { status: u16, body: String },

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cannot decode response: {0}")]
    Decode(String),

    #[error("cannot encode request: {0}")]
    Encode(String),

    #[error("authorization failed: {0}")]
    Auth(String),
}

impl ApiError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::TransientServer { .. })
    }

    /// Maps a non-success status onto the transient or fatal error kind.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 | 503 => ApiError::TransientServer { status, body },
            _ => ApiError::Server { status, body },
        }
    }
}
