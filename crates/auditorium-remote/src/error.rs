use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-success status. `body` is the raw response text.
    #[error("{body}")]
    Status { status: u16, body: String },

    /// The backend could not be reached or the connection failed mid-call.
    #[error("{0}")]
    Transport(String),

    #[error("unexpected response from backend: {0}")]
    Decode(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl RemoteError {
    pub fn status(status: u16, body: String) -> Self {
        let body = if body.trim().is_empty() {
            format!("backend responded with HTTP {}", status)
        } else {
            body
        };
        Self::Status { status, body }
    }

    /// True when the backend refused the credential the call was made with.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
