use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    /// Single-line message for the dismissible error banner. Remote
    /// failures all collapse into this; details stay in the logs.
    pub fn client_display(&self) -> String {
        match self {
            Self::Transport(_) => String::from("Network error, unable to reach the course API."),
            Self::Status { status, .. } => {
                format!("The course API rejected the request (HTTP {status}).")
            }
        }
    }
}
