use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other transport
    /// failures.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err)
        }
    }
}
