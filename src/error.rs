#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("Url error {0}")]
    Url(#[from] url::ParseError),

    #[error("Backend url {0} cannot carry a path")]
    BaseUrl(String),

    #[error("Token payload is not base64 {0}")]
    TokenEncoding(#[from] base64::DecodeError),

    #[error("Malformed token")]
    MalformedToken,

    #[error("Browser storage is unavailable")]
    Storage,

    #[error("Destination {0} not found")]
    MissingDestination(String),
}

pub type Result<T> = std::result::Result<T, Error>;
