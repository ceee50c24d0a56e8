#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("sending request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("non success status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
    #[error("missing {0}")]
    MissingData(&'static str),
    #[error("service reported failure")]
    Unsuccessful,
    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),
}

/// Failures that end a run early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("writing output: {0}")]
    Output(#[from] std::io::Error),
}
