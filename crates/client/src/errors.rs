use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures talking to the Lifeplan API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}
