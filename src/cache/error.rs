use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors a client can provoke with a bad command line. These are answered
/// with an `ERR` line and never end the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("missing key")]
    MissingKey,

    #[error("usage: SET key value")]
    SetUsage,

    #[error("unknown command")]
    UnknownCommand,

    #[error("invalid UTF-8 in request")]
    InvalidUtf8,
}
