use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure taxonomy shared by the server, the bridge and the remote clients.
#[derive(Debug, thiserror::Error)]
pub enum WaxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Socket bind/accept failures and remote connection errors.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed callback envelopes or unexpected payload shapes.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The web content reported an explicit error string.
    #[error("{0}")]
    Rejected(String),

    #[error("WebView error: Code: {code}, Message: {message}")]
    Load { code: i32, message: String },

    /// The display surface went away before a result arrived.
    #[error("unhandled: {0}")]
    Unhandled(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("display surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("main loop is closed")]
    MainLoopClosed,

    #[error("server error: {0}")]
    Server(String),
}

impl WaxError {
    pub fn is_not_found(&self) -> bool {
        match self {
            WaxError::NotFound(_) => true,
            WaxError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
