use thiserror::Error;

/// NetCon unified error type
#[derive(Error, Debug)]
pub enum NetConError {
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("Failed to resolve {target:?}: {message}")]
    Resolve { target: String, message: String },

    #[error("Failed to connect to {target:?}: {source}")]
    Dial {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection timeout to {target:?} after {timeout_ms}ms")]
    Timeout { target: String, timeout_ms: u64 },

    #[error("Connection to {target:?} is closed")]
    ConnectionClosed { target: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(String),
}

pub type NetConResult<T> = Result<T, NetConError>;

impl NetConError {
    /// The underlying cause without the target prefix, for user notices.
    pub fn cause(&self) -> String {
        match self {
            Self::Network(source) => source.to_string(),
            Self::Resolve { message, .. } => message.clone(),
            Self::Dial { source, .. } => source.to_string(),
            Self::Timeout { timeout_ms, .. } => format!("timed out after {}ms", timeout_ms),
            Self::ConnectionClosed { .. } => "connection closed".to_string(),
            Self::Script(message) | Self::InvalidInput(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<mlua::Error> for NetConError {
    fn from(err: mlua::Error) -> Self {
        Self::Script(err.to_string())
    }
}
