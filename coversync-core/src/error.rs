#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Command {command} rejected by device")]
    Rejected { command: String },

    #[error("Cloud service unavailable")]
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Cover {0} not found")]
    CoverNotFound(String),

    #[error("Cover {0} already registered")]
    CoverExists(String),

    #[error("Invalid target position {0}, expected 0..=10000")]
    InvalidTarget(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BridgeError {
    fn from(e: toml::de::Error) -> Self {
        BridgeError::Config(e.to_string())
    }
}

pub type Result<T> = core::result::Result<T, BridgeError>;
