use thiserror::Error;

/// Message the editor side matches on to switch to another fold provider.
pub const FALLBACK_EXCEPTION: &str = "UfoFallbackException";

#[derive(Error, Debug)]
pub enum Error {
    /// No provider declared the folding-range capability after the probe backoff.
    #[error("{}", FALLBACK_EXCEPTION)]
    ProviderUnavailable,

    #[error("Orchestrator has been disposed")]
    Disposed,

    #[error("Host error: {0}")]
    Host(String),

    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Timeout error: operation timed out")]
    Timeout,

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol {
            message: msg.into(),
        }
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// True when the caller should fall back to a different folding strategy.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::ProviderUnavailable)
    }
}
