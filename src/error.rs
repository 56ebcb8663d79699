//! Error types for butio-salt-rs

use thiserror::Error;

/// Main error type for butio-salt-rs operations
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The provisioning argument blob is not valid JSON. Carries the fully
    /// rendered, line-highlighted diagnostic destined for stderr; the
    /// process exits with status 1 after printing it.
    #[error("failed to parse json block '{description}'")]
    ConfigSyntax {
        description: String,
        diagnostic: String,
    },

    #[error("required provisioning argument field missing: {0}")]
    MissingField(&'static str),

    #[error("required metadata key unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("State '{name}' failed: {message}")]
    StateApplication { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Command execution failed: {0}")]
    Command(String),
}

impl BootstrapError {
    /// Create a state application error
    pub fn state(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StateApplication {
            name: name.into(),
            message: message.into(),
        }
    }
}
