use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Classification service error: {0}")]
    #[diagnostic(code(calvox::classifier))]
    Classifier(String),

    #[error("Voice recognition error: {0}")]
    #[diagnostic(code(calvox::voice))]
    Voice(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calvox::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calvox::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(calvox::component))]
    Component(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(code(calvox::invalid_input))]
    InvalidInput(String),

    #[error(transparent)]
    #[diagnostic(code(calvox::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calvox::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calvox::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for JSON errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create classification service errors
pub fn classifier_error(message: &str) -> Error {
    Error::Classifier(message.to_string())
}

/// Helper to create voice recognition errors
pub fn voice_error(message: &str) -> Error {
    Error::Voice(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
