use std::time::Duration;
use thiserror::Error;

use crate::domain::model::ErrorKind;

pub const CAPABILITY_UNAVAILABLE_MESSAGE: &str = "Parser module is not loaded.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse input.";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse capability unavailable after waiting {waited:?}")]
    CapabilityUnavailable { waited: Duration },

    #[error("Parse capability failed: {message}")]
    InvocationFailure { message: String },

    #[error("Formatting failed: {message}")]
    FormatFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::InvocationFailure {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatFailure {
            message: message.into(),
        }
    }

    /// Classifies the error into the closed set surfaced to the user.
    ///
    /// Transport failures happen while talking to the capability, so they
    /// count as invocation failures. Configuration problems mean no
    /// capability could ever be set up; they only come out of config
    /// loading at the binary edge (`CliConfig::resolve`), never out of
    /// `ParseOrchestrator::parse`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapabilityUnavailable { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorKind::CapabilityUnavailable,
            Self::InvocationFailure { .. } | Self::IoError(_) | Self::HttpError(_) => {
                ErrorKind::InvocationFailure
            }
            Self::FormatFailure { .. } => ErrorKind::FormatFailure,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::CapabilityUnavailable => CAPABILITY_UNAVAILABLE_MESSAGE,
            ErrorKind::InvocationFailure | ErrorKind::FormatFailure => PARSE_FAILURE_MESSAGE,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::CapabilityUnavailable { .. } => {
                "Check that the parser command or endpoint is reachable, or raise --timeout-ms"
            }
            Self::InvocationFailure { .. } | Self::IoError(_) | Self::HttpError(_) => {
                "Check the input text and try again"
            }
            Self::FormatFailure { .. } => "The parser returned a value that cannot be rendered",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::format(err.to_string())
    }
}
