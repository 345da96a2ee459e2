use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::ParseError;

/// Text supplied by the user. No invariants beyond being text.
pub type RawInput = String;

/// Opaque structured value returned by a parse capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedValue(serde_json::Value);

impl ParsedValue {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for ParsedValue {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Pretty-printed rendering of a [`ParsedValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedOutput(String);

impl FormattedOutput {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FormattedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CapabilityUnavailable,
    InvocationFailure,
    FormatFailure,
}

/// The one-line error shown to the user for a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ParseError> for ErrorState {
    fn from(err: &ParseError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_friendly_message().to_string(),
        }
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What happens to the previous output when a new attempt starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Keep the last successful output until the next success.
    #[default]
    Retain,
    /// Blank the output as soon as an attempt starts.
    Clear,
}

/// Snapshot of what the interaction surface renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    pub input: RawInput,
    pub output: String,
    pub error: Option<ErrorState>,
}
