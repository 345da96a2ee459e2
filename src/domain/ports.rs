use crate::domain::model::{OutputPolicy, ParsedValue};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// An externally supplied parse function.
#[async_trait]
pub trait ParseCapability: Send + Sync {
    async fn invoke(&self, text: &str) -> Result<ParsedValue>;
}

pub type CapabilityHandle = Arc<dyn ParseCapability>;

/// A place where a capability may appear. Once present it never goes away.
pub trait CapabilitySlot: Send + Sync {
    fn current(&self) -> Option<CapabilityHandle>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub grammar: Grammar,
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grammar: Grammar::Json,
            indent: 2,
        }
    }
}

/// Deterministic, side-effect free pretty-printing engine.
pub trait PrettyPrinter: Send + Sync {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<String>;
}

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilitySource {
    Command { program: String, args: Vec<String> },
    Http { endpoint: String },
}

pub trait ConfigProvider: Send + Sync {
    fn poll_interval(&self) -> Duration;
    /// `None` waits forever.
    fn wait_timeout(&self) -> Option<Duration>;
    fn retry_interval(&self) -> Duration;
    fn indent(&self) -> usize;
    fn output_policy(&self) -> OutputPolicy;
    fn capability_source(&self) -> CapabilitySource;
}
