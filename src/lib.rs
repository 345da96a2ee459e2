pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::AppConfig;
pub use crate::core::{
    capability::{EnvelopeCapability, FnCapability, SharedSlot},
    formatter::{FormattingAdapter, JsonPrettyPrinter},
    gate::CapabilityGate,
    orchestrator::ParseOrchestrator,
};
pub use domain::model::{ErrorKind, ErrorState, FormattedOutput, OutputPolicy, ParseState, ParsedValue};
pub use utils::error::{ParseError, Result};
