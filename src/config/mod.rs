#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::OutputPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{AppConfig, CapabilityKind};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "log-to-json")]
#[command(about = "Parse log-style text into pretty-printed JSON through an external parser")]
pub struct CliConfig {
    /// Text to parse. Read from stdin when omitted and stdin is piped.
    pub text: Option<String>,

    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, conflicts_with = "endpoint", help = "Parser executable (text on stdin, JSON on stdout)")]
    pub command: Option<String>,

    #[arg(long = "command-arg", allow_hyphen_values = true, help = "Extra argument for the parser executable (repeatable)")]
    pub command_args: Vec<String>,

    #[arg(long, help = "Parser HTTP endpoint (text POSTed, JSON returned)")]
    pub endpoint: Option<String>,

    #[arg(long, help = "How often to check whether the parser is ready")]
    pub poll_interval_ms: Option<u64>,

    #[arg(long, help = "Give up waiting for the parser after this long (0 waits forever)")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Indent width of the pretty-printed output")]
    pub indent: Option<usize>,

    #[arg(long, help = "Blank the previous output when a new attempt starts")]
    pub clear_output_on_error: bool,

    #[arg(long, help = "Copy the output to the system clipboard")]
    pub copy: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(command) = &self.command {
            config.capability.kind = CapabilityKind::Command;
            config.capability.command = Some(command.clone());
            config.capability.args = self.command_args.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.capability.kind = CapabilityKind::Http;
            config.capability.endpoint = Some(endpoint.clone());
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.gate.poll_interval_ms = poll_interval_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.gate.timeout_ms = timeout_ms;
        }
        if let Some(indent) = self.indent {
            config.output.indent = indent;
        }
        if self.clear_output_on_error {
            config.output.policy = OutputPolicy::Clear;
        }
    }

    /// File config (or defaults), then flags on top, then validation.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}
