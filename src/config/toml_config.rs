use crate::core::gate::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::domain::model::OutputPolicy;
use crate::domain::ports::{CapabilitySource, ConfigProvider};
use crate::utils::error::{ParseError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/parse";
const MAX_INDENT: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub capability: CapabilityConfig,
    pub gate: GateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Command,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub endpoint: Option<String>,
    /// How often the loader retries while the capability is not up yet.
    pub retry_interval_ms: u64,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            kind: CapabilityKind::Http,
            command: None,
            args: Vec::new(),
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            retry_interval_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub poll_interval_ms: u64,
    /// 0 waits forever.
    pub timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            timeout_ms: DEFAULT_WAIT_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub indent: usize,
    pub policy: OutputPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            policy: OutputPolicy::Retain,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ParseError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PARSER_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ParseError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_number("gate.poll_interval_ms", self.gate.poll_interval_ms, 1)?;
        validation::validate_positive_number(
            "capability.retry_interval_ms",
            self.capability.retry_interval_ms,
            1,
        )?;
        validation::validate_range("output.indent", self.output.indent, 0, MAX_INDENT)?;

        match self.capability.kind {
            CapabilityKind::Command => {
                let command = self.capability.command.as_deref().ok_or_else(|| {
                    ParseError::ConfigError {
                        message: "capability.command is required when type = \"command\"".to_string(),
                    }
                })?;
                validation::validate_command("capability.command", command)
            }
            CapabilityKind::Http => {
                let endpoint = self.capability.endpoint.as_deref().unwrap_or_default();
                validation::validate_endpoint("capability.endpoint", endpoint)
            }
        }
    }
}

impl ConfigProvider for AppConfig {
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.gate.poll_interval_ms)
    }

    fn wait_timeout(&self) -> Option<Duration> {
        (self.gate.timeout_ms > 0).then(|| Duration::from_millis(self.gate.timeout_ms))
    }

    fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.capability.retry_interval_ms)
    }

    fn indent(&self) -> usize {
        self.output.indent
    }

    fn output_policy(&self) -> OutputPolicy {
        self.output.policy
    }

    fn capability_source(&self) -> CapabilitySource {
        match self.capability.kind {
            CapabilityKind::Command => CapabilitySource::Command {
                program: self.capability.command.clone().unwrap_or_default(),
                args: self.capability.args.clone(),
            },
            CapabilityKind::Http => CapabilitySource::Http {
                endpoint: self
                    .capability
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.wait_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.indent(), 2);
        assert_eq!(config.output_policy(), OutputPolicy::Retain);
        assert_eq!(
            config.capability_source(),
            CapabilitySource::Http {
                endpoint: DEFAULT_ENDPOINT.to_string()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_command_config() {
        let toml_content = r#"
[capability]
type = "command"
command = "./bin/log-parser"
args = ["--json"]

[gate]
poll_interval_ms = 50
timeout_ms = 0

[output]
indent = 4
policy = "clear"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.capability_source(),
            CapabilitySource::Command {
                program: "./bin/log-parser".to_string(),
                args: vec!["--json".to_string()],
            }
        );
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.wait_timeout(), None);
        assert_eq!(config.indent(), 4);
        assert_eq!(config.output_policy(), OutputPolicy::Clear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOG_TO_JSON_TEST_ENDPOINT", "http://parser.internal:9000/parse");

        let toml_content = r#"
[capability]
type = "http"
endpoint = "${LOG_TO_JSON_TEST_ENDPOINT}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.capability.endpoint.as_deref(),
            Some("http://parser.internal:9000/parse")
        );

        std::env::remove_var("LOG_TO_JSON_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let missing_command = AppConfig::from_toml_str("[capability]\ntype = \"command\"\n").unwrap();
        assert!(missing_command.validate().is_err());

        let bad_endpoint =
            AppConfig::from_toml_str("[capability]\ntype = \"http\"\nendpoint = \"not-a-url\"\n")
                .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let zero_poll = AppConfig::from_toml_str("[gate]\npoll_interval_ms = 0\n").unwrap();
        assert!(zero_poll.validate().is_err());

        let wide_indent = AppConfig::from_toml_str("[output]\nindent = 12\n").unwrap();
        assert!(wide_indent.validate().is_err());
    }

    #[test]
    fn test_command_pointing_at_directory_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.capability.kind = CapabilityKind::Command;
        config.capability.command = Some(dir.path().to_string_lossy().into_owned());

        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("capability.command"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[gate\npoll_interval_ms = 1").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[gate]\npoll_interval_ms = 25\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.gate.poll_interval_ms, 25);
        assert_eq!(config.gate.timeout_ms, 30_000);
    }
}
