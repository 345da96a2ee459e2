use crate::adapters::loader::CapabilityLoader;
use crate::domain::model::ParsedValue;
use crate::domain::ports::{CapabilityHandle, ParseCapability};
use crate::utils::error::{ParseError, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Parser backed by an external executable: text on stdin, JSON on stdout.
#[derive(Debug, Clone)]
pub struct CommandCapability {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandCapability {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl ParseCapability for CommandCapability {
    async fn invoke(&self, text: &str) -> Result<ParsedValue> {
        tracing::debug!("Spawning parser: {}", self.program.display());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // stdin is fed while stdout drains, or a parser that echoes more than
        // a pipe buffer blocks on write and never reads the rest
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                // dropped at the end of the block, so the parser sees EOF
                Some(mut stdin) => stdin.write_all(text.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParseError::invocation(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        match fed {
            // the parser answered without reading all of its input
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("{} closed stdin early", self.program.display());
            }
            other => other?,
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            ParseError::invocation(format!(
                "{} printed invalid JSON: {}",
                self.program.display(),
                e
            ))
        })?;
        Ok(ParsedValue::new(value))
    }
}

/// Loads a [`CommandCapability`] once its executable exists.
///
/// A bare program name is resolved through `PATH` at spawn time, so it is
/// treated as present right away.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    capability: CommandCapability,
}

impl CommandLoader {
    pub fn new(capability: CommandCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl CapabilityLoader for CommandLoader {
    fn describe(&self) -> String {
        format!("command {}", self.capability.program.display())
    }

    async fn try_load(&self) -> Result<Option<CapabilityHandle>> {
        let program = &self.capability.program;
        let is_bare_name = program.components().count() == 1 && !program.is_absolute();
        if !is_bare_name && !tokio::fs::try_exists(program).await? {
            return Ok(None);
        }
        Ok(Some(Arc::new(self.capability.clone())))
    }
}
