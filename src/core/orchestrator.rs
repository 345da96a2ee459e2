use crate::core::formatter::{FormattingAdapter, JsonPrettyPrinter};
use crate::core::gate::CapabilityGate;
use crate::domain::model::{ErrorState, FormattedOutput, OutputPolicy, ParseState, RawInput};
use crate::domain::ports::{CapabilitySlot, Clipboard, ConfigProvider, PrettyPrinter};
use crate::utils::error::Result;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Published {
    attempt: u64,
    view: ParseState,
}

/// Runs one parse attempt per call and publishes exactly one outcome.
///
/// Overlapping calls are allowed. The newest attempt owns the published
/// state; a superseded attempt still returns its result to its caller but
/// never touches what the surface sees.
pub struct ParseOrchestrator<S: CapabilitySlot, P: PrettyPrinter = JsonPrettyPrinter> {
    gate: CapabilityGate<S>,
    formatter: FormattingAdapter<P>,
    output_policy: OutputPolicy,
    state: RwLock<Published>,
}

impl<S: CapabilitySlot> ParseOrchestrator<S> {
    pub fn new(gate: CapabilityGate<S>) -> Self {
        Self::with_formatter(gate, FormattingAdapter::new())
    }

    pub fn from_config<C: ConfigProvider>(slot: S, config: &C) -> Self {
        let gate = CapabilityGate::new(slot)
            .with_poll_interval(config.poll_interval())
            .with_timeout(config.wait_timeout());
        Self::with_formatter(gate, FormattingAdapter::with_indent(config.indent()))
            .with_output_policy(config.output_policy())
    }
}

impl<S: CapabilitySlot, P: PrettyPrinter> ParseOrchestrator<S, P> {
    pub fn with_formatter(gate: CapabilityGate<S>, formatter: FormattingAdapter<P>) -> Self {
        Self {
            gate,
            formatter,
            output_policy: OutputPolicy::default(),
            state: RwLock::new(Published::default()),
        }
    }

    pub fn with_output_policy(mut self, policy: OutputPolicy) -> Self {
        self.output_policy = policy;
        self
    }

    pub fn gate(&self) -> &CapabilityGate<S> {
        &self.gate
    }

    pub fn output_policy(&self) -> OutputPolicy {
        self.output_policy
    }

    pub fn state(&self) -> ParseState {
        self.state.read().view.clone()
    }

    pub async fn parse(
        &self,
        raw: impl Into<RawInput>,
    ) -> std::result::Result<FormattedOutput, ErrorState> {
        let raw = raw.into();
        let attempt = self.begin_attempt(&raw);

        let outcome = self.run(&raw).await;
        if let Err(err) = &outcome {
            debug_assert!(!err.is_config_error(), "config error reached parse: {}", err);
            tracing::warn!(
                "❌ Parse attempt {} failed: {} (kind: {:?})",
                attempt,
                err,
                err.kind()
            );
            tracing::debug!("💡 {}", err.recovery_suggestion());
        }

        self.publish(attempt, &outcome);
        outcome.map_err(|err| ErrorState::from(&err))
    }

    /// Copies the current output to the clipboard. Best effort: failures are
    /// logged and reported as `false`.
    pub fn copy_output<C: Clipboard + ?Sized>(&self, clipboard: &C) -> bool {
        let output = self.state.read().view.output.clone();
        match clipboard.set_text(&output) {
            Ok(()) => {
                tracing::info!("📋 Copied {} bytes to clipboard", output.len());
                true
            }
            Err(e) => {
                tracing::warn!("📋 Clipboard copy failed: {}", e);
                false
            }
        }
    }

    async fn run(&self, raw: &str) -> Result<FormattedOutput> {
        let capability = self.gate.await_capability().await?;

        tracing::debug!("Invoking parse capability with {} bytes", raw.len());
        let value = capability.invoke(raw).await?;

        let output = self.formatter.format(&value)?;
        tracing::debug!("Formatted output is {} bytes", output.as_str().len());
        Ok(output)
    }

    fn begin_attempt(&self, raw: &str) -> u64 {
        let mut state = self.state.write();
        state.attempt += 1;

        let output = match self.output_policy {
            OutputPolicy::Retain => std::mem::take(&mut state.view.output),
            OutputPolicy::Clear => String::new(),
        };
        state.view = ParseState {
            input: raw.to_string(),
            output,
            error: None,
        };
        state.attempt
    }

    fn publish(&self, attempt: u64, outcome: &Result<FormattedOutput>) {
        let mut state = self.state.write();
        if state.attempt != attempt {
            tracing::debug!(
                "Discarding result of attempt {} superseded by attempt {}",
                attempt,
                state.attempt
            );
            return;
        }

        let (output, error) = match outcome {
            Ok(formatted) => (formatted.as_str().to_string(), None),
            Err(err) => (
                std::mem::take(&mut state.view.output),
                Some(ErrorState::from(err)),
            ),
        };
        state.view = ParseState {
            input: std::mem::take(&mut state.view.input),
            output,
            error,
        };
    }
}
