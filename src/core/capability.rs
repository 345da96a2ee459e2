use crate::domain::model::ParsedValue;
use crate::domain::ports::{CapabilityHandle, CapabilitySlot, ParseCapability};
use crate::utils::error::{ParseError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Write-once slot shared between the loader that fills it and the gates
/// that watch it. Clones observe the same slot.
#[derive(Clone, Default)]
pub struct SharedSlot {
    inner: Arc<OnceLock<CapabilityHandle>>,
}

impl SharedSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a capability was already installed; the first one stays.
    pub fn install(&self, handle: CapabilityHandle) -> bool {
        self.inner.set(handle).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl CapabilitySlot for SharedSlot {
    fn current(&self) -> Option<CapabilityHandle> {
        self.inner.get().cloned()
    }
}

impl fmt::Debug for SharedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Wraps a plain synchronous function as a capability.
pub struct FnCapability<F> {
    func: F,
}

impl<F> FnCapability<F>
where
    F: Fn(&str) -> Result<ParsedValue> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> ParseCapability for FnCapability<F>
where
    F: Fn(&str) -> Result<ParsedValue> + Send + Sync,
{
    async fn invoke(&self, text: &str) -> Result<ParsedValue> {
        (self.func)(text)
    }
}

/// Opt-in wrapper for modules that report failure in-band, the way a WASM
/// shim does: `{"error": "..."}` as the whole result becomes an invocation
/// failure, and a string holding a JSON object or array is decoded once.
///
/// Plain command and HTTP parsers signal failure through exit status or
/// HTTP status, so they are not wrapped; for them a lone `error` field is
/// ordinary parsed data.
#[derive(Debug, Clone)]
pub struct EnvelopeCapability<C> {
    inner: C,
}

impl<C> EnvelopeCapability<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: ParseCapability> ParseCapability for EnvelopeCapability<C> {
    async fn invoke(&self, text: &str) -> Result<ParsedValue> {
        let value = self.inner.invoke(text).await?;
        unwrap_envelope(value.into_json())
    }
}

fn unwrap_envelope(value: Value) -> Result<ParsedValue> {
    let value = match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(decoded @ (Value::Object(_) | Value::Array(_))) => decoded,
            _ => Value::String(text),
        },
        other => other,
    };

    if let Value::Object(map) = &value {
        if map.len() == 1 {
            if let Some(error) = map.get("error") {
                let message = match error {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                return Err(ParseError::invocation(message));
            }
        }
    }

    Ok(ParsedValue::new(value))
}
