use crate::adapters::command::{CommandCapability, CommandLoader};
use crate::adapters::http::{HttpCapability, HttpLoader};
use crate::core::capability::SharedSlot;
use crate::domain::ports::{CapabilityHandle, CapabilitySource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Brings a capability into existence outside the parse flow.
#[async_trait]
pub trait CapabilityLoader: Send + Sync {
    fn describe(&self) -> String;

    /// `Ok(None)` means "not yet, try again later".
    async fn try_load(&self) -> Result<Option<CapabilityHandle>>;
}

pub fn loader_for(source: CapabilitySource) -> Box<dyn CapabilityLoader> {
    match source {
        CapabilitySource::Command { program, args } => {
            Box::new(CommandLoader::new(CommandCapability::new(program, args)))
        }
        CapabilitySource::Http { endpoint } => {
            Box::new(HttpLoader::new(HttpCapability::new(endpoint)))
        }
    }
}

/// Retries `loader` in the background until it yields a capability, installs
/// it into `slot`, then exits.
pub fn spawn_loader(
    loader: Box<dyn CapabilityLoader>,
    slot: SharedSlot,
    retry_interval: Duration,
) -> JoinHandle<()> {
    let retry_interval = retry_interval.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let description = loader.describe();
        let mut ticker = tokio::time::interval(retry_interval);
        let mut attempts: u32 = 0;

        loop {
            ticker.tick().await;
            attempts += 1;
            match loader.try_load().await {
                Ok(Some(handle)) => {
                    if slot.install(handle) {
                        tracing::info!(
                            "🔌 Parse capability loaded from {} after {} attempt(s)",
                            description,
                            attempts
                        );
                    } else {
                        tracing::debug!("Slot already populated, keeping existing capability");
                    }
                    return;
                }
                Ok(None) => {
                    tracing::debug!("{} not ready yet (attempt {})", description, attempts);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Loading {} failed: {} (attempt {})", description, e, attempts);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::FnCapability;
    use crate::domain::ports::CapabilitySlot;
    use crate::domain::model::ParsedValue;
    use crate::utils::error::ParseError;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Succeeds on the given attempt, fails once before that.
    struct FlakyLoader {
        ready_on: u32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl CapabilityLoader for FlakyLoader {
        fn describe(&self) -> String {
            "flaky test loader".to_string()
        }

        async fn try_load(&self) -> Result<Option<CapabilityHandle>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1 {
                return Err(ParseError::invocation("module fetch failed"));
            }
            if call < self.ready_on {
                return Ok(None);
            }
            Ok(Some(Arc::new(FnCapability::new(|_: &str| {
                Ok(ParsedValue::new(json!({"loaded": true})))
            }))))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_loader_retries_then_installs() {
        let slot = SharedSlot::new();
        let calls = Arc::new(AtomicU32::new(0));
        let loader = FlakyLoader {
            ready_on: 4,
            calls: Arc::clone(&calls),
        };

        spawn_loader(Box::new(loader), slot.clone(), Duration::from_millis(50))
            .await
            .unwrap();

        assert!(slot.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_spawn_loader_keeps_first_capability() {
        let slot = SharedSlot::new();
        slot.install(Arc::new(FnCapability::new(|_: &str| {
            Ok(ParsedValue::new(json!("original")))
        })));

        let loader = FlakyLoader {
            ready_on: 2,
            calls: Arc::new(AtomicU32::new(0)),
        };
        spawn_loader(Box::new(loader), slot.clone(), Duration::from_millis(1))
            .await
            .unwrap();

        let value = slot.current().unwrap().invoke("").await.unwrap();
        assert_eq!(value.as_json(), &json!("original"));
    }

    #[test]
    fn test_loader_for_describes_source() {
        let command = loader_for(CapabilitySource::Command {
            program: "./bin/log-parser".to_string(),
            args: vec![],
        });
        assert_eq!(command.describe(), "command ./bin/log-parser");

        let http = loader_for(CapabilitySource::Http {
            endpoint: "http://localhost:8080/parse".to_string(),
        });
        assert_eq!(http.describe(), "endpoint http://localhost:8080/parse");
    }
}
