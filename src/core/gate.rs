use crate::domain::ports::{CapabilityHandle, CapabilitySlot};
use crate::utils::error::{ParseError, Result};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Turns a slot that fills in at some unknown time into a single await point.
///
/// The slot offers no notification, so each waiter samples it on its own
/// interval. Any number of waiters may wait at once; they all see the same
/// handle once it lands.
#[derive(Debug, Clone)]
pub struct CapabilityGate<S: CapabilitySlot> {
    slot: S,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<S: CapabilitySlot> CapabilityGate<S> {
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_WAIT_TIMEOUT),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// `None` waits until the capability shows up, however long that takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn await_capability(&self) -> Result<CapabilityHandle> {
        let Some(limit) = self.timeout else {
            return Ok(self.poll().await);
        };

        match tokio::time::timeout(limit, self.poll()).await {
            Ok(handle) => Ok(handle),
            Err(_) => {
                tracing::warn!("⏳ Parse capability did not load within {:?}", limit);
                Err(ParseError::CapabilityUnavailable { waited: limit })
            }
        }
    }

    async fn poll(&self) -> CapabilityHandle {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // first tick completes immediately
            ticker.tick().await;
            if let Some(handle) = self.slot.current() {
                return handle;
            }
            tracing::trace!("Parse capability not ready, polling again");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{FnCapability, SharedSlot};
    use crate::domain::model::ParsedValue;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn echo_capability() -> CapabilityHandle {
        Arc::new(FnCapability::new(|text: &str| {
            Ok(ParsedValue::new(json!({ "echo": text })))
        }))
    }

    fn install_after(slot: &SharedSlot, delay: Duration) {
        let slot = slot.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            slot.install(echo_capability());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_slot_resolves_immediately() {
        let slot = SharedSlot::new();
        slot.install(echo_capability());
        let gate = CapabilityGate::new(slot);

        let started = Instant::now();
        let handle = gate.await_capability().await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(
            handle.invoke("hi").await.unwrap(),
            ParsedValue::new(json!({"echo": "hi"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_within_one_poll_interval_of_readiness() {
        let poll = Duration::from_millis(100);
        for delay_ms in [0u64, 1, 99, 100, 250, 1_000] {
            let delay = Duration::from_millis(delay_ms);
            let slot = SharedSlot::new();
            let gate = CapabilityGate::new(slot.clone()).with_poll_interval(poll);

            let started = Instant::now();
            install_after(&slot, delay);
            gate.await_capability().await.unwrap();

            let elapsed = started.elapsed();
            assert!(elapsed >= delay, "resolved before readiness ({:?})", elapsed);
            assert!(
                elapsed <= delay + poll,
                "delay {:?} resolved after {:?}",
                delay,
                elapsed
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_never_populated() {
        let gate = CapabilityGate::new(SharedSlot::new())
            .with_poll_interval(Duration::from_millis(100))
            .with_timeout(Some(Duration::from_secs(2)));

        let started = Instant::now();
        let err = gate.await_capability().await.err().unwrap();
        assert!(matches!(
            err,
            ParseError::CapabilityUnavailable { waited } if waited == Duration::from_secs(2)
        ));
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_wait_keeps_waiting() {
        let gate = CapabilityGate::new(SharedSlot::new()).with_timeout(None);
        let waited =
            tokio::time::timeout(Duration::from_secs(3600), gate.await_capability()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_all_resolve() {
        let slot = SharedSlot::new();
        let gate = Arc::new(CapabilityGate::new(slot.clone()));

        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move { gate.await_capability().await.is_ok() })
            })
            .collect();

        install_after(&slot, Duration::from_millis(350));

        for waiter in waiters {
            assert!(waiter.await.unwrap());
        }
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let gate = CapabilityGate::new(SharedSlot::new()).with_poll_interval(Duration::ZERO);
        assert_eq!(gate.poll_interval(), MIN_POLL_INTERVAL);
    }
}
