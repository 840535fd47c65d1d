//! Adapters shipped with the runtime.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::{Adapter, ReadyReporter};
use crate::error::BoxError;
use crate::manifest::factory::Settings;

/// Placeholder adapter: does nothing except report ready.
///
/// Settings: `name` (required), `delay_ms` (optional pause before ready).
#[derive(Debug)]
pub struct NoopAdapter {
    name: String,
    delay: Duration,
    reporter: OnceLock<ReadyReporter>,
}

impl NoopAdapter {
    pub const ENTRYPOINT: &'static str = "builtin:noop";

    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
            reporter: OnceLock::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BoxError> {
        let name = settings
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or("setting 'name' must be a string")?;
        let delay_ms = match settings.get("delay_ms") {
            None => 0,
            Some(v) => v
                .as_integer()
                .and_then(|ms| u64::try_from(ms).ok())
                .ok_or("setting 'delay_ms' must be a non-negative integer")?,
        };
        Ok(Self::new(name, Duration::from_millis(delay_ms)))
    }
}

#[async_trait]
impl Adapter for NoopAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&self, reporter: ReadyReporter) {
        let _ = self.reporter.set(reporter);
    }

    async fn start(&self) -> Result<(), BoxError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(reporter) = self.reporter.get() {
            reporter.mark_ready();
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings: Settings = toml::from_str("name = \"svc\"\ndelay_ms = 25").unwrap();
        let adapter = NoopAdapter::from_settings(&settings).unwrap();
        assert_eq!(adapter.name(), "svc");
        assert_eq!(adapter.delay, Duration::from_millis(25));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let settings: Settings = toml::from_str("name = \"svc\"\ndelay_ms = -1").unwrap();
        assert!(NoopAdapter::from_settings(&settings).is_err());
    }
}
