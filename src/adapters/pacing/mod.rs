//! Pacer adapters.
//!
//! ## Available Adapters
//!
//! - `FixedIntervalPacer` - Sleeps a fixed interval between generation calls
//! - `NoDelayPacer` - Returns immediately, for tests and offline runs

use async_trait::async_trait;
use std::time::Duration;

use crate::ports::Pacer;

/// Waits a constant interval on every pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Default for FixedIntervalPacer {
    fn default() -> Self {
        Self::from_millis(1000)
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelayPacer;

#[async_trait]
impl Pacer for NoDelayPacer {
    async fn pause(&self) {}

    fn interval(&self) -> Duration {
        Duration::ZERO
    }
}
