//! Pacer Port - spacing between external generation calls.
//!
//! The orchestrator awaits [`Pacer::pause`] between consecutive slides to stay
//! under the generation provider's request-rate limit. The policy is injected
//! so tests can run with no delay.

use async_trait::async_trait;
use std::time::Duration;

/// Port for pacing consecutive generation calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspends until the next call may be issued.
    async fn pause(&self);

    /// Nominal delay per pause, for logging.
    fn interval(&self) -> Duration;
}
