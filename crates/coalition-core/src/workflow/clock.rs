//! Injected suspension clock.
//!
//! Every simulated-latency point in the engine goes through [`Clock`], so
//! tests can run a whole workflow with zero real delay while preserving
//! stage order.

use async_trait::async_trait;
use std::time::Duration;

/// Suspension point used by workflow stages and the session feedback timer.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn suspend(&self, duration: Duration);
}

/// Real-time clock backed by the tokio timer wheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn suspend(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Zero-delay clock: suspension points complete immediately. Stage ordering
/// is unchanged because stages still run strictly sequentially.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantClock;

#[async_trait]
impl Clock for InstantClock {
    async fn suspend(&self, _duration: Duration) {}
}
