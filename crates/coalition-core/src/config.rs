//! Runtime configuration for the coalition core, sourced from environment
//! variables with operational defaults.

use std::time::Duration;
use tracing::warn;

const DEFAULT_FEEDBACK_WINDOW_SECS: u64 = 15;

/// Tunables the surrounding process can override per deployment.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// How long an unrated AI response waits before system feedback applies.
    pub feedback_window: Duration,
    /// Whether workflow stages spend their simulated latencies. Disable for
    /// headless batch runs.
    pub simulated_latency: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            feedback_window: Duration::from_secs(DEFAULT_FEEDBACK_WINDOW_SECS),
            simulated_latency: true,
        }
    }
}

impl CoreConfig {
    /// Reads `COALITION_FEEDBACK_WINDOW_SECS` and `COALITION_SIMULATED_LATENCY`.
    /// Malformed values fall back to the defaults with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let feedback_window = match std::env::var("COALITION_FEEDBACK_WINDOW_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!("[CONFIG] ignoring malformed COALITION_FEEDBACK_WINDOW_SECS={raw}");
                    defaults.feedback_window
                }
            },
            Err(_) => defaults.feedback_window,
        };

        let simulated_latency = match std::env::var("COALITION_SIMULATED_LATENCY") {
            Ok(raw) => !matches!(raw.trim().to_lowercase().as_str(), "0" | "false" | "off"),
            Err(_) => defaults.simulated_latency,
        };

        Self {
            feedback_window,
            simulated_latency,
        }
    }
}
