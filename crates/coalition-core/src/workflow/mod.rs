//! Workflow Engine: the simulated orchestration pipeline.
//!
//! One invocation consumes a chat message plus an immutable room/settings
//! snapshot and produces a [`WorkflowResult`]: response text, an ordered
//! participant trace, optional generated file and analysis payloads, or a
//! terminal configuration error. Two workflows exist — the diagnostic sweep
//! and the standard conversation pipeline — selected by trigger phrase.
//! Stages run strictly sequentially; every simulated latency goes through
//! the injected [`Clock`].

pub mod clock;
pub mod context;
pub mod delays;
mod diagnostic;
mod standard;
pub mod triggers;

pub use clock::{Clock, InstantClock, TokioClock};
pub use standard::{StandardStage, CRITICAL_UNITS};
pub use triggers::Trigger;

use crate::config::CoreConfig;
use crate::shared::{ApiSettings, ChatMessage, Room, WorkflowResult};
use crate::validation::ValidationIssue;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Terminal configuration failure: a required unit or room is missing, or a
/// critical unit fails provider validation. Returned as data inside
/// [`WorkflowResult`], never thrown across the engine boundary, so the
/// session controller can render it as an ordinary chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Critical unit \"{0}\" could not be found in any room.")]
    MissingCriticalUnit(String),
    #[error("Required room \"{0}\" could not be found.")]
    MissingRoom(String),
    #[error("Unit \"{unit}\" is not fully configured: {issue}. Please complete its provider setup in the unit's settings.")]
    MisconfiguredUnit {
        unit: String,
        issue: ValidationIssue,
    },
    #[error("Diagnostic workflow requires unit \"{0}\", which could not be found in any room.")]
    MissingDiagnosticUnit(String),
}

/// The stage pipeline. Reentrant per call: it takes the snapshot as
/// arguments, mutates nothing shared, and retains nothing afterwards.
pub struct WorkflowEngine {
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Real-time latencies or zero-delay depending on configuration.
    pub fn from_config(config: &CoreConfig) -> Self {
        if config.simulated_latency {
            Self::new(Arc::new(TokioClock))
        } else {
            Self::new(Arc::new(InstantClock))
        }
    }

    /// Process one message against the given snapshot. Configuration errors
    /// come back as `result.error` with an empty participant trace.
    pub async fn process(
        &self,
        message: &ChatMessage,
        rooms: &[Room],
        settings: &ApiSettings,
    ) -> WorkflowResult {
        let outcome = if Trigger::Diagnostic.matches(&message.text) {
            info!("[WORKFLOW] diagnostic trigger matched, running system sweep");
            diagnostic::run(message, rooms, settings, self.clock.as_ref()).await
        } else {
            standard::run(message, rooms, settings, self.clock.as_ref()).await
        };

        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!("[WORKFLOW] terminal configuration error: {err}");
                WorkflowResult::failure(err.to_string())
            }
        }
    }
}
