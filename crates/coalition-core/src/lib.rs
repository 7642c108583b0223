//! coalition-core: simulated multi-agent chat orchestration.
//!
//! A coalition is a set of rooms, each staffed by named units; one engine
//! runs scripted workflows over a room/settings snapshot and a session
//! controller turns engine output into chat history. All LLM activity is
//! simulated: deterministic traces, fixed texts, injected latency.

mod bootstrap;
mod catalog;
mod config;
mod directory;
mod persistence;
mod session;
mod shared;
mod validation;
pub mod workflow;

// Shared model
pub use shared::{
    ApiSettings, AudioAnalysis, ChatFile, ChatMessage, CloudConnection, EmbeddingSettings,
    FeedbackRating, ImageAnalysis, LlmProviderRef, LocalProviderConnection, Model, Provider,
    ProviderType, Room, Sender, Tool, Unit, UnitType, WordTimestamp, WorkflowResult,
};

// Provider catalog + validation
pub use catalog::{find_provider, llm_providers};
pub use validation::{validate_against_settings, validate_unit_provider, ValidationIssue};

// Directory
pub use directory::{verify_unique_unit_names, DuplicateUnitName, RoomDirectory};

// Workflow engine
pub use workflow::{
    Clock, ConfigurationError, InstantClock, StandardStage, TokioClock, Trigger, WorkflowEngine,
    CRITICAL_UNITS,
};

// Session controller
pub use session::{
    AudioPlayback, ConversationSession, FeedbackOutlet, LoggingFeedbackOutlet, SessionError,
    SilentPlayback,
};

// Configuration, bootstrap fixture, persistence
pub use bootstrap::{initial_rooms, initial_settings};
pub use config::CoreConfig;
pub use persistence::{CoalitionSnapshot, PersistenceError, SledStateStore, StatePersistence};
