//! Shared types used across the coalition core.
//!
//! Rooms and units are static configuration owned by the surrounding CRUD
//! layer; the workflow engine only ever reads them. Chat types mirror what
//! the UI exchanges with the session controller.

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Rooms and units
// -----------------------------------------------------------------------------

/// Unit role tag. `Manager` units lead a room; `Drive` units model internal
/// drives and only participate when their loop is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    Standard,
    Manager,
    #[serde(rename = "RAG")]
    Rag,
    #[serde(rename = "Code RAG")]
    CodeRag,
    Drive,
}

/// A unit's LLM provider selection. `connection_id` points into
/// [`ApiSettings::cloud_connections`] or
/// [`ApiSettings::local_provider_connections`] depending on the provider type;
/// local-embedded providers need no connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmProviderRef {
    pub provider_id: String,
    pub model: String,
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// An addressable participant. The display name is the lookup key across the
/// whole engine, so names must be unique across all rooms (see
/// `directory::verify_unique_unit_names`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    #[serde(default)]
    pub purpose: String,
    /// Whether the unit participates autonomously in open-loop activity.
    pub is_loop_open: bool,
    pub llm_provider: LlmProviderRef,
}

/// A scripted tool owned by a room (recovered identity surface; the engine
/// never executes tools).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub language: String,
    pub content: String,
}

/// A named logical grouping of units, representing a functional department
/// (e.g. "Thought Room"). Never created by the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub manager: Option<String>,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

// -----------------------------------------------------------------------------
// Providers and connections
// -----------------------------------------------------------------------------

/// Provider deployment type. Cloud providers require a [`CloudConnection`];
/// local (server-based) providers require a [`LocalProviderConnection`];
/// local-embedded providers need neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderType {
    Cloud,
    Local,
    LocalEmbedded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
}

/// Entry in the static provider catalog (see `catalog::llm_providers`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    #[serde(default)]
    pub models: Vec<Model>,
}

/// Credentialed connection to a cloud provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConnection {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub api_key: String,
}

/// URL-based connection to a local provider server (e.g. an Ollama host).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalProviderConnection {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub url: String,
}

/// Global embedding engine selection shared by all RAG units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub provider_id: String,
    pub model: String,
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// Connection lists and global settings handed to the engine as a read-only
/// snapshot at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub cloud_connections: Vec<CloudConnection>,
    #[serde(default)]
    pub local_provider_connections: Vec<LocalProviderConnection>,
    #[serde(default)]
    pub global_embedding: EmbeddingSettings,
    pub api_port: u16,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            cloud_connections: Vec::new(),
            local_provider_connections: Vec::new(),
            global_embedding: EmbeddingSettings::default(),
            api_port: 8000,
            webhook_url: None,
        }
    }
}

// -----------------------------------------------------------------------------
// Chat surface
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// File attached to or generated for a chat message. `content` is a data-URI
/// payload; immutable once attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFile {
    pub name: String,
    pub mime_type: String,
    pub content: String,
}

impl ChatFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// Explicit user rating of an AI response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackRating {
    Up,
    Down,
}

/// Analysis metadata attached when the visual consortium inspected an image
/// or the image-generation branch fired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scene_relationships: String,
    #[serde(default)]
    pub image_generated: bool,
}

/// One transcribed word with its position on the synthetic audio timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Analysis metadata attached when the sound consortium transcribed an input
/// recording or synthesized a spoken response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub word_timestamps: Vec<WordTimestamp>,
    #[serde(default)]
    pub tts_generated: bool,
}

/// One entry in the session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub files: Vec<ChatFile>,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub feedback: Option<FeedbackRating>,
    #[serde(default)]
    pub feedback_reason: Option<String>,
    #[serde(default)]
    pub system_feedback_applied: bool,
    #[serde(default)]
    pub is_thinking: bool,
    /// Ordered trace of unit ids activated while producing this message.
    /// Duplicates are meaningful (e.g. the historian logs at start and end).
    #[serde(default)]
    pub participant_unit_ids: Vec<String>,
    #[serde(default)]
    pub generated_image: Option<ChatFile>,
    #[serde(default)]
    pub generated_audio: Option<ChatFile>,
    #[serde(default)]
    pub image_analysis: Option<ImageAnalysis>,
    #[serde(default)]
    pub audio_analysis: Option<AudioAnalysis>,
}

impl ChatMessage {
    fn base(id: String, sender: Sender, text: String) -> Self {
        Self {
            id,
            sender,
            text,
            files: Vec::new(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            feedback: None,
            feedback_reason: None,
            system_feedback_applied: false,
            is_thinking: false,
            participant_unit_ids: Vec::new(),
            generated_image: None,
            generated_audio: None,
            image_analysis: None,
            audio_analysis: None,
        }
    }

    /// New user message carrying the submitted text and attachments.
    pub fn user(text: impl Into<String>, files: Vec<ChatFile>) -> Self {
        let mut msg = Self::base(
            format!("msg-{}", uuid::Uuid::new_v4()),
            Sender::User,
            text.into(),
        );
        msg.files = files;
        msg
    }

    /// Placeholder shown while the workflow engine is running.
    pub fn thinking() -> Self {
        let mut msg = Self::base(
            format!("thinking-{}", uuid::Uuid::new_v4()),
            Sender::Ai,
            String::new(),
        );
        msg.is_thinking = true;
        msg
    }

    /// AI message carrying all engine outputs of a successful invocation.
    pub fn from_workflow(result: WorkflowResult) -> Self {
        let mut msg = Self::base(
            format!("msg-{}", uuid::Uuid::new_v4()),
            Sender::Ai,
            result.response_text,
        );
        msg.participant_unit_ids = result.participant_unit_ids;
        msg.generated_image = result.generated_image;
        msg.generated_audio = result.generated_audio;
        msg.image_analysis = result.image_analysis;
        msg.audio_analysis = result.audio_analysis;
        msg
    }

    /// Synthetic AI message rendering a configuration error as a chat bubble.
    /// Distinct id prefix, empty participant trace, no files.
    pub fn workflow_error(error: impl Into<String>) -> Self {
        Self::base(
            format!("err-{}", uuid::Uuid::new_v4()),
            Sender::Ai,
            error.into(),
        )
    }
}

// -----------------------------------------------------------------------------
// Engine output contract
// -----------------------------------------------------------------------------

/// Output of one workflow invocation. Exactly one of a populated
/// `response_text`/analysis payload or `error` is meaningful; `error` implies
/// an empty participant trace and empty response text. Generated image and
/// audio are independent slots: a voice reply can still carry a rendered
/// image alongside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub response_text: String,
    pub participant_unit_ids: Vec<String>,
    #[serde(default)]
    pub generated_image: Option<ChatFile>,
    #[serde(default)]
    pub generated_audio: Option<ChatFile>,
    #[serde(default)]
    pub image_analysis: Option<ImageAnalysis>,
    #[serde(default)]
    pub audio_analysis: Option<AudioAnalysis>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WorkflowResult {
    /// Terminal configuration failure: empty trace, empty text, error set.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
