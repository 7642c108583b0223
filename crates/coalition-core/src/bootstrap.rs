//! Initial coalition fixture: the default room layout and API settings a
//! fresh deployment starts from.
//!
//! Every unit here is fully configured against [`initial_settings`], so a
//! diagnostic sweep over the pristine fixture reports success and the
//! standard workflow's pre-flight passes. Unit ids are stable slugs rather
//! than random, so traces stay comparable across runs and restarts.

use crate::shared::{
    ApiSettings, CloudConnection, EmbeddingSettings, LlmProviderRef, LocalProviderConnection,
    Room, Unit, UnitType,
};

const CONN_OLLAMA: &str = "conn-ollama";
const CONN_OPENAI: &str = "conn-openai";
const CONN_GOOGLE: &str = "conn-google";
const CONN_ANTHROPIC: &str = "conn-anthropic";
const CONN_GROQ: &str = "conn-groq";

fn unit(
    id: &str,
    name: &str,
    unit_type: UnitType,
    purpose: &str,
    is_loop_open: bool,
    provider_id: &str,
    model: &str,
    connection_id: &str,
) -> Unit {
    Unit {
        id: id.to_string(),
        name: name.to_string(),
        unit_type,
        purpose: purpose.to_string(),
        is_loop_open,
        llm_provider: LlmProviderRef {
            provider_id: provider_id.to_string(),
            model: model.to_string(),
            connection_id: if connection_id.is_empty() {
                None
            } else {
                Some(connection_id.to_string())
            },
        },
    }
}

fn room(id: &str, name: &str, manager: &str, units: Vec<Unit>) -> Room {
    Room {
        id: id.to_string(),
        name: name.to_string(),
        manager: Some(manager.to_string()),
        units,
        tools: Vec::new(),
    }
}

/// The default room layout. Room and unit names are load-bearing: the
/// workflow engine resolves participants by these exact strings.
pub fn initial_rooms() -> Vec<Room> {
    vec![
        room(
            "room-admin",
            "Admin Room",
            "Admin Manager",
            vec![
                unit(
                    "unit-admin-manager",
                    "Admin Manager",
                    UnitType::Manager,
                    "Receives every inbound message and routes it to the right department.",
                    true,
                    "anthropic",
                    "claude-3-opus",
                    CONN_ANTHROPIC,
                ),
                unit(
                    "unit-coalition-supervisor",
                    "Coalition Supervisor",
                    UnitType::Standard,
                    "Monitors overall coalition load and inter-room handoffs.",
                    false,
                    "groq",
                    "llama3-70b",
                    CONN_GROQ,
                ),
                unit(
                    "unit-system-test",
                    "System Test Unit",
                    UnitType::Standard,
                    "Runs configuration sweeps across every room on request.",
                    false,
                    "ollama",
                    "phi-3-mini",
                    CONN_OLLAMA,
                ),
            ],
        ),
        room(
            "room-communication",
            "Communication Room",
            "Comms Chief",
            vec![
                unit(
                    "unit-comms-chief",
                    "Comms Chief",
                    UnitType::Manager,
                    "Coordinates message passing between rooms.",
                    true,
                    "groq",
                    "llama3-8b",
                    CONN_GROQ,
                ),
                unit(
                    "unit-comms-bus",
                    "Inter-Unit Comms Bus",
                    UnitType::Standard,
                    "Relays working context between cooperating units.",
                    false,
                    "ollama",
                    "phi-3-mini",
                    CONN_OLLAMA,
                ),
            ],
        ),
        room(
            "room-thought",
            "Thought Room",
            "Lead Thinker",
            vec![
                unit(
                    "unit-lead-thinker",
                    "Lead Thinker",
                    UnitType::Manager,
                    "Owns the plan for every request and synthesizes specialist input.",
                    true,
                    "anthropic",
                    "claude-3-opus",
                    CONN_ANTHROPIC,
                ),
                unit(
                    "unit-strategy-analyst",
                    "Strategy Analyst",
                    UnitType::Standard,
                    "Breaks a request into ordered sub-goals.",
                    true,
                    "openai",
                    "gpt-4o",
                    CONN_OPENAI,
                ),
                unit(
                    "unit-risk-analyst",
                    "Risk Analyst",
                    UnitType::Standard,
                    "Flags ambiguous or conflicting instructions in the plan.",
                    true,
                    "groq",
                    "mixtral-8x7b",
                    CONN_GROQ,
                ),
                unit(
                    "unit-memory-curator",
                    "Long-Term Memory Curator",
                    UnitType::Rag,
                    "Maintains distilled conversation memory for future planning.",
                    false,
                    "ollama",
                    "mistral-7b",
                    CONN_OLLAMA,
                ),
            ],
        ),
        room(
            "room-information",
            "Information Room",
            "Head Librarian",
            vec![
                unit(
                    "unit-head-librarian",
                    "Head Librarian",
                    UnitType::Manager,
                    "Looks up stored knowledge relevant to the current request.",
                    true,
                    "openai",
                    "gpt-4-turbo",
                    CONN_OPENAI,
                ),
                unit(
                    "unit-chat-historian",
                    "Chat Historian",
                    UnitType::Rag,
                    "Retrieves prior conversation context and records the final exchange.",
                    true,
                    "ollama",
                    "llama3-8b",
                    CONN_OLLAMA,
                ),
            ],
        ),
        room(
            "room-information-search",
            "Information Search Room",
            "Chief Explorer",
            vec![
                unit(
                    "unit-chief-explorer",
                    "Chief Explorer",
                    UnitType::Manager,
                    "Decides when a request needs live external data.",
                    true,
                    "google",
                    "gemini-2.5-flash",
                    CONN_GOOGLE,
                ),
                unit(
                    "unit-weather",
                    "Weather Unit",
                    UnitType::Standard,
                    "Fetches current weather conditions for a named location.",
                    false,
                    "groq",
                    "llama3-8b",
                    CONN_GROQ,
                ),
            ],
        ),
        room(
            "room-visual",
            "Visual Room",
            "Art Director",
            vec![
                unit(
                    "unit-art-director",
                    "Art Director",
                    UnitType::Manager,
                    "Leads all visual analysis and generation work.",
                    true,
                    "google",
                    "gemini-2.5-flash",
                    CONN_GOOGLE,
                ),
                unit(
                    "unit-image-generation",
                    "Image Generation Specialist",
                    UnitType::Standard,
                    "Renders images from sanctioned prompts.",
                    false,
                    "google",
                    "imagen-3.0-generate-002",
                    CONN_GOOGLE,
                ),
                unit(
                    "unit-scene-relationships",
                    "Scene Relationship Analyst",
                    UnitType::Standard,
                    "Describes how the objects in an image relate to each other.",
                    true,
                    "ollama",
                    "llava",
                    CONN_OLLAMA,
                ),
                unit(
                    "unit-background-context",
                    "Background Context Analyst",
                    UnitType::Standard,
                    "Identifies setting, lighting and mood in an attached image.",
                    true,
                    "ollama",
                    "moondream",
                    CONN_OLLAMA,
                ),
            ],
        ),
        room(
            "room-sound",
            "Sound Room",
            "Audio Director",
            vec![
                unit(
                    "unit-audio-director",
                    "Audio Director",
                    UnitType::Manager,
                    "Leads transcription and speech synthesis work.",
                    true,
                    "openai",
                    "gpt-4o",
                    CONN_OPENAI,
                ),
                unit(
                    "unit-stt",
                    "Speech-to-Text Transcriber",
                    UnitType::Standard,
                    "Transcribes attached recordings with per-word timestamps.",
                    false,
                    "openai",
                    "whisper-1",
                    CONN_OPENAI,
                ),
                unit(
                    "unit-tts",
                    "Text-to-Speech Synthesizer",
                    UnitType::Standard,
                    "Synthesizes spoken replies to voice messages.",
                    false,
                    "openai",
                    "tts-1",
                    CONN_OPENAI,
                ),
            ],
        ),
        room(
            "room-sanctions",
            "Sanctions Room",
            "Chief Arbiter",
            vec![
                unit(
                    "unit-chief-arbiter",
                    "Chief Arbiter",
                    UnitType::Manager,
                    "Approves or rejects every plan before execution.",
                    true,
                    "anthropic",
                    "claude-3-sonnet",
                    CONN_ANTHROPIC,
                ),
                unit(
                    "unit-chat-responder",
                    "Chat Responder",
                    UnitType::Standard,
                    "Writes the final user-facing reply.",
                    true,
                    "openai",
                    "gpt-4o",
                    CONN_OPENAI,
                ),
            ],
        ),
    ]
}

/// Default API settings matching [`initial_rooms`]: one connection per cloud
/// provider in use plus a local Ollama host. Keys are placeholders the
/// operator replaces before going live.
pub fn initial_settings() -> ApiSettings {
    let cloud = |id: &str, provider_id: &str, name: &str| CloudConnection {
        id: id.to_string(),
        provider_id: provider_id.to_string(),
        name: name.to_string(),
        api_key: "replace-me".to_string(),
    };

    ApiSettings {
        cloud_connections: vec![
            cloud(CONN_OPENAI, "openai", "OpenAI (default)"),
            cloud(CONN_GOOGLE, "google", "Google AI (default)"),
            cloud(CONN_ANTHROPIC, "anthropic", "Anthropic (default)"),
            cloud(CONN_GROQ, "groq", "Groq (default)"),
        ],
        local_provider_connections: vec![LocalProviderConnection {
            id: CONN_OLLAMA.to_string(),
            provider_id: "ollama".to_string(),
            name: "Local Ollama".to_string(),
            url: "http://localhost:11434".to_string(),
        }],
        global_embedding: EmbeddingSettings {
            provider_id: "ollama".to_string(),
            model: "llama3-8b".to_string(),
            connection_id: Some(CONN_OLLAMA.to_string()),
        },
        api_port: 8000,
        webhook_url: None,
    }
}
