//! Static LLM provider catalog.
//!
//! Single source of truth for the providers a unit may select. Connections in
//! [`crate::shared::ApiSettings`] reference these ids; the validator resolves
//! against this table unless a caller supplies its own.

use crate::shared::{Model, Provider, ProviderType};
use once_cell::sync::Lazy;

fn model(id: &str, name: &str) -> Model {
    Model {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn provider(id: &str, name: &str, provider_type: ProviderType, models: Vec<Model>) -> Provider {
    Provider {
        id: id.to_string(),
        name: name.to_string(),
        provider_type,
        models,
    }
}

static LLM_PROVIDERS: Lazy<Vec<Provider>> = Lazy::new(|| {
    vec![
        provider(
            "openai",
            "OpenAI",
            ProviderType::Cloud,
            vec![
                model("gpt-4o", "GPT-4o"),
                model("gpt-4-turbo", "GPT-4 Turbo"),
                model("whisper-1", "Whisper-1"),
                model("tts-1", "TTS-1"),
            ],
        ),
        provider(
            "google",
            "Google AI",
            ProviderType::Cloud,
            vec![
                model("gemini-2.5-flash", "Gemini 2.5 Flash"),
                model("imagen-3.0-generate-002", "Imagen 3"),
            ],
        ),
        provider(
            "anthropic",
            "Anthropic",
            ProviderType::Cloud,
            vec![
                model("claude-3-opus", "Claude 3 Opus"),
                model("claude-3-sonnet", "Claude 3 Sonnet"),
            ],
        ),
        provider(
            "groq",
            "Groq",
            ProviderType::Cloud,
            vec![
                model("llama3-8b", "Llama 3 8B"),
                model("llama3-70b", "Llama 3 70B"),
                model("mixtral-8x7b", "Mixtral 8x7B"),
            ],
        ),
        provider(
            "ollama",
            "Ollama",
            ProviderType::Local,
            vec![
                model("llama3-8b", "Llama 3 8B"),
                model("llava", "LLaVA"),
                model("moondream", "Moondream"),
                model("phi-3-mini", "Phi-3 Mini"),
                model("mistral-7b", "Mistral 7B"),
            ],
        ),
        // Models are managed inside the LM Studio app.
        provider("lmstudio", "LM Studio", ProviderType::Local, Vec::new()),
    ]
});

/// The built-in LLM provider catalog.
pub fn llm_providers() -> &'static [Provider] {
    &LLM_PROVIDERS
}

/// Resolve a provider id within an arbitrary catalog slice.
pub fn find_provider<'a>(catalog: &'a [Provider], provider_id: &str) -> Option<&'a Provider> {
    catalog.iter().find(|p| p.id == provider_id)
}
