//! Provider validation: is a unit fully configured to run?
//!
//! One function backs both call sites — the standard workflow's strict
//! pre-flight over the critical units, and the diagnostic sweep over every
//! unit — so the two can never diverge in what they consider misconfigured.

use crate::catalog::{self};
use crate::shared::{ApiSettings, CloudConnection, LocalProviderConnection, Provider, ProviderType, Unit};
use thiserror::Error;

/// Why a unit failed provider validation. Display text is user-facing: it is
/// embedded verbatim in pre-flight errors and diagnostic report lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("no LLM provider selected")]
    MissingProvider,
    #[error("no model selected")]
    MissingModel,
    #[error("unknown provider id \"{0}\"")]
    UnknownProvider(String),
    #[error("missing or invalid cloud connection")]
    MissingCloudConnection,
    #[error("missing or invalid local connection")]
    MissingLocalConnection,
}

/// Validates a unit's provider configuration, short-circuiting on the first
/// failure. Check order: provider selected, model selected, provider known,
/// then a matching connection for cloud/local providers. Local-embedded
/// providers need no connection.
pub fn validate_unit_provider(
    unit: &Unit,
    provider_catalog: &[Provider],
    cloud_connections: &[CloudConnection],
    local_connections: &[LocalProviderConnection],
) -> Result<(), ValidationIssue> {
    let provider_ref = &unit.llm_provider;

    if provider_ref.provider_id.trim().is_empty() {
        return Err(ValidationIssue::MissingProvider);
    }
    if provider_ref.model.trim().is_empty() {
        return Err(ValidationIssue::MissingModel);
    }

    let provider = catalog::find_provider(provider_catalog, &provider_ref.provider_id)
        .ok_or_else(|| ValidationIssue::UnknownProvider(provider_ref.provider_id.clone()))?;

    match provider.provider_type {
        ProviderType::Cloud => {
            let resolved = provider_ref
                .connection_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .is_some_and(|id| cloud_connections.iter().any(|c| c.id == id));
            if !resolved {
                return Err(ValidationIssue::MissingCloudConnection);
            }
        }
        ProviderType::Local => {
            let resolved = provider_ref
                .connection_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .is_some_and(|id| local_connections.iter().any(|c| c.id == id));
            if !resolved {
                return Err(ValidationIssue::MissingLocalConnection);
            }
        }
        ProviderType::LocalEmbedded => {}
    }

    Ok(())
}

/// Convenience wrapper: validate against the built-in catalog and the
/// connection lists in a settings snapshot.
pub fn validate_against_settings(unit: &Unit, settings: &ApiSettings) -> Result<(), ValidationIssue> {
    validate_unit_provider(
        unit,
        catalog::llm_providers(),
        &settings.cloud_connections,
        &settings.local_provider_connections,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{LlmProviderRef, Model, UnitType};

    fn unit_with(provider_id: &str, model: &str, connection_id: Option<&str>) -> Unit {
        Unit {
            id: "u1".to_string(),
            name: "Test Unit".to_string(),
            unit_type: UnitType::Standard,
            purpose: String::new(),
            is_loop_open: true,
            llm_provider: LlmProviderRef {
                provider_id: provider_id.to_string(),
                model: model.to_string(),
                connection_id: connection_id.map(str::to_string),
            },
        }
    }

    fn catalog() -> Vec<Provider> {
        vec![
            Provider {
                id: "anthropic".to_string(),
                name: "Anthropic".to_string(),
                provider_type: ProviderType::Cloud,
                models: vec![Model {
                    id: "claude-3-opus".to_string(),
                    name: "Claude 3 Opus".to_string(),
                }],
            },
            Provider {
                id: "ollama".to_string(),
                name: "Ollama".to_string(),
                provider_type: ProviderType::Local,
                models: Vec::new(),
            },
            Provider {
                id: "embedded".to_string(),
                name: "Embedded".to_string(),
                provider_type: ProviderType::LocalEmbedded,
                models: Vec::new(),
            },
        ]
    }

    fn cloud_conn(id: &str) -> CloudConnection {
        CloudConnection {
            id: id.to_string(),
            provider_id: "anthropic".to_string(),
            name: "work".to_string(),
            api_key: "sk-test".to_string(),
        }
    }

    fn local_conn(id: &str) -> LocalProviderConnection {
        LocalProviderConnection {
            id: id.to_string(),
            provider_id: "ollama".to_string(),
            name: "workstation".to_string(),
            url: "http://localhost:11434".to_string(),
        }
    }

    #[test]
    fn check_order_short_circuits() {
        let catalog = catalog();
        // No provider at all: first failure wins even though everything else
        // is also missing.
        let unit = unit_with("", "", None);
        assert_eq!(
            validate_unit_provider(&unit, &catalog, &[], &[]),
            Err(ValidationIssue::MissingProvider)
        );

        let unit = unit_with("anthropic", "", None);
        assert_eq!(
            validate_unit_provider(&unit, &catalog, &[], &[]),
            Err(ValidationIssue::MissingModel)
        );

        let unit = unit_with("mystery", "some-model", None);
        assert_eq!(
            validate_unit_provider(&unit, &catalog, &[], &[]),
            Err(ValidationIssue::UnknownProvider("mystery".to_string()))
        );
    }

    #[test]
    fn cloud_provider_requires_matching_connection() {
        let catalog = catalog();
        let no_conn = unit_with("anthropic", "claude-3-opus", None);
        assert_eq!(
            validate_unit_provider(&no_conn, &catalog, &[cloud_conn("conn-1")], &[]),
            Err(ValidationIssue::MissingCloudConnection)
        );

        let stale = unit_with("anthropic", "claude-3-opus", Some("conn-deleted"));
        assert_eq!(
            validate_unit_provider(&stale, &catalog, &[cloud_conn("conn-1")], &[]),
            Err(ValidationIssue::MissingCloudConnection)
        );

        let ok = unit_with("anthropic", "claude-3-opus", Some("conn-1"));
        assert_eq!(
            validate_unit_provider(&ok, &catalog, &[cloud_conn("conn-1")], &[]),
            Ok(())
        );
    }

    #[test]
    fn local_provider_requires_matching_connection() {
        let catalog = catalog();
        let missing = unit_with("ollama", "llama3-8b", Some("gone"));
        assert_eq!(
            validate_unit_provider(&missing, &catalog, &[], &[local_conn("conn-ollama")]),
            Err(ValidationIssue::MissingLocalConnection)
        );

        let ok = unit_with("ollama", "llama3-8b", Some("conn-ollama"));
        assert_eq!(
            validate_unit_provider(&ok, &catalog, &[], &[local_conn("conn-ollama")]),
            Ok(())
        );
    }

    #[test]
    fn local_embedded_needs_no_connection() {
        let catalog = catalog();
        let unit = unit_with("embedded", "xenova-reranker", None);
        assert_eq!(validate_unit_provider(&unit, &catalog, &[], &[]), Ok(()));
    }
}
