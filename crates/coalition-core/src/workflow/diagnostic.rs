//! Diagnostic workflow: sweep every unit in every room through provider
//! validation and report the misconfigured ones, instead of aborting on the
//! first failure the way the standard pre-flight does.

use super::clock::Clock;
use super::delays;
use super::ConfigurationError;
use crate::directory::RoomDirectory;
use crate::shared::{ApiSettings, ChatMessage, Room, WorkflowResult};
use crate::validation::validate_against_settings;
use tracing::{debug, info};

/// Units the diagnostic workflow cannot run without.
const REQUIRED: [&str; 3] = ["Admin Manager", "System Test Unit", "Chat Responder"];

/// Report sentence when the sweep finds nothing wrong.
pub const ALL_CONFIGURED: &str =
    "System check complete. All units in the coalition are fully configured and operational.";

/// Report header when at least one unit needs attention.
pub const ISSUES_HEADER: &str =
    "System check complete. The following units require attention:";

pub(super) async fn run(
    message: &ChatMessage,
    rooms: &[Room],
    settings: &ApiSettings,
    clock: &dyn Clock,
) -> Result<WorkflowResult, ConfigurationError> {
    debug!("[DIAGNOSTIC] sweep requested by message {}", message.id);
    let dir = RoomDirectory::index(rooms);

    let resolve = |name: &str| {
        dir.find_unit(name)
            .ok_or_else(|| ConfigurationError::MissingDiagnosticUnit(name.to_string()))
    };
    let admin = resolve(REQUIRED[0])?;
    let system_test = resolve(REQUIRED[1])?;
    let responder = resolve(REQUIRED[2])?;

    let mut participants = vec![admin.id.clone(), system_test.id.clone()];
    clock.suspend(delays::DIAG_INTAKE).await;

    // Per-unit configuration sweep, rooms then units in order.
    let mut issues: Vec<String> = Vec::new();
    for (room, unit) in dir.all_units() {
        if let Err(issue) = validate_against_settings(unit, settings) {
            // Units are always reached through their room here; the fallback
            // label covers snapshots with detached lookups only.
            let room_label = if room.name.is_empty() {
                "Unknown Room"
            } else {
                room.name.as_str()
            };
            debug!(
                "[DIAGNOSTIC] unit \"{}\" in {room_label} misconfigured: {issue}",
                unit.name
            );
            issues.push(format!(
                "- Unit: \"{}\" (in {})\n  - Issue: {}",
                unit.name, room_label, issue
            ));
        }
        clock.suspend(delays::DIAG_UNIT_CHECK).await;
    }

    // Optional reviewers; absence does not abort the sweep.
    if let Some(comms) = dir.find_unit("Comms Chief") {
        participants.push(comms.id.clone());
    }
    if let Some(arbiter) = dir.find_unit("Chief Arbiter") {
        participants.push(arbiter.id.clone());
    }

    participants.push(responder.id.clone());
    clock.suspend(delays::DIAG_REPORT).await;

    let response_text = if issues.is_empty() {
        ALL_CONFIGURED.to_string()
    } else {
        format!("{ISSUES_HEADER}\n{}", issues.join("\n"))
    };

    info!(
        "[DIAGNOSTIC] sweep finished: {} issue(s) across {} unit(s)",
        issues.len(),
        dir.all_units().count()
    );

    Ok(WorkflowResult {
        response_text,
        participant_unit_ids: participants,
        ..WorkflowResult::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::shared::ChatMessage;
    use crate::workflow::clock::InstantClock;

    fn msg(text: &str) -> ChatMessage {
        ChatMessage::user(text, Vec::new())
    }

    #[tokio::test]
    async fn clean_coalition_reports_success() {
        let rooms = bootstrap::initial_rooms();
        let settings = bootstrap::initial_settings();
        let result = run(&msg("run diagnostics"), &rooms, &settings, &InstantClock)
            .await
            .unwrap();

        assert_eq!(result.response_text, ALL_CONFIGURED);
        assert!(result.error.is_none());

        let dir = RoomDirectory::index(&rooms);
        let admin = dir.find_unit("Admin Manager").unwrap();
        let tester = dir.find_unit("System Test Unit").unwrap();
        assert!(result.participant_unit_ids.contains(&admin.id));
        assert!(result.participant_unit_ids.contains(&tester.id));
    }

    #[tokio::test]
    async fn one_issue_line_per_misconfigured_unit() {
        let mut rooms = bootstrap::initial_rooms();
        let settings = bootstrap::initial_settings();

        // Break exactly two units in different ways.
        rooms[0].units[1].llm_provider.model.clear();
        rooms[2].units[0].llm_provider.provider_id = "nonexistent".to_string();
        let broken_name_a = rooms[0].units[1].name.clone();
        let broken_name_b = rooms[2].units[0].name.clone();

        let result = run(&msg("system check"), &rooms, &settings, &InstantClock)
            .await
            .unwrap();

        let issue_lines: Vec<&str> = result
            .response_text
            .lines()
            .filter(|l| l.starts_with("- Unit:"))
            .collect();
        assert_eq!(issue_lines.len(), 2);
        assert!(result.response_text.starts_with(ISSUES_HEADER));
        assert!(result
            .response_text
            .contains(&format!("- Unit: \"{broken_name_a}\" (in {})", rooms[0].name)));
        assert!(result
            .response_text
            .contains(&format!("- Unit: \"{broken_name_b}\" (in {})", rooms[2].name)));
        assert!(result.response_text.contains("no model selected"));
        assert!(result
            .response_text
            .contains("unknown provider id \"nonexistent\""));
    }

    #[tokio::test]
    async fn missing_required_unit_is_terminal() {
        let mut rooms = bootstrap::initial_rooms();
        let settings = bootstrap::initial_settings();
        for room in &mut rooms {
            room.units.retain(|u| u.name != "System Test Unit");
        }

        let err = run(&msg("run diagnostics"), &rooms, &settings, &InstantClock)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingDiagnosticUnit("System Test Unit".to_string())
        );
    }

    #[tokio::test]
    async fn optional_reviewers_append_before_responder() {
        let rooms = bootstrap::initial_rooms();
        let settings = bootstrap::initial_settings();
        let result = run(&msg("run diagnostics"), &rooms, &settings, &InstantClock)
            .await
            .unwrap();

        let dir = RoomDirectory::index(&rooms);
        let comms = dir.find_unit("Comms Chief").unwrap();
        let arbiter = dir.find_unit("Chief Arbiter").unwrap();
        let responder = dir.find_unit("Chat Responder").unwrap();

        let ids = &result.participant_unit_ids;
        let pos = |id: &str| ids.iter().position(|p| p == id).unwrap();
        assert!(pos(&comms.id) < pos(&arbiter.id));
        assert!(pos(&arbiter.id) < pos(&responder.id));
    }
}
