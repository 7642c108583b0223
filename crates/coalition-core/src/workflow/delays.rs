//! Simulated stage latencies. These carry no computation, only the ordering
//! and pacing a real backend would impose; swap the [`super::clock::Clock`]
//! implementation to collapse them.

use std::time::Duration;

/// Admin Manager routing decision.
pub const ROUTING: Duration = Duration::from_millis(600);
/// One specialist unit inspecting the working context.
pub const UNIT_ANALYSIS: Duration = Duration::from_millis(400);
/// Librarian/historian context fetch.
pub const CONTEXT_FETCH: Duration = Duration::from_millis(500);
/// Lead Thinker planning intake.
pub const PLANNING: Duration = Duration::from_millis(700);
/// Weather Unit page scrape.
pub const SCRAPE: Duration = Duration::from_millis(1500);
/// Final plan synthesis pass in the Thought Room.
pub const PLAN_SYNTHESIS: Duration = Duration::from_millis(800);
/// Chief Arbiter sanction review.
pub const SANCTION: Duration = Duration::from_millis(450);
/// Image Generation Specialist render.
pub const IMAGE_GENERATION: Duration = Duration::from_millis(2200);
/// Speech-to-Text transcription pass.
pub const TRANSCRIPTION: Duration = Duration::from_millis(900);
/// Text-to-Speech synthesis.
pub const TTS_SYNTHESIS: Duration = Duration::from_millis(1800);
/// Chat Responder composing the reply.
pub const RESPONSE: Duration = Duration::from_millis(650);
/// Chat Historian write pass.
pub const CLOSING_LOG: Duration = Duration::from_millis(300);

/// Diagnostic intake handoff.
pub const DIAG_INTAKE: Duration = Duration::from_millis(500);
/// Per-unit configuration check during the diagnostic sweep.
pub const DIAG_UNIT_CHECK: Duration = Duration::from_millis(150);
/// Diagnostic report composition.
pub const DIAG_REPORT: Duration = Duration::from_millis(400);
