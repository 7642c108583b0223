//! Standard conversation workflow: pre-flight validation, then the fixed
//! stage pipeline from sensory preprocessing through the closing history log.
//!
//! Implemented as an explicit state machine: [`StandardStage`] names each
//! stage and `Runner::step` advances one stage at a time, so ordering is
//! total and auditable. Critical resolutions (Admin Manager, Lead Thinker /
//! Thought Room, Chief Arbiter / Sanctions Room) abort with a
//! [`ConfigurationError`]; every other branch prerequisite is optional and
//! its absence silently skips that branch's side effects.

use super::clock::Clock;
use super::context::WorkingContext;
use super::delays;
use super::triggers::{self, Trigger};
use super::ConfigurationError;
use crate::directory::RoomDirectory;
use crate::shared::{
    ApiSettings, AudioAnalysis, ChatFile, ChatMessage, ImageAnalysis, Room, WordTimestamp,
    WorkflowResult,
};
use crate::validation::validate_against_settings;
use tracing::debug;

/// Units whose absence or misconfiguration is fatal to this workflow.
pub const CRITICAL_UNITS: [&str; 4] = [
    "Admin Manager",
    "Lead Thinker",
    "Chief Arbiter",
    "Chat Responder",
];

const ROOM_VISUAL: &str = "Visual Room";
const ROOM_SOUND: &str = "Sound Room";
const ROOM_THOUGHT: &str = "Thought Room";
const ROOM_SANCTIONS: &str = "Sanctions Room";

/// Fixed visual-consortium output for an attached image.
pub const IMAGE_DESCRIPTION: &str =
    "A snow-covered field at dusk, with a snowman standing beside a large open fire.";
pub const SCENE_RELATIONSHIPS: &str =
    "A snowman is sitting dangerously close to a large, burning fire.";

/// Fixed transcription produced for any attached recording.
pub const TRANSCRIPTION: &str = "Hello coalition, please summarize my schedule for today.";

/// Synthetic duration assigned to each transcribed word.
pub const WORD_DURATION_SECS: f64 = 0.35;

const PRIOR_CONTEXT_NOTE: &str =
    " [Context: relevant prior conversation retrieved by the Chat Historian.]";
const IMAGE_CONFIRMATION: &str =
    "I have generated the image you requested. You can view it above.";
const GENERIC_COMPLETION: &str =
    "The coalition has completed its analysis of your request. Let me know if you need anything else.";

// 1x1 transparent PNG and a 44-byte silent WAV, as data URIs.
const PNG_PLACEHOLDER: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";
const WAV_PLACEHOLDER: &str =
    "data:audio/wav;base64,UklGRiQAAABXQVZFZm10IBAAAAABAAEAQB8AAIA+AAACABAAZGF0YQAAAAA=";

fn weather_annotation(location: &str) -> String {
    format!(" [Live weather data for {location}: 25\u{b0}C, sunny, light northwest breeze.]")
}

fn weather_report(location: &str) -> String {
    format!(
        "The current weather in {location} is 25\u{b0}C and sunny, with a light breeze from the northwest."
    )
}

/// Contiguous, monotonically increasing word timeline for a transcription.
fn word_timestamps(transcription: &str) -> Vec<WordTimestamp> {
    transcription
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let start_secs = i as f64 * WORD_DURATION_SECS;
            WordTimestamp {
                word: word.to_string(),
                start_secs,
                end_secs: start_secs + WORD_DURATION_SECS,
            }
        })
        .collect()
}

/// Stage names of the standard workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardStage {
    Preflight,
    Intake,
    Sensory,
    ContextRetrieval,
    PlanningIntake,
    KnowledgeAugmentation,
    PlanSynthesis,
    Sanctioning,
    ImageGeneration,
    ResponseSynthesis,
    ClosingLog,
    Done,
}

pub(super) async fn run(
    message: &ChatMessage,
    rooms: &[Room],
    settings: &ApiSettings,
    clock: &dyn Clock,
) -> Result<WorkflowResult, ConfigurationError> {
    let has_audio = message.files.iter().any(ChatFile::is_audio);
    let mut runner = Runner {
        dir: RoomDirectory::index(rooms),
        settings,
        message,
        clock,
        ctx: WorkingContext::new(&message.text, has_audio),
    };

    let mut stage = StandardStage::Preflight;
    while stage != StandardStage::Done {
        debug!("[WORKFLOW] entering stage {stage:?}");
        stage = runner.step(stage).await?;
    }
    Ok(runner.into_result())
}

struct Runner<'a> {
    dir: RoomDirectory<'a>,
    settings: &'a ApiSettings,
    message: &'a ChatMessage,
    clock: &'a dyn Clock,
    ctx: WorkingContext,
}

impl<'a> Runner<'a> {
    async fn step(&mut self, stage: StandardStage) -> Result<StandardStage, ConfigurationError> {
        use StandardStage::*;
        Ok(match stage {
            Preflight => {
                self.preflight()?;
                Intake
            }
            Intake => {
                self.intake().await?;
                Sensory
            }
            Sensory => {
                self.sensory().await;
                ContextRetrieval
            }
            ContextRetrieval => {
                self.context_retrieval().await;
                PlanningIntake
            }
            PlanningIntake => {
                self.planning_intake().await?;
                KnowledgeAugmentation
            }
            KnowledgeAugmentation => {
                self.knowledge_augmentation().await;
                PlanSynthesis
            }
            PlanSynthesis => {
                self.plan_synthesis().await;
                Sanctioning
            }
            Sanctioning => {
                self.sanctioning().await?;
                ImageGeneration
            }
            ImageGeneration => {
                self.image_generation().await;
                ResponseSynthesis
            }
            ResponseSynthesis => {
                self.response_synthesis().await;
                ClosingLog
            }
            ClosingLog => {
                self.closing_log().await;
                Done
            }
            Done => Done,
        })
    }

    /// Stage 0: strict validation of every critical unit before any simulated
    /// work is spent. Produces no participants.
    fn preflight(&self) -> Result<(), ConfigurationError> {
        for name in CRITICAL_UNITS {
            let unit = self
                .dir
                .find_unit(name)
                .ok_or_else(|| ConfigurationError::MissingCriticalUnit(name.to_string()))?;
            validate_against_settings(unit, self.settings).map_err(|issue| {
                ConfigurationError::MisconfiguredUnit {
                    unit: name.to_string(),
                    issue,
                }
            })?;
        }
        Ok(())
    }

    /// Stage 1: the Admin Manager receives the message and routes it.
    async fn intake(&mut self) -> Result<(), ConfigurationError> {
        let admin = self
            .dir
            .find_unit("Admin Manager")
            .ok_or_else(|| ConfigurationError::MissingCriticalUnit("Admin Manager".to_string()))?;
        self.ctx.record(&admin.id);
        self.clock.suspend(delays::ROUTING).await;
        Ok(())
    }

    /// Stage 2: sensory preprocessing. Image and audio branches are mutually
    /// exclusive; an attached image wins over an attached audio file.
    async fn sensory(&mut self) {
        if self.message.files.iter().any(ChatFile::is_image) {
            self.sensory_image().await;
        } else if self.ctx.has_audio_attachment {
            self.sensory_audio().await;
        }
    }

    async fn sensory_image(&mut self) {
        let Some(room) = self.dir.find_room(ROOM_VISUAL) else {
            return;
        };
        let Some(art) = room.units.iter().find(|u| u.name == "Art Director") else {
            return;
        };
        self.ctx.record(&art.id);
        self.clock.suspend(delays::UNIT_ANALYSIS).await;

        // Layered analysis by the rest of the visual consortium.
        for unit in &room.units {
            if unit.is_loop_open
                && unit.name != "Art Director"
                && unit.name != "Image Generation Specialist"
            {
                self.ctx.record(&unit.id);
                self.clock.suspend(delays::UNIT_ANALYSIS).await;
            }
        }

        self.ctx.image_analysis = Some(ImageAnalysis {
            description: IMAGE_DESCRIPTION.to_string(),
            scene_relationships: SCENE_RELATIONSHIPS.to_string(),
            image_generated: false,
        });
        self.ctx.working_text = format!(
            "[Image analysis: {IMAGE_DESCRIPTION}] {}",
            self.ctx.working_text
        );
        self.clock.suspend(delays::UNIT_ANALYSIS).await;
    }

    async fn sensory_audio(&mut self) {
        let Some(room) = self.dir.find_room(ROOM_SOUND) else {
            return;
        };
        let Some(director) = room.units.iter().find(|u| u.name == "Audio Director") else {
            return;
        };
        self.ctx.record(&director.id);
        self.clock.suspend(delays::UNIT_ANALYSIS).await;

        let Some(transcriber) = room
            .units
            .iter()
            .find(|u| u.name == "Speech-to-Text Transcriber")
        else {
            return;
        };
        self.clock.suspend(delays::TRANSCRIPTION).await;
        self.ctx.record(&transcriber.id);
        self.ctx.audio_analysis = Some(AudioAnalysis {
            transcription: TRANSCRIPTION.to_string(),
            word_timestamps: word_timestamps(TRANSCRIPTION),
            tts_generated: false,
        });
        self.ctx.working_text = format!(
            "[Voice transcription: {TRANSCRIPTION}] {}",
            self.ctx.working_text
        );
        self.clock.suspend(delays::UNIT_ANALYSIS).await;
    }

    /// Stage 3: librarian and historian attach prior conversation context.
    async fn context_retrieval(&mut self) {
        let (Some(librarian), Some(historian)) = (
            self.dir.find_unit("Head Librarian"),
            self.dir.find_unit("Chat Historian"),
        ) else {
            return;
        };
        self.ctx.record(&librarian.id);
        self.clock.suspend(delays::CONTEXT_FETCH).await;
        self.ctx.record(&historian.id);
        self.clock.suspend(delays::CONTEXT_FETCH).await;
        self.ctx.working_text.push_str(PRIOR_CONTEXT_NOTE);
        self.ctx.historian_id = Some(historian.id.clone());
    }

    /// Stage 4: the Lead Thinker takes over planning. Critical.
    async fn planning_intake(&mut self) -> Result<(), ConfigurationError> {
        let room = self
            .dir
            .find_room(ROOM_THOUGHT)
            .ok_or_else(|| ConfigurationError::MissingRoom(ROOM_THOUGHT.to_string()))?;
        let thinker = room
            .units
            .iter()
            .find(|u| u.name == "Lead Thinker")
            .ok_or_else(|| ConfigurationError::MissingCriticalUnit("Lead Thinker".to_string()))?;
        self.ctx.record(&thinker.id);
        self.clock.suspend(delays::PLANNING).await;
        Ok(())
    }

    /// Stage 5: external knowledge augmentation (weather scrape).
    async fn knowledge_augmentation(&mut self) {
        if !Trigger::Weather.matches(&self.ctx.working_text) {
            return;
        }
        let (Some(explorer), Some(weather)) = (
            self.dir.find_unit("Chief Explorer"),
            self.dir.find_unit("Weather Unit"),
        ) else {
            return;
        };
        let location = triggers::weather_location(&self.ctx.working_text);
        self.ctx.record(&explorer.id);
        self.clock.suspend(delays::CONTEXT_FETCH).await;
        self.ctx.record(&weather.id);
        self.clock.suspend(delays::SCRAPE).await;
        self.ctx.working_text.push_str(&weather_annotation(&location));
        self.ctx.weather_fired = true;
        self.ctx.weather_location = Some(location);
    }

    /// Stage 6: every open-loop Thought Room specialist weighs in, then one
    /// synthesis pass.
    async fn plan_synthesis(&mut self) {
        if let Some(room) = self.dir.find_room(ROOM_THOUGHT) {
            for unit in &room.units {
                if unit.is_loop_open && unit.name != "Lead Thinker" {
                    self.ctx.record(&unit.id);
                    self.clock.suspend(delays::UNIT_ANALYSIS).await;
                }
            }
        }
        self.clock.suspend(delays::PLAN_SYNTHESIS).await;
    }

    /// Stage 7: sanctioning by the Chief Arbiter. Critical.
    async fn sanctioning(&mut self) -> Result<(), ConfigurationError> {
        let room = self
            .dir
            .find_room(ROOM_SANCTIONS)
            .ok_or_else(|| ConfigurationError::MissingRoom(ROOM_SANCTIONS.to_string()))?;
        let arbiter = room
            .units
            .iter()
            .find(|u| u.name == "Chief Arbiter")
            .ok_or_else(|| ConfigurationError::MissingCriticalUnit("Chief Arbiter".to_string()))?;
        self.ctx.record(&arbiter.id);
        self.clock.suspend(delays::SANCTION).await;
        Ok(())
    }

    /// Stage 8: image generation when the working text asks for it.
    async fn image_generation(&mut self) {
        if !Trigger::ImageGen.matches(&self.ctx.working_text) {
            return;
        }
        let (Some(art), Some(specialist)) = (
            self.dir.find_unit("Art Director"),
            self.dir.find_unit("Image Generation Specialist"),
        ) else {
            return;
        };
        self.ctx.record(&art.id);
        self.clock.suspend(delays::UNIT_ANALYSIS).await;
        self.ctx.record(&specialist.id);
        self.clock.suspend(delays::IMAGE_GENERATION).await;

        self.ctx.generated_image = Some(ChatFile {
            name: "generated-image.png".to_string(),
            mime_type: "image/png".to_string(),
            content: PNG_PLACEHOLDER.to_string(),
        });
        self.ctx
            .image_analysis
            .get_or_insert_with(ImageAnalysis::default)
            .image_generated = true;
        self.ctx.image_gen_fired = true;
    }

    /// Stage 9: response synthesis. An audio attachment on the original
    /// message takes priority: the reply is spoken and the text left empty.
    async fn response_synthesis(&mut self) {
        if self.ctx.has_audio_attachment {
            if let Some(tts) = self.dir.find_unit("Text-to-Speech Synthesizer") {
                self.ctx.record(&tts.id);
                self.clock.suspend(delays::TTS_SYNTHESIS).await;
                self.ctx.generated_audio = Some(ChatFile {
                    name: "coalition-response.wav".to_string(),
                    mime_type: "audio/wav".to_string(),
                    content: WAV_PLACEHOLDER.to_string(),
                });
                self.ctx
                    .audio_analysis
                    .get_or_insert_with(AudioAnalysis::default)
                    .tts_generated = true;
                self.ctx.response_text = Some(String::new());
                return;
            }
            // No synthesizer available: fall back to the written reply.
        }

        if let Some(responder) = self.dir.find_unit("Chat Responder") {
            self.ctx.record(&responder.id);
            self.clock.suspend(delays::RESPONSE).await;
            let text = if self.ctx.image_gen_fired {
                IMAGE_CONFIRMATION.to_string()
            } else if self.ctx.weather_fired {
                let location = self
                    .ctx
                    .weather_location
                    .as_deref()
                    .unwrap_or("the requested location");
                weather_report(location)
            } else {
                GENERIC_COMPLETION.to_string()
            };
            self.ctx.response_text = Some(text);
        }
    }

    /// Stage 10: the historian's second, distinct participation — the write
    /// pass closing the log it opened in context retrieval.
    async fn closing_log(&mut self) {
        if let Some(historian_id) = self.ctx.historian_id.clone() {
            self.ctx.record(&historian_id);
            self.clock.suspend(delays::CLOSING_LOG).await;
        }
    }

    fn into_result(self) -> WorkflowResult {
        WorkflowResult {
            response_text: self.ctx.response_text.unwrap_or_default(),
            participant_unit_ids: self.ctx.participants,
            generated_image: self.ctx.generated_image,
            generated_audio: self.ctx.generated_audio,
            image_analysis: self.ctx.image_analysis,
            audio_analysis: self.ctx.audio_analysis,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::workflow::clock::InstantClock;

    fn text_msg(text: &str) -> ChatMessage {
        ChatMessage::user(text, Vec::new())
    }

    fn image_file() -> ChatFile {
        ChatFile {
            name: "photo.png".to_string(),
            mime_type: "image/png".to_string(),
            content: "data:image/png;base64,AAAA".to_string(),
        }
    }

    fn audio_file() -> ChatFile {
        ChatFile {
            name: "recording.webm".to_string(),
            mime_type: "audio/webm".to_string(),
            content: "data:audio/webm;base64,AAAA".to_string(),
        }
    }

    async fn run_ok(message: &ChatMessage, rooms: &[Room]) -> WorkflowResult {
        let settings = bootstrap::initial_settings();
        run(message, rooms, &settings, &InstantClock).await.unwrap()
    }

    fn unit_id(rooms: &[Room], name: &str) -> String {
        RoomDirectory::index(rooms)
            .find_unit(name)
            .unwrap()
            .id
            .clone()
    }

    #[tokio::test]
    async fn identical_snapshots_yield_identical_traces() {
        let rooms = bootstrap::initial_rooms();
        let msg = text_msg("What's the weather in Istanbul?");
        let first = run_ok(&msg, &rooms).await;
        let second = run_ok(&msg, &rooms).await;
        assert_eq!(first.participant_unit_ids, second.participant_unit_ids);
        assert_eq!(first.response_text, second.response_text);
    }

    #[tokio::test]
    async fn removing_any_critical_unit_is_terminal() {
        let settings = bootstrap::initial_settings();
        for name in CRITICAL_UNITS {
            let mut rooms = bootstrap::initial_rooms();
            for room in &mut rooms {
                room.units.retain(|u| u.name != name);
            }
            let result =
                run(&text_msg("hello there"), &rooms, &settings, &InstantClock).await;
            let err = result.unwrap_err();
            assert!(err.to_string().contains(name), "error should name {name}");
        }
    }

    #[tokio::test]
    async fn misconfigured_critical_unit_fails_preflight_with_empty_trace() {
        let settings = bootstrap::initial_settings();
        let mut rooms = bootstrap::initial_rooms();
        for room in &mut rooms {
            for unit in &mut room.units {
                if unit.name == "Lead Thinker" {
                    unit.llm_provider.provider_id.clear();
                }
            }
        }
        let err = run(&text_msg("hello"), &rooms, &settings, &InstantClock)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MisconfiguredUnit {
                unit: "Lead Thinker".to_string(),
                issue: crate::validation::ValidationIssue::MissingProvider,
            }
        );

        // The engine surfaces this as error-with-empty-trace.
        let engine = crate::workflow::WorkflowEngine::new(std::sync::Arc::new(InstantClock));
        let result = engine.process(&text_msg("hello"), &rooms, &settings).await;
        assert!(result.error.is_some());
        assert!(result.participant_unit_ids.is_empty());
        assert!(result.response_text.is_empty());
    }

    #[tokio::test]
    async fn missing_weather_unit_soft_skips_the_branch() {
        let settings = bootstrap::initial_settings();
        let mut rooms = bootstrap::initial_rooms();
        for room in &mut rooms {
            room.units.retain(|u| u.name != "Weather Unit");
        }
        let result = run(
            &text_msg("what is the weather in paris"),
            &rooms,
            &settings,
            &InstantClock,
        )
        .await
        .unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.response_text, GENERIC_COMPLETION);
        assert!(!result.response_text.contains("25\u{b0}C"));
    }

    #[tokio::test]
    async fn weather_scenario_orders_explorer_before_weather_unit() {
        let rooms = bootstrap::initial_rooms();
        let result = run_ok(&text_msg("What's the weather in Istanbul?"), &rooms).await;

        assert!(result.response_text.contains("Istanbul"));
        assert!(result.response_text.contains("25\u{b0}C"));
        assert!(result.response_text.contains("sunny"));

        let explorer = unit_id(&rooms, "Chief Explorer");
        let weather = unit_id(&rooms, "Weather Unit");
        let ids = &result.participant_unit_ids;
        let explorer_pos = ids.iter().position(|id| *id == explorer).unwrap();
        assert_eq!(ids.get(explorer_pos + 1), Some(&weather));
    }

    #[tokio::test]
    async fn image_attachment_runs_the_visual_consortium() {
        let rooms = bootstrap::initial_rooms();
        let msg = ChatMessage::user("what do you see?", vec![image_file()]);
        let result = run_ok(&msg, &rooms).await;

        let analysis = result.image_analysis.unwrap();
        assert!(!analysis.description.is_empty());
        assert!(!analysis.image_generated);

        let art = unit_id(&rooms, "Art Director");
        let scene = unit_id(&rooms, "Scene Relationship Analyst");
        let ids = &result.participant_unit_ids;
        let art_pos = ids.iter().position(|id| *id == art).unwrap();
        let scene_pos = ids.iter().position(|id| *id == scene).unwrap();
        assert!(art_pos < scene_pos);

        // The generation specialist analyzes nothing on the input path.
        let specialist = unit_id(&rooms, "Image Generation Specialist");
        assert!(!ids.contains(&specialist));
    }

    #[tokio::test]
    async fn audio_reply_takes_priority_but_image_generation_still_runs() {
        let rooms = bootstrap::initial_rooms();
        let msg = ChatMessage::user("please draw a snowman", vec![audio_file()]);
        let result = run_ok(&msg, &rooms).await;

        // Spoken response: empty text, generated audio present.
        assert!(result.response_text.is_empty());
        let audio = result.generated_audio.unwrap();
        assert!(audio.mime_type.starts_with("audio/"));

        // Independent slot: the requested image is still rendered.
        let image = result.generated_image.unwrap();
        assert_eq!(image.mime_type, "image/png");

        let analysis = result.audio_analysis.unwrap();
        assert!(analysis.tts_generated);
        assert!(result.image_analysis.unwrap().image_generated);
        assert!(!analysis.transcription.is_empty());
    }

    #[tokio::test]
    async fn word_timestamps_are_monotonic_and_non_overlapping() {
        let rooms = bootstrap::initial_rooms();
        let msg = ChatMessage::user("", vec![audio_file()]);
        let result = run_ok(&msg, &rooms).await;

        let analysis = result.audio_analysis.unwrap();
        assert!(!analysis.transcription.is_empty());
        assert!(!analysis.word_timestamps.is_empty());
        let mut previous_end = 0.0_f64;
        for ts in &analysis.word_timestamps {
            assert!(ts.start_secs < ts.end_secs);
            assert!(ts.start_secs >= previous_end);
            previous_end = ts.end_secs;
        }
    }

    #[tokio::test]
    async fn historian_is_recorded_twice_and_duplicates_survive() {
        let rooms = bootstrap::initial_rooms();
        let result = run_ok(&text_msg("tell me a story"), &rooms).await;

        let historian = unit_id(&rooms, "Chat Historian");
        let count = result
            .participant_unit_ids
            .iter()
            .filter(|id| **id == historian)
            .count();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn missing_tts_falls_back_to_written_reply() {
        let settings = bootstrap::initial_settings();
        let mut rooms = bootstrap::initial_rooms();
        for room in &mut rooms {
            room.units.retain(|u| u.name != "Text-to-Speech Synthesizer");
        }
        let msg = ChatMessage::user("", vec![audio_file()]);
        let result = run(&msg, &rooms, &settings, &InstantClock).await.unwrap();
        assert!(result.generated_audio.is_none());
        assert_eq!(result.response_text, GENERIC_COMPLETION);
    }

    #[tokio::test]
    async fn image_generation_from_text_confirms_and_attaches_file() {
        let rooms = bootstrap::initial_rooms();
        let result = run_ok(&text_msg("Generate an image of a lighthouse"), &rooms).await;

        assert_eq!(result.response_text, IMAGE_CONFIRMATION);
        assert!(result.generated_image.is_some());
        assert!(result.image_analysis.unwrap().image_generated);

        let rooms2 = bootstrap::initial_rooms();
        let specialist = unit_id(&rooms2, "Image Generation Specialist");
        assert!(result.participant_unit_ids.contains(&specialist));
    }
}
