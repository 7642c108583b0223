//! Working context threaded stage-to-stage through the standard workflow.

use crate::shared::{AudioAnalysis, ChatFile, ImageAnalysis};

/// Accumulated state of one standard-workflow invocation: the working text
/// with its annotations, the participant trace, branch flags, and payloads.
/// Each stage reads and extends this instead of mutating shared strings.
#[derive(Debug, Default)]
pub struct WorkingContext {
    /// Message text plus the annotations sensory/context stages prepend or
    /// append. Branch predicates run against this, not the original text.
    pub working_text: String,
    /// Ordered unit-id trace; duplicates preserved.
    pub participants: Vec<String>,
    /// The original message carried an audio attachment (decides the
    /// response-synthesis branch regardless of later text annotations).
    pub has_audio_attachment: bool,
    /// The external-knowledge (weather) branch fired.
    pub weather_fired: bool,
    /// Location extracted when the weather branch fired.
    pub weather_location: Option<String>,
    /// The image-generation branch fired.
    pub image_gen_fired: bool,
    /// Historian id recorded during context retrieval, for the closing
    /// write pass.
    pub historian_id: Option<String>,
    pub image_analysis: Option<ImageAnalysis>,
    pub audio_analysis: Option<AudioAnalysis>,
    pub generated_image: Option<ChatFile>,
    pub generated_audio: Option<ChatFile>,
    pub response_text: Option<String>,
}

impl WorkingContext {
    pub fn new(original_text: &str, has_audio_attachment: bool) -> Self {
        Self {
            working_text: original_text.to_string(),
            has_audio_attachment,
            ..Self::default()
        }
    }

    pub fn record(&mut self, unit_id: &str) {
        self.participants.push(unit_id.to_string());
    }
}
