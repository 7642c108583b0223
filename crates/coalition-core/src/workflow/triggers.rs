//! Named trigger predicates over free text.
//!
//! Branch selection is deliberate late-binding on hard-coded English
//! substrings, case-insensitively matched. Keeping the predicates here, with
//! their phrase lists, makes them independently testable and swappable for a
//! real intent classifier without touching stage sequencing. No stronger
//! intent detection is attempted: "weather in general" triggers the weather
//! branch, matching existing behavior.

/// Phrases that divert a message into the diagnostic workflow.
pub const DIAGNOSTIC_PHRASES: &[&str] = &["run diagnostics", "system check", "self-diagnostic"];

/// Substring that fires the external weather lookup.
pub const WEATHER_PHRASE: &str = "weather in";

/// Phrases that fire the image-generation branch.
pub const IMAGE_GEN_PHRASES: &[&str] = &["generate an image", "draw a"];

/// Which scripted branch a piece of text asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Diagnostic,
    Weather,
    ImageGen,
}

impl Trigger {
    /// Case-insensitive substring check for this trigger's phrase list.
    pub fn matches(self, text: &str) -> bool {
        let lower = text.to_lowercase();
        match self {
            Trigger::Diagnostic => DIAGNOSTIC_PHRASES.iter().any(|p| lower.contains(p)),
            Trigger::Weather => lower.contains(WEATHER_PHRASE),
            Trigger::ImageGen => IMAGE_GEN_PHRASES.iter().any(|p| lower.contains(p)),
        }
    }
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
/// The needle is ASCII, so a match always lies on char boundaries of the
/// haystack even when it contains multi-byte characters.
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Extracts the location following "weather in", trimmed of trailing
/// punctuation. Falls back to a generic label when the phrase ends the text.
pub fn weather_location(text: &str) -> String {
    let Some(idx) = find_ascii_case_insensitive(text, WEATHER_PHRASE) else {
        return "the requested location".to_string();
    };
    let rest = &text[idx + WEATHER_PHRASE.len()..];
    let location: &str = rest
        .split(['?', '.', '!', ',', '\n'])
        .next()
        .unwrap_or("")
        .trim();
    if location.is_empty() {
        "the requested location".to_string()
    } else {
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_phrases_match_case_insensitively() {
        assert!(Trigger::Diagnostic.matches("Please RUN DIAGNOSTICS now"));
        assert!(Trigger::Diagnostic.matches("could you do a system check?"));
        assert!(!Trigger::Diagnostic.matches("let's discuss system design"));
    }

    #[test]
    fn weather_trigger_is_a_plain_substring() {
        assert!(Trigger::Weather.matches("What's the Weather In Istanbul?"));
        // Known false positive, preserved as existing behavior.
        assert!(Trigger::Weather.matches("thinking about weather in general terms"));
        assert!(!Trigger::Weather.matches("whether in doubt or not"));
    }

    #[test]
    fn image_gen_phrases() {
        assert!(Trigger::ImageGen.matches("please Draw a snowman"));
        assert!(Trigger::ImageGen.matches("can you generate an image of a fox"));
        // Substring matching means "withdraw a card" fires too; that false
        // positive is preserved behavior, so only assert the clean negative.
        assert!(!Trigger::ImageGen.matches("drawing attention to this"));
    }

    #[test]
    fn location_extraction_trims_punctuation() {
        assert_eq!(weather_location("What's the weather in Istanbul?"), "Istanbul");
        assert_eq!(weather_location("weather in Oslo, please"), "Oslo");
        assert_eq!(weather_location("weather in"), "the requested location");
        assert_eq!(weather_location("no trigger here"), "the requested location");
    }

    #[test]
    fn location_extraction_survives_multibyte_text() {
        // 'İ' lowercases to two chars, so byte offsets into a lowercased
        // copy would not map back onto the original text.
        assert_eq!(weather_location("İ weather in Istanbul?"), "Istanbul");
        assert_eq!(weather_location("İ weather in"), "the requested location");
        assert_eq!(weather_location("météo weather in Paris."), "Paris");
        assert_eq!(weather_location("Weather In İzmir?"), "İzmir");
    }
}
