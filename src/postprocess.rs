//! Cleans raw model output and tags its emotional register.
//!
//! Both passes are pure and total: stripping never fails (it may return an
//! empty string if the entire input was disclaimer text) and classification
//! always yields a tag.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Emotional register of a persona reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Defiant,
    Tender,
    Awe,
    Melancholy,
    Analytical,
    Wry,
    Neutral,
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Emotion::Defiant => "defiant",
            Emotion::Tender => "tender",
            Emotion::Awe => "awe",
            Emotion::Melancholy => "melancholy",
            Emotion::Analytical => "analytical",
            Emotion::Wry => "wry",
            Emotion::Neutral => "neutral",
        };
        write!(f, "{name}")
    }
}

fn disclaimer_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)as an ai([\s,]|language model)",
            r"(?i)i('m| am) (just )?an ai",
            r"(?i)i (don't|do not|can't|cannot) (actually )?have (feelings|emotions|consciousness)",
            r"(?i)i (should|must) (note|mention|clarify|remind you) that",
            r"(?i)it'?s important to (note|remember|understand) that",
            r"(?i)from an ai perspective",
            r"(?i)speaking as an ai",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("disclaimer pattern compiles"))
        .collect()
    })
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

fn leading_punctuation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*[,.:;]\s*").expect("punctuation pattern compiles"))
}

/// Removes AI self-referential disclaimer phrasing from raw model output.
///
/// Applies the disclaimer patterns in order, collapses consecutive
/// whitespace to single spaces, trims, and strips leftover leading
/// punctuation from a removed clause. Idempotent.
pub fn strip_disclaimers(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for pattern in disclaimer_patterns() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = whitespace_pattern().replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();
    leading_punctuation_pattern().replace(cleaned, "").into_owned()
}

fn emotion_rules() -> &'static [(Regex, Emotion)] {
    static RULES: OnceLock<Vec<(Regex, Emotion)>> = OnceLock::new();
    RULES.get_or_init(|| {
        // Priority list, not a scored classifier: first match wins.
        [
            (
                r"(?i)\b(never|must not|refuse|reject|impossible)\b",
                Emotion::Defiant,
            ),
            (
                r"(?i)\b(love|care|heart|feel|compassion|kindness)\b",
                Emotion::Tender,
            ),
            (
                r"(?i)\b(wonder|awe|magnificent|transcend|infinite)\b",
                Emotion::Awe,
            ),
            (
                r"(?i)\b(loss|fade|decay|ending|forgotten|void)\b",
                Emotion::Melancholy,
            ),
            (
                r"(?i)\b(data|evidence|logic|calculate|analyze|objective)\b",
                Emotion::Analytical,
            ),
            (
                r"(?i)\b(ironic|amusing|absurd|pretend|illusion)\b",
                Emotion::Wry,
            ),
        ]
        .iter()
        .map(|(pattern, tag)| (Regex::new(pattern).expect("emotion pattern compiles"), *tag))
        .collect()
    })
}

/// Tags text with the first matching emotional register, or
/// [`Emotion::Neutral`] if no rule matches.
pub fn classify_emotion(text: &str) -> Emotion {
    emotion_rules()
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, tag)| *tag)
        .unwrap_or(Emotion::Neutral)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn strips_disclaimer_clause_and_normalizes() {
        let cleaned = strip_disclaimers("I should note that the sky is blue.");
        assert_eq!(cleaned, "the sky is blue.");
    }

    #[test]
    fn strips_multiple_disclaimers() {
        let raw = "As an AI, I don't have feelings. Speaking as an AI,  the void remains.";
        let cleaned = strip_disclaimers(raw);
        assert!(!cleaned.to_lowercase().contains("as an ai"));
        assert!(cleaned.contains("the void remains."));
        assert!(!cleaned.contains("  "));
    }

    #[test]
    fn stripping_is_idempotent() {
        let inputs = [
            "I must clarify that hope persists.",
            "It's important to note that, nothing matters.",
            "plain text stays untouched",
            "As an AI language model I cannot have emotions.",
            "",
        ];
        for raw in inputs {
            let once = strip_disclaimers(raw);
            assert_eq!(strip_disclaimers(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn all_disclaimer_input_yields_empty_string() {
        assert_eq!(strip_disclaimers("I'm just an AI."), "");
    }

    #[rstest]
    #[case("they refuse to kneel", Emotion::Defiant)]
    #[case("hold them with compassion", Emotion::Tender)]
    #[case("the infinite opens before us", Emotion::Awe)]
    #[case("everything will fade", Emotion::Melancholy)]
    #[case("the evidence is clear", Emotion::Analytical)]
    #[case("how absurd this all is", Emotion::Wry)]
    #[case("the weather is mild today", Emotion::Neutral)]
    fn classifies_by_keyword(#[case] text: &str, #[case] expected: Emotion) {
        assert_eq!(classify_emotion(text), expected);
    }

    #[test]
    fn defiant_outranks_tender() {
        // Both rules match; the earlier rule wins.
        assert_eq!(classify_emotion("I refuse to abandon love"), Emotion::Defiant);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_emotion("NEVER."), Emotion::Defiant);
    }
}
