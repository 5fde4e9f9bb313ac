use serde::{Deserialize, Serialize};

use crate::error::DialogueError;

/// Supported LLM provider backends.
///
/// Each provider maps to exactly one concrete model identifier via
/// [`ProviderKind::default_model`] and to one credential environment
/// variable via [`ProviderKind::env_key`]. Grok is served through
/// OpenRouter's wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "GPT")]
    Gpt,
    Claude,
    Grok,
    Gemini,
}

impl ProviderKind {
    /// The static provider -> model table.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gpt => "gpt-4.1",
            ProviderKind::Claude => "claude-3.5-sonnet",
            ProviderKind::Grok => "grok-beta",
            ProviderKind::Gemini => "gemini-1.5-pro",
        }
    }

    /// Environment variable holding this provider's credential.
    ///
    /// The Google credential additionally falls back to `GEMINI_API_KEY`;
    /// the gateway handles that fallback.
    pub fn env_key(self) -> &'static str {
        match self {
            ProviderKind::Gpt => "OPENAI_API_KEY",
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
            ProviderKind::Grok => "OPENROUTER_API_KEY",
            ProviderKind::Gemini => "GOOGLE_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Gpt => "GPT",
            ProviderKind::Claude => "Claude",
            ProviderKind::Grok => "Grok",
            ProviderKind::Gemini => "Gemini",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DialogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpt" => Ok(ProviderKind::Gpt),
            "claude" => Ok(ProviderKind::Claude),
            "grok" => Ok(ProviderKind::Grok),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(DialogueError::ProviderError(format!(
                "Unknown provider: {s}"
            ))),
        }
    }
}

/// Deterministic provider selection for one persona turn.
///
/// Returns the first entry of `persona_prefs` that also appears in
/// `topic_prefs`; if no overlap exists, the persona's first preference.
/// Persona preference lists are guaranteed non-empty by catalog validation,
/// so the final index cannot panic on a catalog that loaded successfully.
pub fn choose_provider(
    topic_prefs: &[ProviderKind],
    persona_prefs: &[ProviderKind],
) -> ProviderKind {
    for pref in persona_prefs {
        if topic_prefs.contains(pref) {
            return *pref;
        }
    }
    persona_prefs[0]
}
