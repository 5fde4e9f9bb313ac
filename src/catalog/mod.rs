//! Static topic/persona configuration, injected into the orchestrator as an
//! explicit read-only object rather than hidden module-level state.

mod personas;
mod topics;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DialogueError;
use crate::provider::ProviderKind;

/// Disposition of a topic: bright (optimistic), dark (pessimistic), or
/// neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicAlignment {
    Bright,
    Dark,
    Neutral,
}

/// Disposition of a persona. Personas are never neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaAlignment {
    Bright,
    Dark,
}

impl std::fmt::Display for PersonaAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonaAlignment::Bright => write!(f, "bright"),
            PersonaAlignment::Dark => write!(f, "dark"),
        }
    }
}

/// A philosophical "what if" prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub summary: String,
    pub alignment: TopicAlignment,
    /// Ordered provider preferences, strongest first
    pub preferred_providers: Vec<ProviderKind>,
}

/// A fixed character definition adopted by an AI provider for one
/// conversation: a worldview (`seed`) plus voice directives (`style`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub alignment: PersonaAlignment,
    pub seed: String,
    pub style: String,
    /// Ordered provider preferences, strongest first
    pub preferred_providers: Vec<ProviderKind>,
}

/// Read-only topic and persona pools.
///
/// Validated at construction: every persona must list at least one
/// preferred provider (so provider selection never needs a call-time
/// guard) and both persona alignment pools must be populated.
#[derive(Debug, Clone)]
pub struct Catalog {
    topics: Vec<Topic>,
    personas: Vec<Persona>,
}

impl Catalog {
    pub fn new(topics: Vec<Topic>, personas: Vec<Persona>) -> Result<Self, DialogueError> {
        if topics.is_empty() {
            return Err(DialogueError::InvalidCatalog(
                "topic library is empty".to_string(),
            ));
        }
        for persona in &personas {
            if persona.preferred_providers.is_empty() {
                return Err(DialogueError::InvalidCatalog(format!(
                    "persona '{}' lists no preferred providers",
                    persona.id
                )));
            }
        }
        for alignment in [PersonaAlignment::Bright, PersonaAlignment::Dark] {
            if !personas.iter().any(|p| p.alignment == alignment) {
                return Err(DialogueError::InvalidCatalog(format!(
                    "no {alignment} persona in catalog"
                )));
            }
        }
        Ok(Self { topics, personas })
    }

    /// The built-in library: 52 topics and 4 personas.
    pub fn builtin() -> Self {
        Self::new(topics::builtin_topics(), personas::builtin_personas())
            .expect("builtin catalog is valid")
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Look up a topic by id.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Look up a persona by id.
    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Uniform draw from the topic library, optionally filtered by
    /// alignment. A catalog may lack one alignment pool; the draw then
    /// falls back to the full library.
    pub fn pick_topic<R: Rng + ?Sized>(
        &self,
        alignment: Option<TopicAlignment>,
        rng: &mut R,
    ) -> &Topic {
        let pool: Vec<&Topic> = match alignment {
            Some(alignment) => self
                .topics
                .iter()
                .filter(|t| t.alignment == alignment)
                .collect(),
            None => self.topics.iter().collect(),
        };
        match pool.choose(rng).copied() {
            Some(topic) => topic,
            None => self
                .topics
                .choose(rng)
                .expect("topic library is never empty"),
        }
    }

    /// Uniform draw from the personas of one alignment.
    pub fn pick_persona_by_alignment<R: Rng + ?Sized>(
        &self,
        alignment: PersonaAlignment,
        rng: &mut R,
    ) -> &Persona {
        let pool: Vec<&Persona> = self
            .personas
            .iter()
            .filter(|p| p.alignment == alignment)
            .collect();
        pool.choose(rng)
            .copied()
            .expect("alignment pools are validated non-empty")
    }

    /// Pick the persona for a participant conversation: matching alignment
    /// for bright/dark topics, any persona for neutral ones.
    pub fn pick_persona_for_topic<R: Rng + ?Sized>(
        &self,
        topic_alignment: TopicAlignment,
        rng: &mut R,
    ) -> &Persona {
        match topic_alignment {
            TopicAlignment::Neutral => self
                .personas
                .choose(rng)
                .expect("persona pool is validated non-empty"),
            TopicAlignment::Bright => self.pick_persona_by_alignment(PersonaAlignment::Bright, rng),
            TopicAlignment::Dark => self.pick_persona_by_alignment(PersonaAlignment::Dark, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn persona(id: &str, alignment: PersonaAlignment, prefs: Vec<ProviderKind>) -> Persona {
        Persona {
            id: id.to_string(),
            name: format!("The {id}"),
            alignment,
            seed: "seed".to_string(),
            style: "style".to_string(),
            preferred_providers: prefs,
        }
    }

    fn topic(id: &str, alignment: TopicAlignment) -> Topic {
        Topic {
            id: id.to_string(),
            summary: format!("What if {id}?"),
            alignment,
            preferred_providers: vec![ProviderKind::Gpt],
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.personas().len(), 4);
        assert_eq!(catalog.topics().len(), 52);
        assert!(catalog.topic("D1").is_some());
        assert!(catalog.persona("visionary").is_some());
        assert!(catalog.topic("Z9").is_none());
    }

    #[test]
    fn rejects_persona_without_preferences() {
        let personas = vec![
            persona("a", PersonaAlignment::Bright, vec![ProviderKind::Gpt]),
            persona("b", PersonaAlignment::Dark, vec![]),
        ];
        let err = Catalog::new(vec![topic("t", TopicAlignment::Neutral)], personas)
            .expect_err("must reject");
        assert!(matches!(err, DialogueError::InvalidCatalog(_)));
    }

    #[test]
    fn rejects_missing_alignment_pool() {
        let personas = vec![persona(
            "a",
            PersonaAlignment::Bright,
            vec![ProviderKind::Gpt],
        )];
        let err = Catalog::new(vec![topic("t", TopicAlignment::Neutral)], personas)
            .expect_err("must reject");
        assert!(matches!(err, DialogueError::InvalidCatalog(_)));
    }

    #[test]
    fn alignment_filtered_picks_stay_in_pool() {
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let p = catalog.pick_persona_by_alignment(PersonaAlignment::Dark, &mut rng);
            assert_eq!(p.alignment, PersonaAlignment::Dark);
            let t = catalog.pick_topic(Some(TopicAlignment::Bright), &mut rng);
            assert_eq!(t.alignment, TopicAlignment::Bright);
        }
    }

    #[test]
    fn neutral_topic_draws_from_full_persona_pool() {
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen_bright = false;
        let mut seen_dark = false;
        for _ in 0..64 {
            match catalog
                .pick_persona_for_topic(TopicAlignment::Neutral, &mut rng)
                .alignment
            {
                PersonaAlignment::Bright => seen_bright = true,
                PersonaAlignment::Dark => seen_dark = true,
            }
        }
        assert!(seen_bright && seen_dark);
    }

    #[test]
    fn seeded_draws_are_deterministic() {
        let catalog = Catalog::builtin();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                catalog.pick_topic(None, &mut a).id,
                catalog.pick_topic(None, &mut b).id
            );
        }
    }
}
