//! The turn orchestrator: per mode, decides speaking order, builds each
//! speaker's prompt, selects a provider, post-processes the reply, and
//! assembles the resulting messages with enough metadata to resume the
//! conversation later.
//!
//! The orchestrator is stateless and history-driven: each call
//! reconstructs its context from the caller-supplied history, so every
//! turn is fully reproducible from its inputs.


use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Persona, PersonaAlignment, Topic, TopicAlignment};
use crate::chat::{ChatMessage, MessageMeta};
use crate::error::DialogueError;
use crate::gateway::{CallOptions, ChatGateway};
use crate::postprocess::{classify_emotion, strip_disclaimers};
use crate::prompt::build_system_prompt;
use crate::provider::{choose_provider, ProviderKind};

/// Conversation topology, fixed for a conversation and supplied on every
/// request rather than inferred from history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two AI personas debate each other
    Observer,
    /// User plus one AI persona
    Participant,
    /// User plus two opposing AI personas
    Duel,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Observer => "observer",
            Mode::Participant => "participant",
            Mode::Duel => "duel",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Mode {
    type Err = DialogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observer" => Ok(Mode::Observer),
            "participant" => Ok(Mode::Participant),
            "duel" => Ok(Mode::Duel),
            _ => Err(DialogueError::InvalidMode(s.to_string())),
        }
    }
}

/// Input for one orchestrator invocation.
///
/// History is supplied in full by the caller on every request; there is no
/// server-side session.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub mode: Mode,
    pub topic: Topic,
    pub user_text: Option<String>,
    pub bright_persona: Option<Persona>,
    pub dark_persona: Option<Persona>,
    pub history: Vec<ChatMessage>,
}

impl TurnRequest {
    pub fn new(mode: Mode, topic: Topic) -> Self {
        Self {
            mode,
            topic,
            user_text: None,
            bright_persona: None,
            dark_persona: None,
            history: Vec::new(),
        }
    }

    pub fn user_text(mut self, text: impl Into<String>) -> Self {
        self.user_text = Some(text.into());
        self
    }

    pub fn bright_persona(mut self, persona: Persona) -> Self {
        self.bright_persona = Some(persona);
        self
    }

    pub fn dark_persona(mut self, persona: Persona) -> Self {
        self.dark_persona = Some(persona);
        self
    }

    pub fn history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// One or two new messages plus the providers that produced them, in
/// message order. Transient; never stored by the core.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    pub messages: Vec<ChatMessage>,
    pub using_providers: Vec<ProviderKind>,
}

/// Trailing history entries replayed in observer/duel continuations.
const CONTEXT_WINDOW: usize = 6;

const RESPOND_LINE: &str = "Respond to their opening.";
const CONTINUE_LINE: &str = "Continue the dialogue.";

fn begin_line(topic: &Topic) -> String {
    format!("Begin the dialogue on: \"{}\"", topic.summary)
}

fn explore_line(topic: &Topic) -> String {
    format!("Let's explore: \"{}\"", topic.summary)
}

/// Last `CONTEXT_WINDOW` entries of the history.
fn window(history: &[ChatMessage]) -> &[ChatMessage] {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    &history[start..]
}

/// Maps history into plain role/content pairs, prefixing assistant content
/// with the speaker's display name so the model can distinguish speakers.
fn to_context(history: &[ChatMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|m| {
            let content = match &m.name {
                Some(name) => format!("{name}: {}", m.content),
                None => m.content.clone(),
            };
            ChatMessage {
                role: m.role,
                name: None,
                content,
                meta: None,
            }
        })
        .collect()
}

/// Drives dialogue turns against an injected catalog and gateway.
pub struct Orchestrator {
    catalog: Catalog,
    gateway: Arc<dyn ChatGateway>,
    rng: Mutex<StdRng>,
}

impl Orchestrator {
    pub fn new(catalog: Catalog, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            catalog,
            gateway,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeds persona/topic selection, making random picks reproducible.
    pub fn with_rng_seed(catalog: Catalog, gateway: Arc<dyn ChatGateway>, seed: u64) -> Self {
        Self {
            catalog,
            gateway,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Uniform topic draw for boundary layers starting without a topic id.
    pub fn pick_topic(&self, alignment: Option<TopicAlignment>) -> Topic {
        let mut rng = self.rng.lock().expect("rng lock");
        self.catalog.pick_topic(alignment, &mut *rng).clone()
    }

    /// Produces the first turn of a conversation.
    ///
    /// Observer and duel return two assistant messages, participant one.
    pub async fn start_turn(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        match request.mode {
            Mode::Observer => self.start_observer(request).await,
            Mode::Participant => self.start_participant(request).await,
            Mode::Duel => self.start_duel(request).await,
        }
    }

    /// Produces a follow-up turn from the caller-supplied history.
    pub async fn continue_turn(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        if request.history.is_empty() {
            return Err(DialogueError::MissingHistory);
        }
        match request.mode {
            Mode::Observer => self.continue_observer(request).await,
            Mode::Participant => self.continue_participant(request).await,
            Mode::Duel => self.continue_duel(request).await,
        }
    }

    async fn start_observer(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let bright = self.resolve_persona(request.bright_persona.as_ref(), PersonaAlignment::Bright);
        let dark = self.resolve_persona(request.dark_persona.as_ref(), PersonaAlignment::Dark);

        // Dark topics are opened by the dark persona, everything else by
        // the bright one; the other responds.
        let (opener, responder) = if request.topic.alignment == TopicAlignment::Dark {
            (dark, bright)
        } else {
            (bright, dark)
        };

        let opening = vec![ChatMessage::user()
            .content(begin_line(&request.topic))
            .build()];
        let (first, first_provider) = self.persona_turn(&opener, &request.topic, opening).await;

        // The responder sees the opener's cleaned reply, so this call
        // cannot start until the first completes.
        let exchange = vec![
            ChatMessage::user()
                .content(begin_line(&request.topic))
                .build(),
            ChatMessage::assistant()
                .content(format!("{}: {}", opener.name, first.content))
                .build(),
            ChatMessage::user().content(RESPOND_LINE).build(),
        ];
        let (second, second_provider) = self.persona_turn(&responder, &request.topic, exchange).await;

        Ok(TurnResult {
            messages: vec![first, second],
            using_providers: vec![first_provider, second_provider],
        })
    }

    async fn start_participant(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let persona = match request
            .bright_persona
            .as_ref()
            .or(request.dark_persona.as_ref())
        {
            Some(p) => p.clone(),
            None => {
                let mut rng = self.rng.lock().expect("rng lock");
                self.catalog
                    .pick_persona_for_topic(request.topic.alignment, &mut *rng)
                    .clone()
            }
        };

        let seed_line = request
            .user_text
            .clone()
            .unwrap_or_else(|| explore_line(&request.topic));
        let tail = vec![ChatMessage::user().content(seed_line).build()];
        let (message, provider) = self.persona_turn(&persona, &request.topic, tail).await;

        Ok(TurnResult {
            messages: vec![message],
            using_providers: vec![provider],
        })
    }

    async fn start_duel(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let bright = self.resolve_persona(request.bright_persona.as_ref(), PersonaAlignment::Bright);
        let dark = self.resolve_persona(request.dark_persona.as_ref(), PersonaAlignment::Dark);

        let prompt_line = request
            .user_text
            .clone()
            .unwrap_or_else(|| explore_line(&request.topic));
        let bright_tail = vec![ChatMessage::user().content(prompt_line.clone()).build()];
        let dark_tail = vec![ChatMessage::user().content(prompt_line).build()];

        // Both personas answer the same prompt concurrently. The gateway
        // never fails, so the join only waits for two text results.
        let (bright_turn, dark_turn) = futures::join!(
            self.persona_turn(&bright, &request.topic, bright_tail),
            self.persona_turn(&dark, &request.topic, dark_tail),
        );
        let (bright_message, bright_provider) = bright_turn;
        let (dark_message, dark_provider) = dark_turn;

        Ok(TurnResult {
            messages: vec![bright_message, dark_message],
            using_providers: vec![bright_provider, dark_provider],
        })
    }

    async fn continue_participant(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let assistant_messages: Vec<&ChatMessage> = request
            .history
            .iter()
            .filter(|m| m.is_assistant())
            .collect();
        let expected = assistant_messages
            .last()
            .and_then(|m| m.persona_id())
            .ok_or(DialogueError::MissingPersona(
                "no persona recorded in history",
            ))?;

        let persona = request
            .bright_persona
            .as_ref()
            .or(request.dark_persona.as_ref())
            .filter(|p| p.id == expected)
            .ok_or_else(|| DialogueError::PersonaMismatch {
                expected: expected.to_string(),
            })?
            .clone();

        let mut tail = to_context(&request.history);
        tail.push(
            ChatMessage::user()
                .content(
                    request
                        .user_text
                        .clone()
                        .unwrap_or_else(|| CONTINUE_LINE.to_string()),
                )
                .build(),
        );
        let (message, provider) = self.persona_turn(&persona, &request.topic, tail).await;

        Ok(TurnResult {
            messages: vec![message],
            using_providers: vec![provider],
        })
    }

    async fn continue_observer(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let assistant_messages: Vec<&ChatMessage> = request
            .history
            .iter()
            .filter(|m| m.is_assistant())
            .collect();
        if assistant_messages.len() < 2 {
            return Err(DialogueError::InsufficientHistory(
                "observer continuation requires two prior assistant turns",
            ));
        }
        let last_two = &assistant_messages[assistant_messages.len() - 2..];

        // Alternate back to the earlier of the last two speakers.
        let target = last_two[0]
            .persona_id()
            .ok_or(DialogueError::MissingPersona("cannot find next persona"))?;
        let next = [
            request.bright_persona.as_ref(),
            request.dark_persona.as_ref(),
        ]
        .into_iter()
        .flatten()
        .find(|p| p.id == target)
        .cloned()
        .ok_or(DialogueError::MissingPersona("cannot find next persona"))?;

        let mut tail = to_context(window(&request.history));
        tail.push(ChatMessage::user().content(CONTINUE_LINE).build());
        let (message, provider) = self.persona_turn(&next, &request.topic, tail).await;

        Ok(TurnResult {
            messages: vec![message],
            using_providers: vec![provider],
        })
    }

    async fn continue_duel(&self, request: &TurnRequest) -> Result<TurnResult, DialogueError> {
        let assistant_count = request
            .history
            .iter()
            .filter(|m| m.is_assistant())
            .count();
        if assistant_count < 2 {
            return Err(DialogueError::InsufficientHistory(
                "duel continuation requires two prior assistant turns",
            ));
        }
        let (Some(bright), Some(dark)) = (
            request.bright_persona.as_ref(),
            request.dark_persona.as_ref(),
        ) else {
            return Err(DialogueError::MissingPersona(
                "duel continuation requires both personas",
            ));
        };

        let context = to_context(window(&request.history));
        let prompt_line = request
            .user_text
            .clone()
            .unwrap_or_else(|| CONTINUE_LINE.to_string());

        let mut bright_tail = context.clone();
        bright_tail.push(ChatMessage::user().content(prompt_line.clone()).build());
        let mut dark_tail = context;
        dark_tail.push(ChatMessage::user().content(prompt_line).build());

        let (bright_turn, dark_turn) = futures::join!(
            self.persona_turn(bright, &request.topic, bright_tail),
            self.persona_turn(dark, &request.topic, dark_tail),
        );
        let (bright_message, bright_provider) = bright_turn;
        let (dark_message, dark_provider) = dark_turn;

        Ok(TurnResult {
            messages: vec![bright_message, dark_message],
            using_providers: vec![bright_provider, dark_provider],
        })
    }

    /// One persona speaking once: select provider and model, prepend the
    /// system prompt, call the gateway, post-process, attach metadata.
    /// Selection is recomputed on every turn, never cached.
    async fn persona_turn(
        &self,
        persona: &Persona,
        topic: &Topic,
        tail: Vec<ChatMessage>,
    ) -> (ChatMessage, ProviderKind) {
        let provider = choose_provider(&topic.preferred_providers, &persona.preferred_providers);
        let model = provider.default_model();

        let mut conversation = Vec::with_capacity(tail.len() + 1);
        conversation.push(
            ChatMessage::system()
                .content(build_system_prompt(persona, topic))
                .build(),
        );
        conversation.extend(tail);

        let raw = self
            .gateway
            .chat(provider, model, &conversation, &CallOptions::default())
            .await;
        let cleaned = strip_disclaimers(&raw);
        let emotion = classify_emotion(&cleaned);

        let message = ChatMessage::assistant()
            .name(persona.name.as_str())
            .content(cleaned)
            .meta(MessageMeta {
                persona_id: Some(persona.id.clone()),
                emotion: Some(emotion),
                provider: Some(provider),
                model: Some(model.to_string()),
            })
            .build();
        (message, provider)
    }

    fn resolve_persona(
        &self,
        supplied: Option<&Persona>,
        alignment: PersonaAlignment,
    ) -> Persona {
        match supplied {
            Some(p) => p.clone(),
            None => {
                let mut rng = self.rng.lock().expect("rng lock");
                self.catalog
                    .pick_persona_by_alignment(alignment, &mut *rng)
                    .clone()
            }
        }
    }
}
