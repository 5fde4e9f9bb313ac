use thiserror::Error;

/// Error types that can occur when orchestrating a dialogue turn.
///
/// The first five variants are surfaced to the caller as request-level
/// failures. The remaining variants describe provider-call failures; those
/// never escape the gateway, which degrades them into in-universe
/// placeholder text instead.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// Mode string outside the three recognized values
    #[error("Unknown mode: {0}")]
    InvalidMode(String),
    /// Continuation requested with empty history
    #[error("Continuation requires history. Use start_turn for the first turn.")]
    MissingHistory,
    /// Supplied persona does not match the persona recorded in history
    #[error("Persona mismatch: history expects persona '{expected}'")]
    PersonaMismatch { expected: String },
    /// Observer/duel continuation lacking the required prior assistant turns
    #[error("Insufficient history: {0}")]
    InsufficientHistory(&'static str),
    /// Required persona absent or unresolvable
    #[error("Missing persona: {0}")]
    MissingPersona(&'static str),
    /// Catalog failed load-time validation
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Errors returned by the LLM provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// Provider reply carried no usable text
    #[error("{0} returned empty content")]
    EmptyContent(&'static str),
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
}

impl DialogueError {
    /// Whether this error kind is surfaced to the caller as a bad request,
    /// as opposed to an internal failure.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            DialogueError::InvalidMode(_)
                | DialogueError::MissingHistory
                | DialogueError::PersonaMismatch { .. }
                | DialogueError::InsufficientHistory(_)
                | DialogueError::MissingPersona(_)
        )
    }
}

/// Converts reqwest HTTP errors into DialogueErrors
impl From<reqwest::Error> for DialogueError {
    fn from(err: reqwest::Error) -> Self {
        DialogueError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for DialogueError {
    fn from(err: serde_json::Error) -> Self {
        DialogueError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
