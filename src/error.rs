// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("server rejected request: {}", message.as_deref().unwrap_or("<no message>"))]
    Rejected { message: Option<String> },

    #[error("{0}")]
    Validation(String),

    #[error("not authenticated, run `carimagang login`")]
    NotAuthenticated,

    #[error("session store error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("page {requested} is outside 1..={last_page}")]
    PageOutOfRange { requested: u32, last_page: u32 },
}

impl ClientError {
    /// Inline text a form or list view shows for this failure.
    ///
    /// Server messages are surfaced verbatim; transport and shape failures collapse
    /// into the flow's generic message.
    pub fn user_message(&self, rejected_fallback: &str, transport_message: &str) -> String {
        match self {
            ClientError::Rejected { message: Some(m) } if !m.is_empty() => m.clone(),
            ClientError::Rejected { .. } => rejected_fallback.to_string(),
            ClientError::Transport(_) | ClientError::Decode(_) => transport_message.to_string(),
            other => other.to_string(),
        }
    }
}

/// Failure of a user-facing flow: the message to display plus what caused it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FlowError {
    pub message: String,
    #[source]
    pub cause: ClientError,
}

impl FlowError {
    pub fn new(cause: ClientError, rejected_fallback: &str, transport_message: &str) -> Self {
        Self {
            message: cause.user_message(rejected_fallback, transport_message),
            cause,
        }
    }

    /// Local validation failure; the message is also the cause.
    pub fn validation(message: &str) -> Self {
        Self {
            message: message.to_string(),
            cause: ClientError::Validation(message.to_string()),
        }
    }
}
