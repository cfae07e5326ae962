//! Role-tagged messages and the append-only conversation history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat role attached to every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single immutable chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Which side of the debate produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// Chat-completion backend; its replies are stored as `assistant`.
    Primary,
    /// Single-prompt backend; its replies are stored as `user` so the
    /// primary reads them as the other party in the conversation.
    Adversary,
}

impl Speaker {
    /// Role under which this speaker's replies enter the history.
    pub fn history_role(self) -> Role {
        match self {
            Self::Primary => Role::Assistant,
            Self::Adversary => Role::User,
        }
    }

    /// Label used for this speaker's lines in the transcript file.
    pub fn transcript_label(self) -> &'static str {
        match self {
            Self::Primary => "LLAMA",
            Self::Adversary => "GEMINI",
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Primary => Self::Adversary,
            Self::Adversary => Self::Primary,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Adversary => write!(f, "adversary"),
        }
    }
}

/// Error raised when a turn would break strict alternation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("out-of-order turn: expected {expected}, got {actual}")]
pub struct HistoryError {
    pub expected: Speaker,
    pub actual: Speaker,
}

/// Ordered conversation history for one run.
///
/// Index 0 always holds the system instruction and index 1 the opening
/// question. Turns are only ever appended, primary first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    messages: Vec<Message>,
    next_speaker: Speaker,
}

impl History {
    /// Seed a history with the system instruction and the opening question.
    pub fn seeded(
        system_instruction: impl Into<String>,
        opening_question: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![
                Message::system(system_instruction),
                Message::user(opening_question),
            ],
            next_speaker: Speaker::Primary,
        }
    }

    /// Append a debate turn.
    pub fn push_turn(
        &mut self,
        speaker: Speaker,
        content: impl Into<String>,
    ) -> Result<(), HistoryError> {
        if speaker != self.next_speaker {
            return Err(HistoryError {
                expected: self.next_speaker,
                actual: speaker,
            });
        }
        self.messages.push(Message::new(speaker.history_role(), content));
        self.next_speaker = speaker.other();
        Ok(())
    }

    /// Speaker whose turn is next.
    pub fn next_speaker(&self) -> Speaker {
        self.next_speaker
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false once seeded; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The system instruction at index 0.
    pub fn system(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Number of completed rounds (primary + adversary pairs).
    pub fn completed_rounds(&self) -> usize {
        self.messages.len().saturating_sub(2) / 2
    }
}

/// Last `n` messages, or all of them when fewer exist.
pub fn tail(messages: &[Message], n: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(n)..]
}
