//! Debate Orchestration: Primary vs. Adversary Exchange
//!
//! Drives a fixed number of rounds between a chat-completion backend (the
//! primary debater) and a single-prompt backend forced into a contrarian
//! role (the adversary), then asks the primary backend for a neutral verdict.
//!
//! # Debate Flow
//!
//! ```text
//! Seeded → InRound(1) → InRound(2) → … → InRound(max_turns) → Summarizing → Done
//!             │
//!             ├─ primary turn   (system + last 4, escalating temperature)
//!             ├─ pacing delay
//!             └─ adversary turn (flattened last 4 in an attack template)
//!                    └─ on failure → primary mechanism + injected directive
//!
//! any fatal backend or I/O error → Aborted
//! ```

pub mod adapters;
pub mod backend;
pub mod message;
pub mod orchestrator;
pub mod prompts;
pub mod state;
pub mod transcript;

pub use adapters::{AdversaryReply, SamplingPolicy};
pub use backend::{BackendError, ChatBackend, ChatRequest, PromptBackend};
pub use message::{History, HistoryError, Message, Role, Speaker};
pub use orchestrator::{
    DebateConfig, DebateError, DebateObserver, DebateOrchestrator, DebateOutcome, ModelRoster,
};
pub use state::{DebatePhase, DebateSession, DebateTransition, TransitionError};
pub use transcript::{sanitize_topic, TranscriptError, TranscriptLogger};
