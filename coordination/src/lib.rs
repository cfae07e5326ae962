//! Debate coordination library
//!
//! Deterministic core of the battleground: everything that decides *what* is
//! sent to each backend and *what* is written to the transcript, with the
//! backends themselves reduced to two single-method traits.
//!
//! - `debate::message`: role-tagged messages and the append-only history store
//! - `debate::adapters`: context windowing and the temperature schedule
//! - `debate::orchestrator`: the round loop and final judgement
//! - `debate::transcript`: the per-run log file
//!
//! The HTTP providers and the CLI live in the `battleground` crate.

#![allow(clippy::uninlined_format_args)]

pub mod debate;

pub use debate::{
    BackendError, ChatBackend, ChatRequest, DebateConfig, DebateError, DebateObserver,
    DebateOrchestrator, DebateOutcome, DebatePhase, History, Message, ModelRoster,
    PromptBackend, Role, SamplingPolicy, Speaker,
};
