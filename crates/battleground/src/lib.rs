//! Battleground: an adversarial dialogue simulator.
//!
//! Wires the `coordination` debate loop to real providers: Groq's
//! OpenAI-compatible chat completions for the primary debater and judge,
//! Google's Gemini `generateContent` for the adversary.

pub mod config;
pub mod console;
pub mod providers;

pub use config::{BattlegroundConfig, ConfigError};
pub use console::ConsoleObserver;
pub use providers::{GeminiClient, GroqClient};
