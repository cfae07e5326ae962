//! Debate orchestrator: drives the primary→adversary round loop.
//!
//! Ties together the history store, the per-backend adapters, the state
//! machine and the transcript to run a complete debate end-to-end. Calls
//! are strictly sequential; the only suspension points are the backend
//! calls and the pacing delay between the two turns of a round.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::adapters::{self, SamplingPolicy};
use super::backend::{BackendError, ChatBackend, PromptBackend};
use super::message::{History, HistoryError, Speaker};
use super::prompts;
use super::state::{DebatePhase, DebateSession, TransitionError};
use super::transcript::{TranscriptError, TranscriptLogger};

/// Default number of rounds.
pub const DEFAULT_MAX_TURNS: u32 = 6;

/// Default delay between the primary and adversary calls of a round.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1500);

/// Model identifiers for each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoster {
    /// Primary debater turns.
    pub primary: String,
    /// Primary-backend model used when the adversary falls back.
    pub opponent: String,
    /// Adversary backend model.
    pub adversary: String,
    /// Final summary.
    pub judge: String,
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self {
            primary: "llama-3.1-8b-instant".to_string(),
            opponent: "llama-3.1-8b-instant".to_string(),
            adversary: "gemini-2.0-flash".to_string(),
            judge: "llama-3.1-8b-instant".to_string(),
        }
    }
}

/// Configuration for the debate orchestrator.
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Number of rounds to run.
    pub max_turns: u32,
    /// Delay between the two calls of a round.
    pub pacing: Duration,
    pub models: ModelRoster,
    pub sampling: SamplingPolicy,
    /// Directory the transcript file is created in.
    pub output_dir: PathBuf,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            pacing: DEFAULT_PACING,
            models: ModelRoster::default(),
            sampling: SamplingPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Hooks notified as the debate progresses. All methods default to no-ops.
pub trait DebateObserver: Send + Sync {
    fn on_start(&self, _topic: &str) {}
    fn on_round_start(&self, _round: u32) {}
    fn on_turn(&self, _round: u32, _speaker: Speaker, _content: &str) {}
    fn on_summary(&self, _summary: &str) {}
}

/// Error from the debate orchestrator.
#[derive(Debug, Error)]
pub enum DebateError {
    /// A debate turn could not be produced.
    #[error("{speaker} turn failed in round {round}: {source}")]
    Turn {
        round: u32,
        speaker: Speaker,
        #[source]
        source: BackendError,
    },

    /// The judge call failed.
    #[error("judge summary failed: {0}")]
    Summary(#[source] BackendError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// `max_turns` was zero.
    #[error("max_turns must be at least 1")]
    NoRounds,
}

/// Outcome of a completed debate.
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    /// Total rounds executed.
    pub rounds_completed: u32,
    /// Judge verdict.
    pub summary: String,
    /// Where the transcript was written.
    pub transcript_path: PathBuf,
    /// Full history at completion.
    pub history: History,
    /// Adversary turns answered by the fallback path.
    pub fallbacks: u32,
    /// The session snapshot at completion.
    pub session: DebateSession,
}

impl DebateOutcome {
    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "[DONE] {} rounds | {} fallbacks | transcript={}",
            self.rounds_completed,
            self.fallbacks,
            self.transcript_path.display()
        )
    }
}

/// The debate orchestrator.
///
/// Usage:
/// 1. Create with `new()` or `with_config()`
/// 2. Optionally attach an observer with `with_observer()`
/// 3. Call `run()` with the opening question
pub struct DebateOrchestrator<P, A> {
    primary: P,
    adversary: A,
    config: DebateConfig,
    observer: Option<Box<dyn DebateObserver>>,
}

impl<P, A> DebateOrchestrator<P, A>
where
    P: ChatBackend,
    A: PromptBackend,
{
    /// Create a new orchestrator with default config.
    pub fn new(primary: P, adversary: A) -> Self {
        Self::with_config(primary, adversary, DebateConfig::default())
    }

    /// Create a new orchestrator with custom config.
    pub fn with_config(primary: P, adversary: A, config: DebateConfig) -> Self {
        Self {
            primary,
            adversary,
            config,
            observer: None,
        }
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: impl DebateObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Run a full debate on `topic`.
    ///
    /// Any backend failure other than the adversary's recoverable primary
    /// call aborts the run; the transcript keeps whatever was flushed.
    pub async fn run(&self, topic: &str) -> Result<DebateOutcome, DebateError> {
        if self.config.max_turns == 0 {
            return Err(DebateError::NoRounds);
        }

        let started_at = Local::now();
        let mut session = DebateSession::new(topic, self.config.max_turns);
        let mut transcript =
            TranscriptLogger::create(&self.config.output_dir, topic, &started_at)?;
        let mut history = History::seeded(prompts::VIVA_SYSTEM_INSTRUCTION, topic);

        info!(
            max_turns = self.config.max_turns,
            primary = %self.config.models.primary,
            adversary = %self.config.models.adversary,
            transcript = %transcript.path().display(),
            prompt_version = prompts::PROMPT_VERSION,
            "debate seeded"
        );
        if let Some(observer) = &self.observer {
            observer.on_start(topic);
        }

        match self.drive(&mut session, &mut history, &mut transcript).await {
            Ok((summary, fallbacks)) => {
                let transcript_path = transcript.finish()?;
                info!(
                    rounds = history.completed_rounds(),
                    fallbacks,
                    transcript = %transcript_path.display(),
                    "debate complete"
                );
                Ok(DebateOutcome {
                    rounds_completed: history.completed_rounds() as u32,
                    summary,
                    transcript_path,
                    history,
                    fallbacks,
                    session,
                })
            }
            Err(err) => {
                let round = session.current_round();
                if session.abort(&err.to_string()).is_ok() {
                    warn!(round, error = %err, "debate aborted");
                }
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        session: &mut DebateSession,
        history: &mut History,
        transcript: &mut TranscriptLogger,
    ) -> Result<(String, u32), DebateError> {
        let models = &self.config.models;
        let policy = &self.config.sampling;
        let mut fallbacks = 0;

        while let DebatePhase::InRound(round) = session.advance()? {
            info!(round, max_turns = session.max_turns, "round start");
            if let Some(observer) = &self.observer {
                observer.on_round_start(round);
            }
            transcript.round_marker(round)?;

            let primary_text = adapters::primary_reply(
                &self.primary,
                policy,
                history.messages(),
                round,
                &models.primary,
            )
            .await
            .map_err(|source| DebateError::Turn {
                round,
                speaker: Speaker::Primary,
                source,
            })?;
            self.record_turn(history, transcript, round, Speaker::Primary, primary_text)?;

            tokio::time::sleep(self.config.pacing).await;

            let reply = adapters::adversary_reply(
                &self.adversary,
                &self.primary,
                policy,
                history.messages(),
                &models.adversary,
                &models.opponent,
            )
            .await
            .map_err(|source| DebateError::Turn {
                round,
                speaker: Speaker::Adversary,
                source,
            })?;
            if reply.via_fallback {
                fallbacks += 1;
            }
            self.record_turn(history, transcript, round, Speaker::Adversary, reply.content)?;
        }

        let summary =
            adapters::judge_summary(&self.primary, policy, history.messages(), &models.judge)
                .await
                .map_err(DebateError::Summary)?;
        if let Some(observer) = &self.observer {
            observer.on_summary(&summary);
        }
        transcript.summary(&summary)?;
        session.advance()?;

        Ok((summary, fallbacks))
    }

    /// Transcript line first, then history, so both hold the turn before
    /// the next call starts.
    fn record_turn(
        &self,
        history: &mut History,
        transcript: &mut TranscriptLogger,
        round: u32,
        speaker: Speaker,
        content: String,
    ) -> Result<(), DebateError> {
        if let Some(observer) = &self.observer {
            observer.on_turn(round, speaker, &content);
        }
        transcript.turn(speaker, &content)?;
        history.push_turn(speaker, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_config_default() {
        let config = DebateConfig::default();
        assert_eq!(config.max_turns, 6);
        assert_eq!(config.pacing, Duration::from_millis(1500));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.models.primary, "llama-3.1-8b-instant");
        assert_eq!(config.models.adversary, "gemini-2.0-flash");
        assert_eq!(config.models.judge, config.models.primary);
    }

    #[test]
    fn test_debate_error_display() {
        let err = DebateError::Turn {
            round: 3,
            speaker: Speaker::Primary,
            source: BackendError::Timeout("30s elapsed".to_string()),
        };
        let text = err.to_string();
        assert!(text.contains("primary"));
        assert!(text.contains("round 3"));

        let err = DebateError::Summary(BackendError::Malformed("no choices".to_string()));
        assert!(err.to_string().contains("judge"));

        assert!(DebateError::NoRounds.to_string().contains("max_turns"));
    }

    #[test]
    fn test_model_roster_roundtrips_through_json() {
        let roster = ModelRoster {
            judge: "judge-model".to_string(),
            ..ModelRoster::default()
        };
        let json = serde_json::to_string(&roster).unwrap();
        let back: ModelRoster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
    }
}
