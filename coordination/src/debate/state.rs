//! Debate state machine: phases, transitions and session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phase of a debate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebatePhase {
    /// History seeded and transcript header written.
    Seeded,
    /// Round `n` (1-based) in progress.
    InRound(u32),
    /// All rounds done; waiting on the judge.
    Summarizing,
    /// Summary written and transcript closed.
    Done,
    /// A fatal error ended the run.
    Aborted,
}

impl DebatePhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether `to` is reachable from this phase given `max_turns`.
    pub fn can_transition_to(self, to: DebatePhase, max_turns: u32) -> bool {
        match (self, to) {
            (from, Self::Aborted) => !from.is_terminal(),
            (Self::Seeded, Self::InRound(1)) => max_turns >= 1,
            (Self::InRound(n), Self::InRound(m)) => m == n + 1 && m <= max_turns,
            (Self::InRound(n), Self::Summarizing) => n == max_turns,
            (Self::Summarizing, Self::Done) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seeded => write!(f, "seeded"),
            Self::InRound(n) => write!(f, "in_round({})", n),
            Self::Summarizing => write!(f, "summarizing"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateTransition {
    /// Previous phase.
    pub from: DebatePhase,
    /// New phase.
    pub to: DebatePhase,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
    /// Reason for the transition.
    pub reason: String,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition {from} → {to}: {reason}")]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

/// A debate session tracking phase and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    /// Current phase.
    pub phase: DebatePhase,
    /// Number of rounds the run will execute.
    pub max_turns: u32,
    /// Transition history.
    pub transitions: Vec<DebateTransition>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Opening question.
    pub topic: String,
}

impl DebateSession {
    /// Create a session in the `Seeded` phase.
    pub fn new(topic: &str, max_turns: u32) -> Self {
        Self {
            phase: DebatePhase::Seeded,
            max_turns,
            transitions: Vec::new(),
            created_at: Utc::now(),
            topic: topic.to_string(),
        }
    }

    /// Transition to a new phase with a reason.
    pub fn transition(&mut self, to: DebatePhase, reason: &str) -> Result<(), TransitionError> {
        if !self.phase.can_transition_to(to, self.max_turns) {
            return Err(TransitionError {
                from: self.phase,
                to,
                reason: format!("not reachable with max_turns={}", self.max_turns),
            });
        }

        self.transitions.push(DebateTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
        Ok(())
    }

    /// Advance to the next round, or to `Summarizing` after the last one.
    pub fn advance(&mut self) -> Result<DebatePhase, TransitionError> {
        let next = match self.phase {
            DebatePhase::Seeded => DebatePhase::InRound(1),
            DebatePhase::InRound(n) if n < self.max_turns => DebatePhase::InRound(n + 1),
            DebatePhase::InRound(_) => DebatePhase::Summarizing,
            DebatePhase::Summarizing => DebatePhase::Done,
            phase => phase,
        };
        let reason = match next {
            DebatePhase::InRound(1) => "debate started",
            DebatePhase::InRound(_) => "round complete",
            DebatePhase::Summarizing => "final round complete",
            _ => "summary written",
        };
        self.transition(next, reason)?;
        Ok(next)
    }

    /// Mark the run as aborted.
    pub fn abort(&mut self, reason: &str) -> Result<(), TransitionError> {
        self.transition(DebatePhase::Aborted, reason)
    }

    /// Current round, or 0 outside the round loop.
    pub fn current_round(&self) -> u32 {
        match self.phase {
            DebatePhase::InRound(n) => n,
            _ => 0,
        }
    }

    /// Whether the run has ended.
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | {} transitions",
            self.phase,
            self.current_round(),
            self.max_turns,
            self.transitions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = DebateSession::new("Is free will an illusion?", 6);
        assert_eq!(session.phase, DebatePhase::Seeded);
        assert_eq!(session.current_round(), 0);
        assert_eq!(session.max_turns, 6);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_full_run_cycle() {
        let mut session = DebateSession::new("topic", 2);
        assert_eq!(session.advance().unwrap(), DebatePhase::InRound(1));
        assert_eq!(session.advance().unwrap(), DebatePhase::InRound(2));
        assert_eq!(session.current_round(), 2);
        assert_eq!(session.advance().unwrap(), DebatePhase::Summarizing);
        assert_eq!(session.advance().unwrap(), DebatePhase::Done);
        assert!(session.is_complete());
        assert_eq!(session.transitions.len(), 4);
        assert_eq!(session.transitions[0].reason, "debate started");
    }

    #[test]
    fn test_skip_rounds_rejected() {
        let mut session = DebateSession::new("topic", 3);
        let err = session
            .transition(DebatePhase::Summarizing, "skip")
            .unwrap_err();
        assert_eq!(err.from, DebatePhase::Seeded);
        assert_eq!(err.to, DebatePhase::Summarizing);

        session.advance().unwrap();
        assert!(session.transition(DebatePhase::InRound(3), "jump").is_err());
        assert!(session.transition(DebatePhase::Summarizing, "early").is_err());
    }

    #[test]
    fn test_round_beyond_max_rejected() {
        let mut session = DebateSession::new("topic", 1);
        session.advance().unwrap();
        assert!(session.transition(DebatePhase::InRound(2), "extra").is_err());
        assert_eq!(session.advance().unwrap(), DebatePhase::Summarizing);
    }

    #[test]
    fn test_abort_mid_round() {
        let mut session = DebateSession::new("topic", 4);
        session.advance().unwrap();
        session.abort("primary backend timed out").unwrap();
        assert_eq!(session.phase, DebatePhase::Aborted);
        assert!(session.is_complete());
    }

    #[test]
    fn test_terminal_no_transitions() {
        let mut session = DebateSession::new("topic", 1);
        for _ in 0..3 {
            session.advance().unwrap();
        }
        assert_eq!(session.phase, DebatePhase::Done);
        assert!(session.abort("late").is_err());
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(DebatePhase::Seeded.to_string(), "seeded");
        assert_eq!(DebatePhase::InRound(3).to_string(), "in_round(3)");
        assert_eq!(DebatePhase::Summarizing.to_string(), "summarizing");
    }

    #[test]
    fn test_status_line() {
        let mut session = DebateSession::new("topic", 6);
        session.advance().unwrap();
        let line = session.status_line();
        assert!(line.contains("in_round(1)"));
        assert!(line.contains("1/6"));
    }
}
