//! Per-backend request shaping: context windows, sampling, and the
//! adversary's fallback path.
//!
//! The primary backend sees a structured window (`history[0]` plus the last
//! four messages); the adversary sees the same tail flattened to text inside
//! an attack template. When the adversary call fails for any reason, the
//! turn is replayed through the primary backend with an injected directive.

use std::time::Duration;

use tracing::{debug, warn};

use super::backend::{BackendError, ChatBackend, ChatRequest, PromptBackend};
use super::message::{tail, Message};
use super::prompts;

/// Messages taken from the end of history for every context window.
pub const CONTEXT_TAIL: usize = 4;

/// Round number used for every fallback call.
pub const FALLBACK_ROUND: u32 = 1;

/// Sampling parameters for the primary backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPolicy {
    /// Temperature before the per-round increment is applied.
    pub base_temperature: f32,
    /// Added once per round.
    pub temperature_step: f32,
    /// Upper bound of the schedule.
    pub max_temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    /// Wait budget for debate turns.
    pub turn_timeout: Duration,
    /// Fixed low temperature for the judge.
    pub judge_temperature: f32,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            base_temperature: 0.85,
            temperature_step: 0.05,
            max_temperature: 1.2,
            presence_penalty: 0.8,
            frequency_penalty: 0.8,
            turn_timeout: Duration::from_secs(30),
            judge_temperature: 0.3,
        }
    }
}

impl SamplingPolicy {
    /// `min(base + round * step, max)`; non-decreasing in `round`.
    pub fn temperature_for_round(&self, round: u32) -> f32 {
        (self.base_temperature + round as f32 * self.temperature_step).min(self.max_temperature)
    }
}

/// `[history[0]] + history[-4:]`.
///
/// The tail is taken exactly as it falls, so a freshly seeded two-message
/// history yields the system instruction twice.
pub fn primary_context(history: &[Message]) -> Vec<Message> {
    history
        .first()
        .into_iter()
        .chain(tail(history, CONTEXT_TAIL))
        .cloned()
        .collect()
}

/// Last four messages as `role: content` lines.
pub fn flatten_tail(history: &[Message]) -> String {
    tail(history, CONTEXT_TAIL)
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The single prompt string submitted to the adversary backend.
pub fn adversarial_prompt(history: &[Message]) -> String {
    format!("{}{}", prompts::ADVERSARY_PREAMBLE, flatten_tail(history))
}

/// Request for a primary-debater turn in `round`.
pub fn primary_request(
    policy: &SamplingPolicy,
    history: &[Message],
    round: u32,
    model: &str,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: primary_context(history),
        temperature: policy.temperature_for_round(round),
        timeout: Some(policy.turn_timeout),
        presence_penalty: Some(policy.presence_penalty),
        frequency_penalty: Some(policy.frequency_penalty),
    }
}

/// Two-message judge request over the last four messages of history,
/// rendered as a JSON array of `{"role", "content"}` objects.
pub fn judge_request(
    policy: &SamplingPolicy,
    history: &[Message],
    model: &str,
) -> Result<ChatRequest, serde_json::Error> {
    let rendered = serde_json::to_string(tail(history, CONTEXT_TAIL))?;
    Ok(ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(prompts::JUDGE_INSTRUCTION),
            Message::user(format!("{}{}", prompts::JUDGE_REQUEST_PREFIX, rendered)),
        ],
        temperature: policy.judge_temperature,
        timeout: None,
        presence_penalty: None,
        frequency_penalty: None,
    })
}

/// Primary-debater turn. Errors are fatal to the caller; nothing is retried.
pub async fn primary_reply<B>(
    backend: &B,
    policy: &SamplingPolicy,
    history: &[Message],
    round: u32,
    model: &str,
) -> Result<String, BackendError>
where
    B: ChatBackend + ?Sized,
{
    let request = primary_request(policy, history, round, model);
    debug!(
        round,
        model,
        temperature = request.temperature,
        context = request.messages.len(),
        "primary request"
    );
    backend.complete(&request).await
}

/// An adversary turn and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdversaryReply {
    pub content: String,
    /// True when the adversary backend failed and the primary backend
    /// answered in its place.
    pub via_fallback: bool,
}

/// Adversary turn: attempt the prompt backend, then on any failure delegate
/// once to the primary mechanism with the fallback directive appended.
///
/// Only an error from the fallback call itself is returned.
pub async fn adversary_reply<A, P>(
    adversary: &A,
    primary: &P,
    policy: &SamplingPolicy,
    history: &[Message],
    adversary_model: &str,
    opponent_model: &str,
) -> Result<AdversaryReply, BackendError>
where
    A: PromptBackend + ?Sized,
    P: ChatBackend + ?Sized,
{
    let prompt = adversarial_prompt(history);
    match adversary.generate(adversary_model, &prompt).await {
        Ok(content) => Ok(AdversaryReply {
            content,
            via_fallback: false,
        }),
        Err(err) => {
            warn!(
                model = adversary_model,
                error = %err,
                "adversary backend failed, falling back to primary backend"
            );
            let content = fallback_reply(primary, policy, history, opponent_model).await?;
            Ok(AdversaryReply {
                content,
                via_fallback: true,
            })
        }
    }
}

/// The fallback path on its own: `history + [system(directive)]` through
/// the primary routine at round 1 with the opponent model.
pub async fn fallback_reply<P>(
    primary: &P,
    policy: &SamplingPolicy,
    history: &[Message],
    opponent_model: &str,
) -> Result<String, BackendError>
where
    P: ChatBackend + ?Sized,
{
    let mut context = history.to_vec();
    context.push(Message::system(prompts::FALLBACK_DIRECTIVE));
    primary_reply(primary, policy, &context, FALLBACK_ROUND, opponent_model).await
}

/// Neutral-judge verdict over the tail of history.
pub async fn judge_summary<B>(
    backend: &B,
    policy: &SamplingPolicy,
    history: &[Message],
    model: &str,
) -> Result<String, BackendError>
where
    B: ChatBackend + ?Sized,
{
    let request = judge_request(policy, history, model)
        .map_err(|e| BackendError::Malformed(format!("judge window: {}", e)))?;
    debug!(model, "judge request");
    backend.complete(&request).await
}
