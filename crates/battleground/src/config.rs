//! Runtime configuration.
//!
//! Precedence, highest first: CLI flags, `--config` TOML file, environment
//! variables, built-in defaults. Fields missing from the TOML file fall back
//! to the environment/default value for that field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use coordination::{DebateConfig, ModelRoster, SamplingPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_GROQ_BASE_URL: &str = "GROQ_BASE_URL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_PRIMARY_MODEL: &str = "BATTLEGROUND_PRIMARY_MODEL";
pub const ENV_OPPONENT_MODEL: &str = "BATTLEGROUND_OPPONENT_MODEL";
pub const ENV_GEMINI_MODEL: &str = "BATTLEGROUND_GEMINI_MODEL";
pub const ENV_JUDGE_MODEL: &str = "BATTLEGROUND_JUDGE_MODEL";
pub const ENV_MAX_TURNS: &str = "BATTLEGROUND_MAX_TURNS";

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_LLAMA_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_TURNS: u32 = 6;
const DEFAULT_PACING_MS: u64 = 1500;
const DEFAULT_TURN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_GROQ_TIMEOUT_SECS: u64 = 60;

/// Configuration problems detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set; the primary debater cannot run without it")]
    MissingGroqKey,

    #[error("max_turns must be at least 1")]
    ZeroTurns,
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

/// Groq OpenAI-compatible endpoint. Serves the primary, fallback and judge calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    pub base_url: String,
    pub api_key: String,
    pub primary_model: String,
    /// Model that answers for the adversary when Gemini fails.
    pub opponent_model: String,
    pub judge_model: String,
    /// Client-level budget for calls without a per-request timeout.
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        let primary_model = env_or(ENV_PRIMARY_MODEL, DEFAULT_LLAMA_MODEL);
        Self {
            base_url: env_or(ENV_GROQ_BASE_URL, DEFAULT_GROQ_BASE_URL),
            api_key: env_or(ENV_GROQ_API_KEY, ""),
            opponent_model: env_or(ENV_OPPONENT_MODEL, DEFAULT_LLAMA_MODEL),
            judge_model: env_or(ENV_JUDGE_MODEL, &primary_model),
            primary_model,
            timeout_secs: DEFAULT_GROQ_TIMEOUT_SECS,
        }
    }
}

/// Gemini `generateContent` endpoint for the adversary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    /// Empty means every adversary turn goes straight to the fallback.
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: env_or(ENV_GEMINI_BASE_URL, DEFAULT_GEMINI_BASE_URL),
            api_key: env_or(ENV_GEMINI_API_KEY, ""),
            model: env_or(ENV_GEMINI_MODEL, DEFAULT_GEMINI_MODEL),
            timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
        }
    }
}

/// Round loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateSettings {
    pub max_turns: u32,
    pub pacing_ms: u64,
    /// Per-call budget for primary and fallback turns.
    pub turn_timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            max_turns: max_turns_from_env(std::env::var(ENV_MAX_TURNS).ok().as_deref()),
            pacing_ms: DEFAULT_PACING_MS,
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Parse `BATTLEGROUND_MAX_TURNS`, warning when a set value is rejected.
fn max_turns_from_env(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_MAX_TURNS;
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            warn!(
                var = ENV_MAX_TURNS,
                value = raw,
                default = DEFAULT_MAX_TURNS,
                "ignoring invalid max_turns; must be a positive integer"
            );
            DEFAULT_MAX_TURNS
        }
    }
}

/// Top-level battleground configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattlegroundConfig {
    pub groq: GroqConfig,
    pub gemini: GeminiConfig,
    pub debate: DebateSettings,
}

impl BattlegroundConfig {
    /// Load from a TOML file, or from the environment when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply CLI overrides.
    pub fn with_overrides(mut self, max_turns: Option<u32>, output_dir: Option<PathBuf>) -> Self {
        if let Some(max_turns) = max_turns {
            self.debate.max_turns = max_turns;
        }
        if let Some(output_dir) = output_dir {
            self.debate.output_dir = output_dir;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groq.api_key.trim().is_empty() {
            return Err(ConfigError::MissingGroqKey);
        }
        if self.debate.max_turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        Ok(())
    }

    /// Orchestrator settings derived from this config.
    pub fn debate_config(&self) -> DebateConfig {
        DebateConfig {
            max_turns: self.debate.max_turns,
            pacing: Duration::from_millis(self.debate.pacing_ms),
            models: ModelRoster {
                primary: self.groq.primary_model.clone(),
                opponent: self.groq.opponent_model.clone(),
                adversary: self.gemini.model.clone(),
                judge: self.groq.judge_model.clone(),
            },
            sampling: SamplingPolicy {
                turn_timeout: Duration::from_secs(self.debate.turn_timeout_secs),
                ..SamplingPolicy::default()
            },
            output_dir: self.debate.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_TOML: &str = r#"
[groq]
base_url = "http://localhost:9000/v1"
api_key = "gsk-test"
primary_model = "llama-a"
opponent_model = "llama-b"
judge_model = "llama-judge"
timeout_secs = 45

[gemini]
api_key = "g-test"
model = "gemini-test"
timeout_secs = 10

[debate]
max_turns = 3
pacing_ms = 0
turn_timeout_secs = 5
output_dir = "/tmp/debates"
"#;

    #[test]
    fn test_parse_full_toml() {
        let config = BattlegroundConfig::from_toml_str(FULL_TOML).unwrap();
        assert_eq!(config.groq.base_url, "http://localhost:9000/v1");
        assert_eq!(config.groq.judge_model, "llama-judge");
        assert_eq!(config.groq.timeout_secs, 45);
        assert_eq!(config.gemini.model, "gemini-test");
        assert_eq!(config.gemini.timeout_secs, 10);
        assert_eq!(config.debate.max_turns, 3);
        assert_eq!(config.debate.output_dir, PathBuf::from("/tmp/debates"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BattlegroundConfig::from_toml_str("[debate]\npacing_ms = 250\n").unwrap();
        assert_eq!(config.debate.pacing_ms, 250);
        assert_eq!(config.debate.turn_timeout_secs, DEFAULT_TURN_TIMEOUT_SECS);
        assert_eq!(config.gemini.timeout_secs, DEFAULT_GEMINI_TIMEOUT_SECS);
        assert_eq!(config.groq.timeout_secs, DEFAULT_GROQ_TIMEOUT_SECS);
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let mut config = BattlegroundConfig::from_toml_str(FULL_TOML).unwrap();
        config.groq.api_key = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::MissingGroqKey));
    }

    #[test]
    fn test_validate_rejects_zero_turns() {
        let config = BattlegroundConfig::from_toml_str(FULL_TOML)
            .unwrap()
            .with_overrides(Some(0), None);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTurns));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = BattlegroundConfig::from_toml_str(FULL_TOML)
            .unwrap()
            .with_overrides(Some(9), Some(PathBuf::from("out")));
        assert_eq!(config.debate.max_turns, 9);
        assert_eq!(config.debate.output_dir, PathBuf::from("out"));

        let untouched = BattlegroundConfig::from_toml_str(FULL_TOML)
            .unwrap()
            .with_overrides(None, None);
        assert_eq!(untouched.debate.max_turns, 3);
    }

    #[test]
    fn test_debate_config_mapping() {
        let debate = BattlegroundConfig::from_toml_str(FULL_TOML)
            .unwrap()
            .debate_config();
        assert_eq!(debate.max_turns, 3);
        assert_eq!(debate.pacing, Duration::ZERO);
        assert_eq!(debate.models.primary, "llama-a");
        assert_eq!(debate.models.opponent, "llama-b");
        assert_eq!(debate.models.adversary, "gemini-test");
        assert_eq!(debate.models.judge, "llama-judge");
        assert_eq!(debate.sampling.turn_timeout, Duration::from_secs(5));
        assert_eq!(debate.sampling.judge_temperature, 0.3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battleground.toml");
        std::fs::write(&path, FULL_TOML).unwrap();
        let config = BattlegroundConfig::load(Some(&path)).unwrap();
        assert_eq!(config.groq.primary_model, "llama-a");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = BattlegroundConfig::load(Some(Path::new("/nonexistent/battleground.toml")))
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/battleground.toml"));
    }

    #[test]
    fn test_max_turns_env_parsing() {
        assert_eq!(max_turns_from_env(None), DEFAULT_MAX_TURNS);
        assert_eq!(max_turns_from_env(Some("4")), 4);
        assert_eq!(max_turns_from_env(Some(" 3 ")), 3);
        assert_eq!(max_turns_from_env(Some("0")), DEFAULT_MAX_TURNS);
        assert_eq!(max_turns_from_env(Some("six")), DEFAULT_MAX_TURNS);
        assert_eq!(max_turns_from_env(Some("-2")), DEFAULT_MAX_TURNS);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(BattlegroundConfig::from_toml_str("[debate]\nmax_turns = \"six\"\n").is_err());
    }
}
