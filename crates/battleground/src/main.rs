//! Battleground CLI
//!
//! Runs one adversarial debate between a Groq-hosted Llama model and Gemini,
//! echoing previews to the terminal and saving the full transcript.
//!
//! # Usage
//!
//! ```bash
//! # Prompt for the topic interactively
//! GROQ_API_KEY=... GEMINI_API_KEY=... battleground
//!
//! # Non-interactive, three rounds, transcripts under ./logs
//! battleground --topic "Is free will an illusion?" --max-turns 3 --output-dir logs
//!
//! # Settings from a file
//! battleground --config battleground.toml
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use battleground::{console, BattlegroundConfig, ConsoleObserver, GeminiClient, GroqClient};
use clap::Parser;
use coordination::DebateOrchestrator;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Debate topic (prompted on stdin when omitted)
    #[arg(long)]
    topic: Option<String>,

    /// Number of rounds (overrides BATTLEGROUND_MAX_TURNS and the config file)
    #[arg(long)]
    max_turns: Option<u32>,

    /// Directory for transcript files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = BattlegroundConfig::load(args.config.as_deref())?
        .with_overrides(args.max_turns, args.output_dir);
    config.validate()?;

    let topic = match args.topic {
        Some(topic) => topic,
        None => console::read_topic(&mut io::stdin().lock(), &mut io::stdout())
            .context("Failed to read debate topic")?,
    };

    let primary = GroqClient::new(&config.groq)?;
    let adversary = GeminiClient::new(&config.gemini)?;
    info!(
        groq = %primary.endpoint(),
        primary = %config.groq.primary_model,
        adversary = %config.gemini.model,
        max_turns = config.debate.max_turns,
        "battleground starting"
    );

    let orchestrator = DebateOrchestrator::with_config(primary, adversary, config.debate_config())
        .with_observer(ConsoleObserver::default());
    let outcome = orchestrator.run(&topic).await.context("Debate aborted")?;
    info!("{}", outcome.summary_line());

    println!(
        "\n[SIMULATION COMPLETE - TRANSCRIPT SAVED TO {}]",
        outcome.transcript_path.display()
    );
    Ok(())
}
