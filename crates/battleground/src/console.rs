//! Terminal presentation: live turn previews and the topic prompt.

use std::io::{self, BufRead, Write};

use coordination::{DebateObserver, Speaker};

/// Characters of each turn echoed to the terminal.
pub const PREVIEW_CHARS: usize = 300;

const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";
const BANNER_WIDTH: usize = 50;

/// First `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Coloured `LABEL: preview...` line for one turn.
pub fn format_turn(speaker: Speaker, content: &str, max_chars: usize) -> String {
    let color = match speaker {
        Speaker::Primary => BLUE,
        Speaker::Adversary => GREEN,
    };
    format!(
        "{}{}:{} {}...",
        color,
        speaker.transcript_label(),
        RESET,
        preview(content, max_chars)
    )
}

/// Prints debate progress to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleObserver {
    preview_chars: usize,
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self {
            preview_chars: PREVIEW_CHARS,
        }
    }
}

impl DebateObserver for ConsoleObserver {
    fn on_start(&self, topic: &str) {
        println!("\n--- ⚡ THE ADVERSARIAL DEBATE: {} ⚡ ---", topic);
    }

    fn on_round_start(&self, round: u32) {
        println!("\n--- ROUND {} ---", round);
    }

    fn on_turn(&self, _round: u32, speaker: Speaker, content: &str) {
        println!("{}", format_turn(speaker, content, self.preview_chars));
    }

    fn on_summary(&self, summary: &str) {
        let rule = "=".repeat(BANNER_WIDTH);
        println!("\n{}\n📢 MODERATOR'S FINAL SUMMARY\n{}\n{}", rule, rule, summary);
    }
}

/// Prompt for the debate topic and read one line.
///
/// Only the line terminator is stripped; an empty line is accepted. End of
/// input before any line is an `UnexpectedEof` error.
pub fn read_topic<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "Enter debate topic: ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed before a topic was entered",
        ));
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("hello", 300), "hello");
        assert_eq!(preview("hello", 3), "hel");
        assert_eq!(preview("ééé", 2), "éé");
        assert_eq!(preview("", 5), "");
    }

    #[test]
    fn test_format_turn_colours() {
        let line = format_turn(Speaker::Primary, "Free will exists.", 300);
        assert_eq!(line, "\x1b[94mLLAMA:\x1b[0m Free will exists....");

        let line = format_turn(Speaker::Adversary, &"x".repeat(400), 300);
        assert!(line.starts_with("\x1b[92mGEMINI:\x1b[0m "));
        assert!(line.ends_with(&format!("{}...", "x".repeat(300))));
    }

    #[test]
    fn test_read_topic_strips_newline_only() {
        let mut input = io::Cursor::new("  Is free will an illusion?  \r\n");
        let mut output = Vec::new();
        let topic = read_topic(&mut input, &mut output).unwrap();
        assert_eq!(topic, "  Is free will an illusion?  ");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter debate topic: ");
    }

    #[test]
    fn test_read_topic_rejects_eof() {
        let mut input = io::Cursor::new("");
        let err = read_topic(&mut input, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_topic_accepts_empty_line() {
        let mut input = io::Cursor::new("\n");
        let topic = read_topic(&mut input, &mut Vec::new()).unwrap();
        assert_eq!(topic, "");
    }
}
