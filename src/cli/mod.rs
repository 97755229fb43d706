//! Console front end: argument parsing and terminal output.

mod output;

pub use output::{format_output, strip_markdown, Output};

use clap::Parser;
use std::path::PathBuf;

const EXIT_COMMANDS: [&str; 3] = ["выход", "exit", "quit"];

/// AI movie expert: ask about films in plain language.
#[derive(Parser, Debug)]
#[command(name = "cinema-expert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show raw answers and tool calls (-vv for debug logs)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Whether the line asks to leave the conversation.
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&input.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("выход"));
        assert!(is_exit_command("  EXIT "));
        assert!(is_exit_command("Выход"));
        assert!(is_exit_command("quit"));
        assert!(!is_exit_command("выходные фильмы"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn test_verbose_flag_raises_log_level() {
        let quiet = Cli::parse_from(["cinema-expert"]);
        assert_eq!(quiet.log_level(), "warn");
        assert!(quiet.config.is_none());

        let loud = Cli::parse_from(["cinema-expert", "-vv", "--config", "conf/settings.toml"]);
        assert_eq!(loud.log_level(), "debug");
        assert_eq!(loud.config, Some(PathBuf::from("conf/settings.toml")));
    }
}
