//! CLI argument parsing using clap 4.x derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Structured reasoning for online assessments
///
/// Sends proctoring logs, answers, question dumps and company names to a
/// reasoning endpoint and prints the checked result as JSON.
#[derive(Parser, Debug)]
#[command(name = "examiner")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to ./examiner.toml, then ~/.config/examiner/)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model to use (overrides the configured one)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Append debug log entries to this file
    #[arg(long, global = true)]
    pub debug_log: Option<PathBuf>,

    /// Print version information
    #[arg(long)]
    pub version: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look for suspicious activity in proctoring logs
    AnalyzeLogs {
        /// JSON array of log entries ("-" reads stdin)
        file: PathBuf,
    },

    /// Grade a candidate's answer
    Evaluate {
        /// JSON evaluation request ("-" reads stdin)
        file: PathBuf,
    },

    /// Extract multiple-choice questions from raw text
    ParseQuestions {
        /// Text file ("-" reads stdin)
        file: PathBuf,
    },

    /// Generate a motto for a company
    Motto {
        /// Company name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Write a default configuration file (to --config or the user config path)
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the JSON Schemas of the registered contracts
    Contracts {
        /// Only this operation (e.g. evaluate-answer)
        #[arg(short, long)]
        operation: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["examiner", "evaluate", "req.json", "--model", "gpt-4o"]);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert!(matches!(cli.command, Some(Commands::Evaluate { .. })));
    }

    #[test]
    fn test_init_config_flags() {
        let cli = Cli::parse_from(["examiner", "init-config", "--force", "-c", "/tmp/e.toml"]);
        assert!(matches!(cli.command, Some(Commands::InitConfig { force: true })));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/e.toml")));
    }

    #[test]
    fn test_motto_joins_words() {
        let cli = Cli::parse_from(["examiner", "motto", "Ferris", "&", "Co"]);
        match cli.command {
            Some(Commands::Motto { name }) => assert_eq!(name.join(" "), "Ferris & Co"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
