//! Command-line interface for groundschool.
//!
//! This module provides the CLI structure and command handlers for the
//! `gschool` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CategoriesCommand, CategoryArg, ConfigCommand, NotesCommand, OrderArg, StudyCommand,
};

/// gschool - Drill pilot theory questions in the terminal
///
/// A flashcard trainer for private pilot ground school. Questions are
/// grouped by exam category, answers stay hidden until you ask for
/// them, and per-question notes are kept across sessions.
#[derive(Debug, Parser)]
#[command(name = "gschool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute; defaults to `study`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive study screen
    Study(StudyCommand),

    /// List categories and question counts
    Categories(CategoriesCommand),

    /// Inspect or delete stored notes
    #[command(subcommand)]
    Notes(NotesCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "gschool");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: None,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: None,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: None,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: None,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_bare_invocation() {
        let args = vec!["gschool"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_study() {
        let args = vec!["gschool", "study"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Some(Command::Study(_))));
    }

    #[test]
    fn test_parse_study_with_options() {
        let args = vec![
            "gschool",
            "study",
            "--category",
            "meteorology",
            "--order",
            "random",
            "--seed",
            "42",
            "--no-reveal-gate",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Command::Study(cmd)) = cli.command else {
            panic!("expected study command");
        };
        assert_eq!(cmd.category, Some(CategoryArg::Meteorology));
        assert_eq!(cmd.order, Some(OrderArg::Random));
        assert_eq!(cmd.seed, Some(42));
        assert!(cmd.no_reveal_gate);
    }

    #[test]
    fn test_parse_categories_json() {
        let args = vec!["gschool", "categories", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Command::Categories(cmd)) = cli.command else {
            panic!("expected categories command");
        };
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_notes_show() {
        let args = vec!["gschool", "notes", "show", "1001"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Notes(NotesCommand::Show { .. }))
        ));
    }

    #[test]
    fn test_parse_notes_wipe_single() {
        let args = vec!["gschool", "notes", "wipe", "1001", "--yes"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Command::Notes(NotesCommand::Wipe { question_id, yes })) = cli.command else {
            panic!("expected wipe command");
        };
        assert_eq!(question_id.as_deref(), Some("1001"));
        assert!(yes);
    }

    #[test]
    fn test_parse_config_path() {
        let args = vec!["gschool", "config", "path"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Path))
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["gschool", "-c", "/custom/config.toml", "study"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["gschool", "-v", "study"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["gschool", "-q", "study"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
