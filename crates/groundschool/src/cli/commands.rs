//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::question::Category;
use crate::session::OrderingMode;

/// Study command arguments.
#[derive(Debug, Default, Args)]
pub struct StudyCommand {
    /// Limit the session to one category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Question ordering
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Load question sets from this directory instead of the built-in bank
    #[arg(long, value_name = "DIR")]
    pub questions_dir: Option<PathBuf>,

    /// Move on first press instead of revealing the answer first
    #[arg(long)]
    pub no_reveal_gate: bool,

    /// Seed the random ordering for reproducible drills
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Categories command arguments.
#[derive(Debug, Args)]
pub struct CategoriesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Count questions from this directory instead of the built-in bank
    #[arg(long, value_name = "DIR")]
    pub questions_dir: Option<PathBuf>,
}

/// Note management commands.
#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    /// List question ids that have a stored note
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the note for one question
    Show {
        /// Question id, as shown in the study screen
        question_id: String,
    },

    /// Delete stored notes
    Wipe {
        /// Delete only this question's note
        question_id: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Category argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Principles of flight
    Aerodynamics,
    /// Air law and operating rules
    Legislation,
    /// Airframes, engines and systems
    Materials,
    /// Weather and the atmosphere
    Meteorology,
    /// Operational procedures
    Practice,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Aerodynamics => Self::Aerodynamics,
            CategoryArg::Legislation => Self::Legislation,
            CategoryArg::Materials => Self::Materials,
            CategoryArg::Meteorology => Self::Meteorology,
            CategoryArg::Practice => Self::Practice,
        }
    }
}

/// Ordering argument for the study command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Walk the bank in order
    Sequential,
    /// Jump to a random question on every advance
    Random,
}

impl From<OrderArg> for OrderingMode {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Sequential => Self::Sequential,
            OrderArg::Random => Self::Random,
        }
    }
}
