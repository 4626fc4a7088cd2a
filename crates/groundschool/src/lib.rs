//! `groundschool` - A terminal flashcard trainer for pilot theory exams
//!
//! This library provides the question bank, the study session state
//! machine, and the two-tier note store behind the `gschool` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod keymap;
pub mod logging;
pub mod notes;
pub mod question;
pub mod session;
pub mod tui;

pub use config::Config;
pub use dataset::QuestionBank;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use question::{AnswerEmphasis, Category, CategoryFilter, Question};
pub use session::{AdvanceOutcome, Direction, NoteEffect, OrderingMode, StudySession};
