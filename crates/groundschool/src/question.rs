//! Core question types for groundschool.
//!
//! This module defines the fundamental data structures of the question bank:
//! the subject categories of the exam, the question record itself, and the
//! display emphasis derived from the answer-reveal state.

use serde::{Deserialize, Serialize};

/// Exam subject category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Principles of flight.
    Aerodynamics,
    /// Air law and rules of the air.
    Legislation,
    /// Airframe, engine, and instruments.
    Materials,
    /// Weather theory and reports.
    Meteorology,
    /// Operational procedures and airmanship.
    Practice,
}

impl Category {
    /// All categories in dataset order.
    pub const ALL: [Self; 5] = [
        Self::Aerodynamics,
        Self::Legislation,
        Self::Materials,
        Self::Meteorology,
        Self::Practice,
    ];

    /// The lowercase name, doubling as the question set file stem.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aerodynamics => "aerodynamics",
            Self::Legislation => "legislation",
            Self::Materials => "materials",
            Self::Meteorology => "meteorology",
            Self::Practice => "practice",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which part of the question bank a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every question, all categories.
    #[default]
    All,
    /// Questions from a single category.
    Only(Category),
}

impl CategoryFilter {
    /// Check whether a question of the given category passes the filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Rendering emphasis for a single answer option.
///
/// Derived from the reveal state: while the answer is hidden every option
/// reads the same, once revealed the correct option stands out and the
/// rest recede.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerEmphasis {
    /// Default rendering.
    Normal,
    /// The revealed correct option.
    Emphasized,
    /// A revealed incorrect option.
    Dimmed,
}

/// A single multiple-choice exam question.
///
/// Questions are immutable once loaded. The `category` is stamped by the
/// loader from the question set the record came from; the records themselves
/// do not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique, stable identifier. Also the key component for stored notes.
    pub id: String,
    /// The category this question belongs to.
    pub category: Category,
    /// The question text.
    pub text: String,
    /// The four answer options, in display order.
    pub options: [String; 4],
    /// The correct option number, 1 through 4.
    pub answer: u8,
    /// Optional figure referenced by the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl Question {
    /// Get an answer option by its 1-based number.
    #[must_use]
    pub fn option(&self, number: u8) -> Option<&str> {
        match number {
            1..=4 => Some(self.options[usize::from(number) - 1].as_str()),
            _ => None,
        }
    }

    /// Check whether the given option number is the correct answer.
    #[must_use]
    pub fn is_correct(&self, number: u8) -> bool {
        self.answer == number
    }

    /// Derive the rendering emphasis for an option under the given reveal
    /// state.
    #[must_use]
    pub fn emphasis(&self, answer_revealed: bool, number: u8) -> AnswerEmphasis {
        if !answer_revealed {
            return AnswerEmphasis::Normal;
        }
        if self.is_correct(number) {
            AnswerEmphasis::Emphasized
        } else {
            AnswerEmphasis::Dimmed
        }
    }
}
