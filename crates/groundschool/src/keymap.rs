//! Key bindings for the study screen.
//!
//! Bindings map single characters to [`Intent`]s and can be overridden
//! from the `[keys]` config table. Category digits, Enter and Esc are
//! fixed and handled by the app directly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a keypress asks the study screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Advance towards the next question.
    NextQuestion,
    /// Advance towards the previous question.
    PreviousQuestion,
    /// Show or hide the correct answer.
    ToggleAnswer,
    /// Enable or disable the reveal-before-advance gate.
    ToggleRevealGate,
    /// Switch to random ordering.
    UseRandomOrder,
    /// Switch to sequential ordering.
    UseSequentialOrder,
    /// Start editing the note for the current question.
    EditNote,
    /// Leave the trainer.
    Quit,
    /// Show the key binding overlay.
    Help,
}

/// Character bindings for the study screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Next question.
    pub next: char,
    /// Previous question.
    pub previous: char,
    /// Show or hide the answer. Several keys may share this action.
    pub toggle_answer: Vec<char>,
    /// Toggle the reveal-before-advance gate.
    pub toggle_reveal_gate: char,
    /// Switch to random ordering.
    pub ordering_random: char,
    /// Switch to sequential ordering.
    pub ordering_sequential: char,
    /// Start editing the note.
    pub edit_note: char,
    /// Quit the trainer.
    pub quit: char,
    /// Show the help overlay.
    pub help: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: 'j',
            previous: 'k',
            toggle_answer: vec!['n', 'f'],
            toggle_reveal_gate: 'a',
            ordering_random: 'r',
            ordering_sequential: 's',
            edit_note: 'e',
            quit: 'q',
            help: '?',
        }
    }
}

impl KeyBindings {
    /// The intent bound to a character, if any.
    #[must_use]
    pub fn intent_for(&self, c: char) -> Option<Intent> {
        if c == self.next {
            return Some(Intent::NextQuestion);
        }
        if c == self.previous {
            return Some(Intent::PreviousQuestion);
        }
        if self.toggle_answer.contains(&c) {
            return Some(Intent::ToggleAnswer);
        }
        if c == self.toggle_reveal_gate {
            return Some(Intent::ToggleRevealGate);
        }
        if c == self.ordering_random {
            return Some(Intent::UseRandomOrder);
        }
        if c == self.ordering_sequential {
            return Some(Intent::UseSequentialOrder);
        }
        if c == self.edit_note {
            return Some(Intent::EditNote);
        }
        if c == self.quit {
            return Some(Intent::Quit);
        }
        if c == self.help {
            return Some(Intent::Help);
        }
        None
    }

    /// Checks that no character is bound to more than one action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] naming the first character
    /// that is bound twice.
    pub fn validate(&self) -> Result<()> {
        let mut bound = vec![
            self.next,
            self.previous,
            self.toggle_reveal_gate,
            self.ordering_random,
            self.ordering_sequential,
            self.edit_note,
            self.quit,
            self.help,
        ];
        bound.extend(&self.toggle_answer);

        let mut seen = Vec::with_capacity(bound.len());
        for c in bound {
            if seen.contains(&c) {
                return Err(Error::ConfigValidation {
                    message: format!("key '{c}' is bound to more than one action"),
                });
            }
            seen.push(c);
        }
        Ok(())
    }

    /// The configurable bindings as `(keys, action)` pairs for the
    /// help overlay.
    #[must_use]
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let toggle = self
            .toggle_answer
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        vec![
            (self.next.to_string(), "next"),
            (self.previous.to_string(), "prev"),
            (toggle, "show/hide answer"),
            (self.edit_note.to_string(), "edit note"),
            (self.ordering_random.to_string(), "random order"),
            (self.ordering_sequential.to_string(), "sequential order"),
            (self.toggle_reveal_gate.to_string(), "toggle reveal gate"),
            (self.help.to_string(), "help"),
            (self.quit.to_string(), "quit"),
        ]
    }
}
