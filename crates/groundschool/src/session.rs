//! Study session state machine.
//!
//! A [`StudySession`] owns the cursor over the eligible question list,
//! the answer reveal state and the note draft for the question on
//! screen. It is a plain synchronous state machine: navigation returns
//! [`NoteEffect`]s describing the store work it wants done instead of
//! touching storage itself, which keeps every transition unit-testable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::QuestionBank;
use crate::question::{AnswerEmphasis, CategoryFilter, Question};

/// How the next question is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    /// Walk the eligible list in order.
    #[default]
    Sequential,
    /// Pick a uniformly random eligible question. Repeats are allowed.
    Random,
}

impl std::fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Navigation direction for [`StudySession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Move towards the end of the eligible list.
    Next,
    /// Move towards the start of the eligible list.
    Previous,
}

/// What an advance call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The reveal gate consumed the keypress; the answer is now shown.
    Revealed,
    /// The cursor moved to a different position.
    Moved {
        /// Position before the move.
        from: usize,
        /// Position after the move.
        to: usize,
    },
    /// The cursor stayed where it was, either because it sits at the
    /// edge of the list or because the random pick landed on the
    /// current question.
    Pinned,
}

/// Store work requested by a session transition.
///
/// Effects are ordered: a `Persist` for the outgoing question always
/// precedes the `Fetch` for the incoming one, and the store must apply
/// them in that order or a note could be read back before it is
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEffect {
    /// Save the note draft under the given question.
    Persist {
        /// Question the draft belongs to.
        question_id: String,
        /// Draft text at the time of the move.
        text: String,
    },
    /// Load the stored note for the given question.
    Fetch {
        /// Question now on screen.
        question_id: String,
    },
}

/// Read-only snapshot of the session for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// The question on screen, if any.
    pub question: Option<&'a Question>,
    /// Zero-based position within the eligible list.
    pub position: usize,
    /// Length of the eligible list.
    pub total: usize,
    /// Active category filter.
    pub filter: CategoryFilter,
    /// Active ordering mode.
    pub ordering: OrderingMode,
    /// Whether the correct answer is currently shown.
    pub answer_revealed: bool,
    /// Whether the reveal gate is enabled.
    pub reveal_before_advance: bool,
    /// Note draft for the question on screen.
    pub note_draft: &'a str,
}

/// The study session state machine.
#[derive(Debug)]
pub struct StudySession {
    bank: QuestionBank,
    filter: CategoryFilter,
    ordering: OrderingMode,
    /// Bank indices admitted by `filter`, in bank order. The cursor
    /// `position` indexes into this list, never into the bank.
    eligible: Vec<usize>,
    position: usize,
    answer_revealed: bool,
    reveal_before_advance: bool,
    note_draft: String,
    rng: SmallRng,
}

impl StudySession {
    /// Creates a session over a bank with an entropy-seeded generator.
    ///
    /// Starts on the first question, all categories eligible, answer
    /// hidden, reveal gate enabled.
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, SmallRng::from_entropy())
    }

    /// Creates a session with a fixed seed for reproducible random
    /// ordering.
    #[must_use]
    pub fn with_seed(bank: QuestionBank, seed: u64) -> Self {
        Self::with_rng(bank, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(bank: QuestionBank, rng: SmallRng) -> Self {
        let filter = CategoryFilter::All;
        let eligible = bank.eligible(filter);
        Self {
            bank,
            filter,
            ordering: OrderingMode::default(),
            eligible,
            position: 0,
            answer_revealed: false,
            reveal_before_advance: true,
            note_draft: String::new(),
            rng,
        }
    }

    /// Moves the cursor and reports the store work the move requires.
    ///
    /// With the reveal gate enabled and the answer hidden, the call
    /// shows the answer instead of moving and requests no store work.
    /// Otherwise the current draft is persisted, the cursor moves, the
    /// answer is hidden again when the gate is enabled, and the note
    /// for the new question is fetched. Sequential moves clamp at both
    /// ends of the list; random mode ignores the direction entirely.
    #[must_use = "note effects must be handed to the store"]
    pub fn advance(&mut self, direction: Direction) -> (AdvanceOutcome, Vec<NoteEffect>) {
        if self.reveal_before_advance && !self.answer_revealed {
            self.answer_revealed = true;
            return (AdvanceOutcome::Revealed, Vec::new());
        }
        if self.eligible.is_empty() {
            return (AdvanceOutcome::Pinned, Vec::new());
        }

        let mut effects = Vec::new();
        // A record with a blank id has no note key to write under.
        if let Some(question) = self
            .current_question()
            .filter(|question| !question.id.is_empty())
        {
            effects.push(NoteEffect::Persist {
                question_id: question.id.clone(),
                text: self.note_draft.clone(),
            });
        }

        let from = self.position;
        let last = self.eligible.len() - 1;
        let to = match self.ordering {
            OrderingMode::Random => self.rng.gen_range(0..self.eligible.len()),
            OrderingMode::Sequential => match direction {
                Direction::Next => from.saturating_add(1).min(last),
                Direction::Previous => from.saturating_sub(1),
            },
        };
        self.position = to;

        if self.reveal_before_advance {
            self.answer_revealed = false;
        }

        if let Some(question) = self.current_question() {
            effects.push(NoteEffect::Fetch {
                question_id: question.id.clone(),
            });
        }

        let outcome = if to == from {
            AdvanceOutcome::Pinned
        } else {
            AdvanceOutcome::Moved { from, to }
        };
        (outcome, effects)
    }

    /// Switches the category filter and rewinds the cursor.
    ///
    /// Only the cursor resets. The reveal state and the note draft
    /// carry over to the first question of the new filter, so a dirty
    /// draft is saved under that question on the next advance.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.eligible = self.bank.eligible(filter);
        self.position = 0;
        debug!(%filter, eligible = self.eligible.len(), "category filter changed");
    }

    /// Installs a fetched note if it belongs to the question on screen.
    ///
    /// Returns `false` and leaves the draft untouched when the session
    /// has already moved on, so a slow load never clobbers newer input.
    pub fn apply_fetched_note(&mut self, question_id: &str, text: String) -> bool {
        let current = self
            .current_question()
            .is_some_and(|question| question.id == question_id);
        if current {
            self.note_draft = text;
        } else {
            debug!(question_id, "discarding note for a question no longer shown");
        }
        current
    }

    /// Flips the answer visibility without moving the cursor.
    pub fn toggle_revealed(&mut self) {
        self.answer_revealed = !self.answer_revealed;
    }

    /// Flips the reveal gate.
    pub fn toggle_reveal_gate(&mut self) {
        self.reveal_before_advance = !self.reveal_before_advance;
    }

    /// Enables or disables the reveal gate.
    pub fn set_reveal_gate(&mut self, enabled: bool) {
        self.reveal_before_advance = enabled;
    }

    /// Switches the ordering mode.
    pub fn set_ordering(&mut self, ordering: OrderingMode) {
        self.ordering = ordering;
    }

    /// Replaces the note draft.
    pub fn set_note_draft(&mut self, text: impl Into<String>) {
        self.note_draft = text.into();
    }

    /// Appends one character to the note draft.
    pub fn push_note_char(&mut self, c: char) {
        self.note_draft.push(c);
    }

    /// Removes the last character of the note draft.
    pub fn backspace_note(&mut self) {
        self.note_draft.pop();
    }

    /// Emphasis for one answer option of the question on screen.
    #[must_use]
    pub fn option_emphasis(&self, number: u8) -> AnswerEmphasis {
        match self.current_question() {
            Some(question) => question.emphasis(self.answer_revealed, number),
            None => AnswerEmphasis::Normal,
        }
    }

    /// The question under the cursor, if the eligible list is
    /// non-empty.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.eligible
            .get(self.position)
            .and_then(|&index| self.bank.get(index))
    }

    /// Active category filter.
    #[must_use]
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Active ordering mode.
    #[must_use]
    pub fn ordering(&self) -> OrderingMode {
        self.ordering
    }

    /// Whether the answer is currently shown.
    #[must_use]
    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    /// Whether the reveal gate is enabled.
    #[must_use]
    pub fn reveal_before_advance(&self) -> bool {
        self.reveal_before_advance
    }

    /// Current note draft.
    #[must_use]
    pub fn note_draft(&self) -> &str {
        &self.note_draft
    }

    /// Zero-based cursor position within the eligible list.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the eligible list.
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    /// The bank this session studies.
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            question: self.current_question(),
            position: self.position,
            total: self.eligible.len(),
            filter: self.filter,
            ordering: self.ordering,
            answer_revealed: self.answer_revealed,
            reveal_before_advance: self.reveal_before_advance,
            note_draft: &self.note_draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Category;

    fn question(id: &str, category: Category) -> Question {
        Question {
            id: id.to_string(),
            category,
            text: format!("question {id}"),
            options: ["one".into(), "two".into(), "three".into(), "four".into()],
            answer: 2,
            image_id: None,
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank::from_questions(vec![
            question("a1", Category::Aerodynamics),
            question("a2", Category::Aerodynamics),
            question("a3", Category::Aerodynamics),
            question("l1", Category::Legislation),
            question("l2", Category::Legislation),
        ])
    }

    fn session() -> StudySession {
        StudySession::with_seed(bank(), 7)
    }

    #[test]
    fn test_session_defaults() {
        let session = session();
        assert_eq!(session.filter(), CategoryFilter::All);
        assert_eq!(session.ordering(), OrderingMode::Sequential);
        assert_eq!(session.position(), 0);
        assert_eq!(session.eligible_count(), 5);
        assert!(!session.answer_revealed());
        assert!(session.reveal_before_advance());
        assert_eq!(session.note_draft(), "");
        assert_eq!(session.current_question().unwrap().id, "a1");
    }

    #[test]
    fn test_gate_consumes_first_advance() {
        let mut session = session();
        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Revealed);
        assert!(effects.is_empty());
        assert!(session.answer_revealed());
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_gated_advance_moves_on_second_press() {
        let mut session = session();
        let _ = session.advance(Direction::Next);
        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Moved { from: 0, to: 1 });
        assert_eq!(effects.len(), 2);
        assert!(!session.answer_revealed());
        assert_eq!(session.current_question().unwrap().id, "a2");
    }

    #[test]
    fn test_advance_persists_then_fetches() {
        let mut session = session();
        session.set_reveal_gate(false);
        session.set_note_draft("remember the chord line");
        let (_, effects) = session.advance(Direction::Next);
        assert_eq!(
            effects,
            vec![
                NoteEffect::Persist {
                    question_id: "a1".to_string(),
                    text: "remember the chord line".to_string(),
                },
                NoteEffect::Fetch {
                    question_id: "a2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_advance_skips_persist_for_blank_id() {
        let bank = QuestionBank::from_questions(vec![
            question("", Category::Practice),
            question("p2", Category::Practice),
        ]);
        let mut session = StudySession::with_seed(bank, 7);
        session.set_reveal_gate(false);
        session.set_note_draft("draft with no home");

        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Moved { from: 0, to: 1 });
        assert_eq!(
            effects,
            vec![NoteEffect::Fetch {
                question_id: "p2".to_string(),
            }]
        );
    }

    #[test]
    fn test_gate_disabled_moves_immediately_and_keeps_reveal() {
        let mut session = session();
        session.set_reveal_gate(false);
        session.toggle_revealed();
        let (outcome, _) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Moved { from: 0, to: 1 });
        assert!(session.answer_revealed(), "reveal state must survive the move");
    }

    #[test]
    fn test_previous_clamps_at_start() {
        let mut session = session();
        session.set_reveal_gate(false);
        let (outcome, effects) = session.advance(Direction::Previous);
        assert_eq!(outcome, AdvanceOutcome::Pinned);
        assert_eq!(session.position(), 0);
        // The edge press still saves and reloads the current note.
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[1],
            NoteEffect::Fetch {
                question_id: "a1".to_string()
            }
        );
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut session = session();
        session.set_reveal_gate(false);
        for _ in 0..4 {
            let _ = session.advance(Direction::Next);
        }
        assert_eq!(session.position(), 4);
        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Pinned);
        assert_eq!(session.position(), 4);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_filter_rewinds_cursor_only() {
        let mut session = session();
        session.set_reveal_gate(false);
        let _ = session.advance(Direction::Next);
        session.toggle_revealed();
        session.set_note_draft("dirty draft");

        session.set_filter(CategoryFilter::Only(Category::Legislation));
        assert_eq!(session.position(), 0);
        assert_eq!(session.eligible_count(), 2);
        assert_eq!(session.current_question().unwrap().id, "l1");
        // Reveal state and draft carry over untouched.
        assert!(session.answer_revealed());
        assert_eq!(session.note_draft(), "dirty draft");
    }

    #[test]
    fn test_draft_carried_across_filter_saves_under_new_question() {
        let mut session = session();
        session.set_reveal_gate(false);
        session.set_note_draft("written while on a1");
        session.set_filter(CategoryFilter::Only(Category::Legislation));

        let (_, effects) = session.advance(Direction::Next);
        assert_eq!(
            effects[0],
            NoteEffect::Persist {
                question_id: "l1".to_string(),
                text: "written while on a1".to_string(),
            }
        );
    }

    #[test]
    fn test_filter_to_empty_category_pins() {
        let bank = QuestionBank::from_questions(vec![question("a1", Category::Aerodynamics)]);
        let mut session = StudySession::with_seed(bank, 1);
        session.set_reveal_gate(false);
        session.set_filter(CategoryFilter::Only(Category::Practice));
        assert!(session.current_question().is_none());
        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Pinned);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_empty_bank_advances_nowhere() {
        let mut session = StudySession::with_seed(QuestionBank::from_questions(Vec::new()), 1);
        session.set_reveal_gate(false);
        let (outcome, effects) = session.advance(Direction::Next);
        assert_eq!(outcome, AdvanceOutcome::Pinned);
        assert!(effects.is_empty());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_random_ordering_is_seed_deterministic() {
        let mut first = StudySession::with_seed(bank(), 42);
        let mut second = StudySession::with_seed(bank(), 42);
        first.set_reveal_gate(false);
        second.set_reveal_gate(false);
        first.set_ordering(OrderingMode::Random);
        second.set_ordering(OrderingMode::Random);

        for _ in 0..20 {
            let _ = first.advance(Direction::Next);
            let _ = second.advance(Direction::Next);
            assert_eq!(first.position(), second.position());
        }
    }

    #[test]
    fn test_random_ordering_ignores_direction() {
        let mut forward = StudySession::with_seed(bank(), 9);
        let mut backward = StudySession::with_seed(bank(), 9);
        forward.set_reveal_gate(false);
        backward.set_reveal_gate(false);
        forward.set_ordering(OrderingMode::Random);
        backward.set_ordering(OrderingMode::Random);

        for _ in 0..10 {
            let _ = forward.advance(Direction::Next);
            let _ = backward.advance(Direction::Previous);
            assert_eq!(forward.position(), backward.position());
        }
    }

    #[test]
    fn test_random_advance_hides_answer_again() {
        let mut session = session();
        session.set_ordering(OrderingMode::Random);
        let _ = session.advance(Direction::Next);
        assert!(session.answer_revealed());
        let _ = session.advance(Direction::Next);
        assert!(!session.answer_revealed());
    }

    #[test]
    fn test_apply_fetched_note_for_current_question() {
        let mut session = session();
        assert!(session.apply_fetched_note("a1", "stored note".to_string()));
        assert_eq!(session.note_draft(), "stored note");
    }

    #[test]
    fn test_apply_fetched_note_discards_stale_load() {
        let mut session = session();
        session.set_note_draft("fresh input");
        assert!(!session.apply_fetched_note("a2", "old note".to_string()));
        assert_eq!(session.note_draft(), "fresh input");
    }

    #[test]
    fn test_toggle_revealed_flips_without_moving() {
        let mut session = session();
        session.toggle_revealed();
        assert!(session.answer_revealed());
        assert_eq!(session.position(), 0);
        session.toggle_revealed();
        assert!(!session.answer_revealed());
    }

    #[test]
    fn test_option_emphasis_tracks_reveal_state() {
        let mut session = session();
        assert_eq!(session.option_emphasis(2), AnswerEmphasis::Normal);
        session.toggle_revealed();
        assert_eq!(session.option_emphasis(2), AnswerEmphasis::Emphasized);
        assert_eq!(session.option_emphasis(1), AnswerEmphasis::Dimmed);
    }

    #[test]
    fn test_option_emphasis_without_question_is_normal() {
        let session = StudySession::with_seed(QuestionBank::from_questions(Vec::new()), 1);
        assert_eq!(session.option_emphasis(1), AnswerEmphasis::Normal);
    }

    #[test]
    fn test_note_editing_operations() {
        let mut session = session();
        session.push_note_char('h');
        session.push_note_char('i');
        assert_eq!(session.note_draft(), "hi");
        session.backspace_note();
        assert_eq!(session.note_draft(), "h");
        session.backspace_note();
        session.backspace_note();
        assert_eq!(session.note_draft(), "");
    }

    #[test]
    fn test_view_reflects_state() {
        let mut session = session();
        session.set_note_draft("note");
        let view = session.view();
        assert_eq!(view.question.unwrap().id, "a1");
        assert_eq!(view.position, 0);
        assert_eq!(view.total, 5);
        assert_eq!(view.note_draft, "note");
        assert!(view.reveal_before_advance);
        assert!(!view.answer_revealed);
    }

    #[test]
    fn test_ordering_mode_serde_round_trip() {
        let json = serde_json::to_string(&OrderingMode::Random).unwrap();
        assert_eq!(json, "\"random\"");
        let mode: OrderingMode = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(mode, OrderingMode::Sequential);
    }
}
