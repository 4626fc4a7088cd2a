//! Application state and input handling for the study screen.
//!
//! `App` wraps the session state machine, routes key presses by input
//! mode, and turns session note effects into commands for the note
//! worker. Rendering lives in [`super::ui`].

use crossterm::event::{Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::trace;

use crate::keymap::{Intent, KeyBindings};
use crate::notes::worker::{NoteEvent, NotesHandle};
use crate::question::{Category, CategoryFilter};
use crate::session::{Direction, NoteEffect, OrderingMode, StudySession};

/// Where key presses are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal study navigation.
    #[default]
    Browse,
    /// Typing into the note pane.
    EditNote,
    /// Help overlay is visible.
    Help,
    /// Application is shutting down.
    Quitting,
}

/// Top-level TUI state.
#[derive(Debug)]
pub struct App {
    /// The study session being driven.
    pub session: StudySession,
    /// Key bindings for browse mode.
    pub bindings: KeyBindings,
    /// Current input mode.
    pub mode: InputMode,
    notes: NotesHandle,
    note_events: UnboundedReceiver<NoteEvent>,
    needs_redraw: bool,
}

impl App {
    /// Creates the application and requests the note for the question
    /// already on screen.
    pub fn new(
        session: StudySession,
        bindings: KeyBindings,
        notes: NotesHandle,
        note_events: UnboundedReceiver<NoteEvent>,
    ) -> Self {
        let app = Self {
            session,
            bindings,
            mode: InputMode::Browse,
            notes,
            note_events,
            needs_redraw: true,
        };
        if let Some(question) = app.session.current_question() {
            app.notes.fetch(question.id.clone());
        }
        app
    }

    /// Handles one terminal event. Key releases and repeats are ignored.
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Resize(..) = event {
            self.request_redraw();
            return;
        }
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            InputMode::Browse => self.handle_browse_key(key.code),
            InputMode::EditNote => self.handle_edit_key(key.code),
            InputMode::Help => self.mode = InputMode::Browse,
            InputMode::Quitting => {}
        }
        self.request_redraw();
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                if let Some(filter) = filter_for_digit(c) {
                    self.session.set_filter(filter);
                } else if let Some(intent) = self.bindings.intent_for(c) {
                    self.apply_intent(intent);
                }
            }
            KeyCode::Enter => self.mode = InputMode::EditNote,
            KeyCode::Right => self.advance(Direction::Next),
            KeyCode::Left => self.advance(Direction::Previous),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = InputMode::Browse,
            KeyCode::Enter => self.session.push_note_char('\n'),
            KeyCode::Backspace => self.session.backspace_note(),
            KeyCode::Char(c) => self.session.push_note_char(c),
            _ => {}
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::NextQuestion => self.advance(Direction::Next),
            Intent::PreviousQuestion => self.advance(Direction::Previous),
            Intent::ToggleAnswer => self.session.toggle_revealed(),
            Intent::ToggleRevealGate => self.session.toggle_reveal_gate(),
            Intent::UseRandomOrder => self.session.set_ordering(OrderingMode::Random),
            Intent::UseSequentialOrder => self.session.set_ordering(OrderingMode::Sequential),
            Intent::EditNote => self.mode = InputMode::EditNote,
            Intent::Quit => self.quit(),
            Intent::Help => self.mode = InputMode::Help,
        }
    }

    fn advance(&mut self, direction: Direction) {
        let (outcome, effects) = self.session.advance(direction);
        trace!(?direction, ?outcome, "advance");
        self.dispatch(effects);
    }

    fn dispatch(&mut self, effects: Vec<NoteEffect>) {
        for effect in effects {
            match effect {
                NoteEffect::Persist { question_id, text } => self.notes.persist(question_id, text),
                NoteEffect::Fetch { question_id } => self.notes.fetch(question_id),
            }
        }
    }

    /// Saves the draft for the question on screen and begins shutdown.
    pub fn quit(&mut self) {
        // Same blank-id rule as an advance.
        if let Some(question) = self
            .session
            .current_question()
            .filter(|question| !question.id.is_empty())
        {
            self.notes
                .persist(question.id.clone(), self.session.note_draft().to_string());
        }
        self.mode = InputMode::Quitting;
    }

    /// Applies note texts loaded by the worker since the last call.
    pub fn drain_note_events(&mut self) {
        while let Ok(event) = self.note_events.try_recv() {
            match event {
                NoteEvent::Loaded { question_id, text } => {
                    if self.session.apply_fetched_note(&question_id, text) {
                        self.request_redraw();
                    }
                }
            }
        }
    }

    /// Whether the event loop should exit.
    pub fn should_quit(&self) -> bool {
        self.mode == InputMode::Quitting
    }

    /// Marks the screen as stale.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        let needed = self.needs_redraw;
        self.needs_redraw = false;
        needed
    }
}

/// Maps the digit row to category filters. `0` shows every category,
/// `1` through `5` pick one in display order.
fn filter_for_digit(c: char) -> Option<CategoryFilter> {
    match c {
        '0' => Some(CategoryFilter::All),
        '1'..='5' => {
            let index = c as usize - '1' as usize;
            Category::ALL.get(index).copied().map(CategoryFilter::Only)
        }
        _ => None,
    }
}
