//! Background note worker.
//!
//! The UI never blocks on storage. Session transitions queue
//! [`NoteCommand`]s through a channel and a single blocking task works
//! them off strictly in order, so a persist for the outgoing question
//! always lands before the fetch for the incoming one.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::NoteStore;

/// Work order for the note worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    /// Save note text under a question.
    Persist {
        /// Question the note belongs to.
        question_id: String,
        /// Note text to store.
        text: String,
    },
    /// Load the note for a question.
    Fetch {
        /// Question to load the note for.
        question_id: String,
    },
}

/// Answer produced by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    /// A fetch completed.
    Loaded {
        /// Question the note belongs to.
        question_id: String,
        /// Stored note text, empty when none exists.
        text: String,
    },
}

/// Cloneable sending half handed to the UI.
#[derive(Debug, Clone)]
pub struct NotesHandle {
    tx: UnboundedSender<NoteCommand>,
}

impl NotesHandle {
    /// Queues a save for the given question.
    pub fn persist(&self, question_id: impl Into<String>, text: impl Into<String>) {
        self.send(NoteCommand::Persist {
            question_id: question_id.into(),
            text: text.into(),
        });
    }

    /// Queues a load for the given question.
    pub fn fetch(&self, question_id: impl Into<String>) {
        self.send(NoteCommand::Fetch {
            question_id: question_id.into(),
        });
    }

    fn send(&self, command: NoteCommand) {
        if self.tx.send(command).is_err() {
            warn!("note worker gone, dropping command");
        }
    }
}

/// Creates a command channel without spawning a worker.
///
/// Tests use this to drive the receiving end directly.
#[must_use]
pub fn channel() -> (NotesHandle, UnboundedReceiver<NoteCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NotesHandle { tx }, rx)
}

/// A running note worker.
#[derive(Debug)]
pub struct NotesWorker {
    /// Sends commands to the worker task.
    pub handle: NotesHandle,
    /// Receives fetch results.
    pub events: UnboundedReceiver<NoteEvent>,
    /// The worker task, joined on shutdown.
    pub task: JoinHandle<()>,
}

impl NotesWorker {
    /// Spawns the worker onto a runtime.
    ///
    /// The worker takes ownership of the store and runs on the
    /// blocking pool. Dropping every [`NotesHandle`] clone lets the
    /// queue drain and the task end, so shutdown is: drop the handle,
    /// then join `task`.
    #[must_use]
    pub fn spawn(store: NoteStore, runtime: &Handle) -> Self {
        let (handle, mut commands) = channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let task = runtime.spawn_blocking(move || {
            let mut store = store;
            while let Some(command) = commands.blocking_recv() {
                match command {
                    NoteCommand::Persist { question_id, text } => {
                        if store.save(&question_id, &text).is_none() {
                            warn!(question_id, "note dropped, no backend accepted it");
                        }
                    }
                    NoteCommand::Fetch { question_id } => {
                        let text = store.load(&question_id);
                        if event_tx
                            .send(NoteEvent::Loaded { question_id, text })
                            .is_err()
                        {
                            // Nobody listens for answers any more, but
                            // queued saves must still land.
                            debug!("dropping fetch result, no listener");
                        }
                    }
                }
            }
            debug!("note worker finished");
        });

        Self {
            handle,
            events,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::Result;
    use crate::notes::sqlite::SqliteNotes;
    use crate::notes::{note_key, NoteBackend};

    fn store_with(entries: &[(&str, &str)]) -> NoteStore {
        let mut backend = SqliteNotes::open_in_memory().unwrap();
        for (question_id, text) in entries {
            backend.put(&note_key(question_id), text).unwrap();
        }
        NoteStore::with_backends(Some(Box::new(backend)), None)
    }

    /// Backend whose entries stay visible after the store moves into
    /// the worker task.
    #[derive(Debug, Default)]
    struct SharedBackend {
        entries: Arc<Mutex<BTreeMap<String, String>>>,
    }

    impl NoteBackend for SharedBackend {
        fn name(&self) -> &'static str {
            "shared"
        }

        fn put(&mut self, key: &str, text: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), text.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn keys(&self) -> Result<Vec<String>> {
            Ok(self.entries.lock().unwrap().keys().cloned().collect())
        }

        fn remove(&mut self, key: &str) -> Result<bool> {
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_stored_note() {
        let store = store_with(&[("1001", "centre of pressure moves forward")]);
        let NotesWorker {
            handle,
            mut events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        handle.fetch("1001");
        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            NoteEvent::Loaded {
                question_id: "1001".to_string(),
                text: "centre of pressure moves forward".to_string(),
            }
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_missing_note_loads_empty() {
        let store = store_with(&[]);
        let NotesWorker {
            handle,
            mut events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        handle.fetch("9999");
        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            NoteEvent::Loaded {
                question_id: "9999".to_string(),
                text: String::new(),
            }
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_persist_lands_before_following_fetch() {
        let store = store_with(&[]);
        let NotesWorker {
            handle,
            mut events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        handle.persist("2001", "written just now");
        handle.fetch("2001");

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            NoteEvent::Loaded {
                question_id: "2001".to_string(),
                text: "written just now".to_string(),
            }
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_processed_in_order() {
        let store = store_with(&[]);
        let NotesWorker {
            handle,
            mut events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        handle.persist("1", "one");
        handle.persist("2", "two");
        handle.fetch("1");
        handle.fetch("2");

        let first = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();
        assert_eq!(
            first,
            NoteEvent::Loaded {
                question_id: "1".to_string(),
                text: "one".to_string(),
            }
        );
        assert_eq!(
            second,
            NoteEvent::Loaded {
                question_id: "2".to_string(),
                text: "two".to_string(),
            }
        );

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_ends_when_handles_drop() {
        let store = store_with(&[]);
        let NotesWorker {
            handle,
            mut events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        handle.persist("1001", "last words");
        drop(handle);

        // Queue drains, then the task ends and the event stream closes.
        task.await.unwrap();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_backlog_drains_after_event_receiver_drops() {
        let backend = SharedBackend::default();
        let entries = Arc::clone(&backend.entries);
        let store = NoteStore::with_backends(Some(Box::new(backend)), None);
        let NotesWorker {
            handle,
            events,
            task,
        } = NotesWorker::spawn(store, &Handle::current());

        // The UI side is gone before the backlog is worked off. The
        // fetch answer has nowhere to go; the save queued behind it
        // must land anyway.
        drop(events);
        handle.persist("1001", "first draft");
        handle.fetch("1001");
        handle.persist("1001", "saved on quit");
        drop(handle);

        task.await.unwrap();
        assert_eq!(
            entries.lock().unwrap().get(&note_key("1001")),
            Some(&"saved on quit".to_string())
        );
    }

    #[test]
    fn test_channel_without_worker_collects_commands() {
        let (handle, mut commands) = channel();
        handle.persist("1001", "draft");
        handle.fetch("1002");

        assert_eq!(
            commands.try_recv().unwrap(),
            NoteCommand::Persist {
                question_id: "1001".to_string(),
                text: "draft".to_string(),
            }
        );
        assert_eq!(
            commands.try_recv().unwrap(),
            NoteCommand::Fetch {
                question_id: "1002".to_string(),
            }
        );
    }

    #[test]
    fn test_send_after_receiver_drop_does_not_panic() {
        let (handle, commands) = channel();
        drop(commands);
        handle.persist("1001", "goes nowhere");
        handle.fetch("1001");
    }
}
