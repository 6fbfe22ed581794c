//! Local key-value persistence for the board.
//!
//! A single JSON file maps string keys to string values, the same shape as
//! browser local storage. The board uses two entries: the transcript text and
//! the JSON-serialized task list. Content that does not parse falls back to
//! defaults with a warning. A file that exists but cannot be read is an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::task::Task;
use super::Board;

pub const TRANSCRIPT_KEY: &str = "taskmaster-transcript";
pub const TASKS_KEY: &str = "taskmaster-tasks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Board store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize board store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed string key-value store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store at `path`. A missing file or unparsable content yields
    /// an empty store; any other read failure is an error, so a later save
    /// cannot overwrite data that merely could not be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Failed to parse board store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Write all entries to disk (temp file, then rename).
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let data = serde_json::to_vec_pretty(&self.entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        tracing::debug!("Saved board store to {}", self.path.display());
        Ok(())
    }

    /// Restore the board. A missing or corrupt task list yields the seed tasks.
    pub fn load_board(&self) -> Board {
        let transcript = self.get(TRANSCRIPT_KEY).unwrap_or_default().to_string();
        let tasks = match self.get(TASKS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<Task>>(raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!("Error parsing saved tasks, using defaults: {}", e);
                    Task::seed()
                }
            },
            None => Task::seed(),
        };
        Board::new(tasks, transcript)
    }

    /// Persist both board entries.
    pub fn save_board(&mut self, board: &Board) -> Result<(), StoreError> {
        let tasks = serde_json::to_string(board.tasks())?;
        self.set(TRANSCRIPT_KEY, board.transcript());
        self.set(TASKS_KEY, tasks);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NewTask, Priority};
    use crate::extraction::TaskCandidate;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> LocalStore {
        LocalStore::open(dir.path().join("nested").join("board.json")).unwrap()
    }

    #[test]
    fn test_missing_file_loads_seed_board() {
        let dir = TempDir::new().unwrap();
        let board = store_in(&dir).load_board();
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_board_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut board = Board::default();
        board.toggle("2").unwrap();
        board
            .add_task(NewTask {
                description: "Prepare the client presentation".to_string(),
                assignee: "Sarah".to_string(),
                due_date: Some("next Tuesday".to_string()),
                priority: Priority::P1,
            })
            .unwrap();
        board.merge_extracted(&[TaskCandidate::from(json!({ "description": "From the model" }))]);
        board.set_transcript("Sarah: I'll do the presentation.");

        let mut store = store_in(&dir);
        store.save_board(&board).unwrap();

        let reloaded = LocalStore::open(store.path()).unwrap().load_board();
        assert_eq!(reloaded, board);
    }

    #[test]
    fn test_corrupt_task_list_falls_back_to_seed_and_keeps_transcript() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(TRANSCRIPT_KEY, "draft transcript");
        store.set(TASKS_KEY, "[{\"id\": 1, oops");
        store.save().unwrap();

        let board = LocalStore::open(store.path()).unwrap().load_board();
        assert_eq!(board.tasks(), Task::seed().as_slice());
        assert_eq!(board.transcript(), "draft transcript");
    }

    #[test]
    fn test_corrupt_store_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get(TASKS_KEY), None);
        assert_eq!(store.load_board(), Board::default());
    }

    #[test]
    fn test_reads_browser_style_task_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(
            TASKS_KEY,
            r#"[{"id":"17290000000000","description":"Ship","assignee":"Aman","dueDate":"Friday","priority":"P1","completed":true}]"#,
        );
        let board = store.load_board();
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].due_date, "Friday");
        assert!(board.tasks()[0].completed);
    }

    #[test]
    fn test_unknown_priority_keeps_every_saved_task() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(
            TASKS_KEY,
            r#"[
                {"id":"a","description":"Ship","assignee":"Aman","dueDate":"Friday","priority":"P1","completed":false},
                {"id":"b","description":"Review","assignee":"Rajeev","dueDate":"No deadline","priority":"P9","completed":true}
            ]"#,
        );
        store.save().unwrap();

        let board = LocalStore::open(store.path()).unwrap().load_board();
        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.tasks()[0].id, "a");
        assert_eq!(board.tasks()[0].priority, Priority::P1);
        assert_eq!(board.tasks()[1].id, "b");
        assert_eq!(board.tasks()[1].priority, Priority::P3);
        assert!(board.tasks()[1].completed);
    }

    #[test]
    fn test_unreadable_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        // a directory in place of the file fails to read with something other than NotFound
        let path = dir.path().join("board.json");
        std::fs::create_dir(&path).unwrap();

        let err = LocalStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save_board(&Board::default()).unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
