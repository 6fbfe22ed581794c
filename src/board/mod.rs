//! Client-side task board.
//!
//! [`Board`] is the application state: the authoritative task list plus the
//! transcript being edited. It is passed around explicitly; nothing here is
//! global. Persistence lives in [`store`], the HTTP call to the extraction
//! service in [`client`].

pub mod client;
pub mod query;
pub mod store;
pub mod task;

pub use client::{ClientError, ExtractionClient};
pub use query::{BoardStats, SortKey, StatCategory, StatusFilter, TaskQuery};
pub use store::{LocalStore, StoreError};
pub use task::{format_due_date, NewTask, Priority, Task};

use thiserror::Error;

use crate::extraction::TaskCandidate;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Task description is required")]
    MissingDescription,

    #[error("Task assignee is required")]
    MissingAssignee,

    #[error("Task {0} not found")]
    NotFound(String),
}

/// Board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tasks: Vec<Task>,
    transcript: String,
}

impl Default for Board {
    /// A fresh board holding the seed tasks.
    fn default() -> Self {
        Self::new(Task::seed(), String::new())
    }
}

impl Board {
    pub fn new(tasks: Vec<Task>, transcript: String) -> Self {
        Self { tasks, transcript }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn set_transcript(&mut self, transcript: impl Into<String>) {
        self.transcript = transcript.into();
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a manually entered task. Description and assignee are trimmed and
    /// must not be empty.
    pub fn add_task(&mut self, new: NewTask) -> Result<&Task, BoardError> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(BoardError::MissingDescription);
        }
        let assignee = new.assignee.trim();
        if assignee.is_empty() {
            return Err(BoardError::MissingAssignee);
        }

        let task = Task {
            id: self.fresh_id(),
            description: description.to_string(),
            assignee: assignee.to_string(),
            due_date: format_due_date(new.due_date.as_deref()),
            priority: new.priority,
            completed: false,
        };
        tracing::debug!("Adding task {}", task.id);
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flip the completed flag of task `id`.
    pub fn toggle(&mut self, id: &str) -> Result<&Task, BoardError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        task.completed = !task.completed;
        Ok(task)
    }

    /// Remove task `id`, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Task, BoardError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }

    /// Normalize `candidates` and append them in order. Returns the new tasks.
    pub fn merge_extracted(&mut self, candidates: &[TaskCandidate]) -> Vec<Task> {
        let mut added = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut task = Task::from_candidate(candidate);
            // ids loaded from an old store are arbitrary strings
            while self.get(&task.id).is_some() {
                task.id = task::new_task_id();
            }
            self.tasks.push(task.clone());
            added.push(task);
        }
        tracing::info!("Merged {} extracted tasks into the board", added.len());
        added
    }

    /// Tasks matching `query`, in display order.
    pub fn view(&self, query: &TaskQuery) -> Vec<&Task> {
        query.apply(&self.tasks)
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::compute(&self.tasks)
    }

    /// Tasks counted by one stats counter, in board order.
    pub fn tasks_in(&self, category: StatCategory) -> Vec<&Task> {
        self.tasks.iter().filter(|t| category.matches(t)).collect()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = task::new_task_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
