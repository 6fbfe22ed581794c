//! Filtering, search, sorting and stats over the task list.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use super::task::{Priority, Task};

/// Completion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "unknown status '{}' (expected all, pending or completed)",
                other
            )),
        }
    }
}

/// Sort order for the board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// P1 first; ties keep board order
    #[default]
    Priority,
    /// Alphabetical by assignee, case-insensitive; ties keep board order
    Assignee,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(SortKey::Priority),
            "assignee" => Ok(SortKey::Assignee),
            other => Err(format!(
                "unknown sort key '{}' (expected priority or assignee)",
                other
            )),
        }
    }
}

/// Board view parameters. The default shows every task, sorted by priority.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// `None` means all priorities
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    /// Case-insensitive substring of description or assignee
    pub search: String,
    pub sort: SortKey,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        let priority_ok = self.priority.map_or(true, |p| task.priority == p);
        priority_ok && self.status.matches(task) && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        let needle = self.search.to_lowercase();
        task.description.to_lowercase().contains(&needle)
            || task.assignee.to_lowercase().contains(&needle)
    }

    /// Whether any filter narrows the view.
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.priority.is_some() || self.status != StatusFilter::All
    }

    /// Apply the query to `tasks`.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut view: Vec<&Task> = tasks.iter().filter(|t| self.matches(t)).collect();
        // sort_by is stable
        match self.sort {
            SortKey::Priority => view.sort_by(|a, b| a.priority.cmp(&b.priority)),
            SortKey::Assignee => view.sort_by(|a, b| compare_names(&a.assignee, &b.assignee)),
        }
        view
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Counters shown on the board header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// P1 tasks, completed or not
    pub high_priority: usize,
}

impl BoardStats {
    pub fn compute(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
            high_priority: tasks.iter().filter(|t| t.priority == Priority::P1).count(),
        }
    }
}

/// The task list behind each stats counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCategory {
    Total,
    Completed,
    Pending,
    HighPriority,
}

impl StatCategory {
    pub fn title(&self) -> &'static str {
        match self {
            StatCategory::Total => "All Tasks",
            StatCategory::Completed => "Completed Tasks",
            StatCategory::Pending => "Pending Tasks",
            StatCategory::HighPriority => "High Priority Tasks",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatCategory::Total => true,
            StatCategory::Completed => task.completed,
            StatCategory::Pending => !task.completed,
            StatCategory::HighPriority => task.priority == Priority::P1,
        }
    }
}

impl FromStr for StatCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Ok(StatCategory::Total),
            "completed" => Ok(StatCategory::Completed),
            "pending" => Ok(StatCategory::Pending),
            "high-priority" => Ok(StatCategory::HighPriority),
            other => Err(format!(
                "unknown category '{}' (expected total, completed, pending or high-priority)",
                other
            )),
        }
    }
}
