//! Task model and candidate normalization.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::extraction::TaskCandidate;

pub const UNTITLED_TASK: &str = "Untitled task";
pub const UNASSIGNED: &str = "Unassigned";
pub const NO_DEADLINE: &str = "No deadline";

/// Task priority. `P1` is the most urgent and sorts first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    /// Short label shown next to the code.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "High",
            Priority::P2 => "Medium",
            Priority::P3 => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}' (expected P1, P2 or P3)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub assignee: String,
    /// Free text: a human-readable date or [`NO_DEADLINE`]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    pub completed: bool,
}

/// Stored boards may hold any priority text; anything but P1/P2/P3 reads as P3.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw.as_ref().and_then(Value::as_str) {
        Some(text) => text.parse().unwrap_or_else(|_| {
            tracing::warn!("Stored priority '{}' is not P1/P2/P3, using P3", text);
            Priority::P3
        }),
        None => Priority::P3,
    })
}

/// Fields for a manually created task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub assignee: String,
    /// `None` or blank means no deadline
    pub due_date: Option<String>,
    pub priority: Priority,
}

/// Generate a task id, unique within and across sessions.
pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}

impl Task {
    /// Normalize an untrusted candidate. Never fails: missing or unusable
    /// fields take their defaults, and the id is always fresh.
    pub fn from_candidate(candidate: &TaskCandidate) -> Self {
        let priority = match truthy_text(candidate.field("priority")) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Candidate priority '{}' is not P1/P2/P3, using P3", raw);
                Priority::P3
            }),
            None => Priority::P3,
        };

        Self {
            id: new_task_id(),
            description: truthy_text(candidate.field("description"))
                .unwrap_or_else(|| UNTITLED_TASK.to_string()),
            assignee: truthy_text(candidate.field("assignee"))
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            due_date: truthy_text(candidate.field("dueDate"))
                .unwrap_or_else(|| NO_DEADLINE.to_string()),
            priority,
            completed: false,
        }
    }

    /// The example tasks shown on a fresh board.
    pub fn seed() -> Vec<Task> {
        vec![
            Task {
                id: "1".to_string(),
                description: "Take the landing page".to_string(),
                assignee: "Aman".to_string(),
                due_date: "10:00 PM, Tomorrow".to_string(),
                priority: Priority::P3,
                completed: false,
            },
            Task {
                id: "2".to_string(),
                description: "Client follow-up".to_string(),
                assignee: "Rajeev".to_string(),
                due_date: "Wednesday".to_string(),
                priority: Priority::P2,
                completed: false,
            },
            Task {
                id: "3".to_string(),
                description: "Review the marketing deck".to_string(),
                assignee: "Shreya".to_string(),
                due_date: "Tonight".to_string(),
                priority: Priority::P1,
                completed: true,
            },
        ]
    }
}

/// Text of a truthy JSON value: non-empty strings verbatim, non-zero numbers
/// and `true` rendered. Everything else (null, false, 0, "", arrays, objects)
/// counts as absent.
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(true, |f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Render a manually entered due date.
///
/// `YYYY-MM-DD HH:MM` and `YYYY-MM-DD` are spelled out
/// (`Tuesday, October 20, 2026 at 5:00 PM`); any other text is kept as typed.
/// Blank input means no deadline.
pub fn format_due_date(input: Option<&str>) -> String {
    let input = match input.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return NO_DEADLINE.to_string(),
    };

    for pattern in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, pattern) {
            return dt.format("%A, %B %-d, %Y at %-I:%M %p").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.format("%A, %B %-d, %Y").to_string();
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn candidate(value: Value) -> TaskCandidate {
        TaskCandidate(value)
    }

    #[test]
    fn test_empty_candidate_gets_all_defaults() {
        let task = Task::from_candidate(&candidate(json!({})));
        assert_eq!(task.description, UNTITLED_TASK);
        assert_eq!(task.assignee, UNASSIGNED);
        assert_eq!(task.due_date, NO_DEADLINE);
        assert_eq!(task.priority, Priority::P3);
        assert!(!task.completed);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_full_candidate_is_kept_verbatim() {
        let task = Task::from_candidate(&candidate(json!({
            "description": "Finish the homepage design",
            "assignee": "John",
            "dueDate": "Friday",
            "priority": "P1"
        })));
        assert_eq!(task.description, "Finish the homepage design");
        assert_eq!(task.assignee, "John");
        assert_eq!(task.due_date, "Friday");
        assert_eq!(task.priority, Priority::P1);
        assert!(!task.completed);
    }

    #[test]
    fn test_falsy_values_take_defaults() {
        let task = Task::from_candidate(&candidate(json!({
            "description": "",
            "assignee": null,
            "dueDate": false,
            "priority": 0
        })));
        assert_eq!(task.description, UNTITLED_TASK);
        assert_eq!(task.assignee, UNASSIGNED);
        assert_eq!(task.due_date, NO_DEADLINE);
        assert_eq!(task.priority, Priority::P3);
    }

    #[test]
    fn test_unexpected_types_do_not_fail() {
        let task = Task::from_candidate(&candidate(json!({
            "description": ["a", "b"],
            "assignee": { "name": "Sarah" },
            "dueDate": 20261020,
            "completed": true
        })));
        assert_eq!(task.description, UNTITLED_TASK);
        assert_eq!(task.assignee, UNASSIGNED);
        assert_eq!(task.due_date, "20261020");
        assert!(!task.completed);
    }

    #[test]
    fn test_non_object_candidate_normalizes_to_defaults() {
        for value in [json!(42), json!("text"), json!(null), json!([1, 2])] {
            let task = Task::from_candidate(&candidate(value));
            assert_eq!(task.description, UNTITLED_TASK);
            assert_eq!(task.priority, Priority::P3);
        }
    }

    #[test]
    fn test_out_of_set_priority_is_clamped_to_p3() {
        let task = Task::from_candidate(&candidate(json!({ "priority": "P9" })));
        assert_eq!(task.priority, Priority::P3);
        let task = Task::from_candidate(&candidate(json!({ "priority": "urgent" })));
        assert_eq!(task.priority, Priority::P3);
    }

    #[test]
    fn test_priority_parsing_tolerates_case_and_whitespace() {
        let task = Task::from_candidate(&candidate(json!({ "priority": " p2 " })));
        assert_eq!(task.priority, Priority::P2);
    }

    #[test]
    fn test_normalization_is_idempotent_modulo_id() {
        let c = candidate(json!({ "description": "Ship", "priority": "P1" }));
        let a = Task::from_candidate(&c);
        let b = Task::from_candidate(&c);
        assert_ne!(a.id, b.id);
        assert_eq!(Task { id: b.id.clone(), ..a }, b);
    }

    #[test]
    fn test_batch_ids_are_distinct() {
        let ids: HashSet<String> = (0..100)
            .map(|_| Task::from_candidate(&candidate(json!({}))).id)
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = &Task::seed()[1];
        let value = serde_json::to_value(task).unwrap();
        assert_eq!(value["dueDate"], "Wednesday");
        assert_eq!(value["priority"], "P2");
        assert_eq!(value["completed"], false);
    }

    #[test]
    fn test_stored_priority_is_read_leniently() {
        let tasks: Vec<Task> = serde_json::from_value(json!([
            { "id": "a", "description": "x", "assignee": "y", "dueDate": "z", "priority": "p1", "completed": false },
            { "id": "b", "description": "x", "assignee": "y", "dueDate": "z", "priority": "P9", "completed": false },
            { "id": "c", "description": "x", "assignee": "y", "dueDate": "z", "priority": null, "completed": false },
            { "id": "d", "description": "x", "assignee": "y", "dueDate": "z", "completed": true }
        ]))
        .unwrap();
        let priorities: Vec<Priority> = tasks.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::P1, Priority::P3, Priority::P3, Priority::P3]
        );
        assert_eq!(Priority::default(), Priority::P3);
    }

    #[test]
    fn test_priority_orders_p1_first() {
        let mut priorities = vec![Priority::P3, Priority::P1, Priority::P2];
        priorities.sort();
        assert_eq!(priorities, Priority::ALL.to_vec());
        assert!("P4".parse::<Priority>().is_err());
    }

    #[test]
    fn test_due_date_formatting() {
        assert_eq!(format_due_date(None), NO_DEADLINE);
        assert_eq!(format_due_date(Some("   ")), NO_DEADLINE);
        assert_eq!(format_due_date(Some(" next sprint ")), "next sprint");
        assert_eq!(
            format_due_date(Some("2026-10-20 17:00")),
            "Tuesday, October 20, 2026 at 5:00 PM"
        );
        assert_eq!(format_due_date(Some("2026-10-20")), "Tuesday, October 20, 2026");
    }
}
