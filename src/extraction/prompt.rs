//! Extraction prompt.

/// Instruction block placed before every transcript.
const INSTRUCTIONS: &str = r#"Analyze the following meeting transcript and extract actionable tasks. For each task, identify:
1. A clear, specific description of what needs to be done
2. Who is assigned to complete the task
3. When it's due (if mentioned, otherwise set as "No deadline")
4. Priority level (P1 for urgent/critical, P2 for important, P3 for normal)

Return ONLY a valid JSON array with this structure, and nothing else:
[
  {
    "description": "Task description",
    "assignee": "Person's name",
    "dueDate": "Due date or 'No deadline'",
    "priority": "P1" | "P2" | "P3"
  }
]
"#;

/// Build the prompt for `transcript`. The transcript is appended verbatim.
pub fn build_prompt(transcript: &str) -> String {
    format!("{}\nMeeting Transcript:\n{}\n", INSTRUCTIONS, transcript)
}
