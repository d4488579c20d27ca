//! Interview state types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Most tasks kept per responsibility
pub const MAX_TASKS_PER_RESPONSIBILITY: usize = 7;

// ============================================================================
// Step
// ============================================================================

/// Interview step awaiting user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    CollectResponsibilities,
    CollectTasks,
    Review,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::CollectResponsibilities => "collect_responsibilities",
            Step::CollectTasks => "collect_tasks",
            Step::Review => "review",
        }
    }

    /// Parse a persisted step name, including the short names older blobs used
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "collect_responsibilities" | "ask_resp" => Some(Step::CollectResponsibilities),
            "collect_tasks" | "ask_tasks" => Some(Step::CollectTasks),
            "review" => Some(Step::Review),
            _ => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// Who spoke a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

/// One entry of the interview transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Interview State
// ============================================================================

/// Accumulated result of an interview.
///
/// Fields are private so that the duplicate-free and bucket-cap invariants
/// hold for every value of this type, including ones rehydrated from a
/// persisted blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StateRecord")]
pub struct InterviewState {
    responsibilities: Vec<String>,
    tasks: BTreeMap<String, Vec<String>>,
    pending_step: Step,
    last_assistant_message: Option<String>,
    transcript: Vec<Turn>,
    /// Raw text of the turn being processed; never persisted
    #[serde(skip)]
    pending_user_input: Option<String>,
}

impl InterviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from raw parts, enforcing the collection invariants
    pub fn from_parts(
        responsibilities: Vec<String>,
        tasks: BTreeMap<String, Vec<String>>,
        pending_step: Step,
        last_assistant_message: Option<String>,
        transcript: Vec<Turn>,
    ) -> Self {
        let mut state = Self {
            pending_step,
            last_assistant_message: last_assistant_message.filter(|m| !m.trim().is_empty()),
            transcript,
            ..Self::default()
        };
        state.merge_responsibilities(&responsibilities);
        state.merge_tasks(&tasks);
        state
    }

    pub fn responsibilities(&self) -> &[String] {
        &self.responsibilities
    }

    pub fn tasks(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tasks
    }

    /// Tasks collected for one responsibility (empty if none)
    pub fn tasks_for(&self, responsibility: &str) -> &[String] {
        self.tasks
            .get(responsibility)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn step(&self) -> Step {
        self.pending_step
    }

    pub fn last_assistant_message(&self) -> Option<&str> {
        self.last_assistant_message.as_deref()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn pending_user_input(&self) -> Option<&str> {
        self.pending_user_input.as_deref()
    }

    /// Append candidates that are not yet known, keeping first-seen order
    pub fn merge_responsibilities(&mut self, candidates: &[String]) {
        for candidate in candidates {
            if !self.responsibilities.contains(candidate) {
                self.responsibilities.push(candidate.clone());
            }
        }
    }

    /// Append new tasks to each named bucket, then cap the bucket.
    ///
    /// The earliest entries survive the cap, so items arriving after a bucket
    /// is full are dropped.
    pub fn merge_tasks(&mut self, candidates: &BTreeMap<String, Vec<String>>) {
        for (responsibility, items) in candidates {
            if items.is_empty() {
                continue;
            }
            let bucket = self.tasks.entry(responsibility.clone()).or_default();
            for item in items {
                if !bucket.contains(item) {
                    bucket.push(item.clone());
                }
            }
            bucket.truncate(MAX_TASKS_PER_RESPONSIBILITY);
        }
    }

    /// Every known responsibility has at least one task
    pub fn is_ready(&self) -> bool {
        !self.responsibilities.is_empty()
            && self
                .responsibilities
                .iter()
                .all(|r| !self.tasks_for(r).is_empty())
    }

    /// Any known responsibility already has a task
    pub fn has_any_task(&self) -> bool {
        self.responsibilities
            .iter()
            .any(|r| !self.tasks_for(r).is_empty())
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.pending_step = step;
    }

    pub(crate) fn set_pending_user_input(&mut self, text: Option<String>) {
        self.pending_user_input = text;
    }

    /// Record an assistant reply as both the last message and a transcript turn
    pub(crate) fn record_assistant(&mut self, reply: &str) {
        self.last_assistant_message = Some(reply.to_string());
        self.transcript.push(Turn::assistant(reply));
    }

    pub(crate) fn record_user(&mut self, text: &str) {
        self.transcript.push(Turn::user(text));
    }
}

// ============================================================================
// Persisted shape
// ============================================================================

/// Lenient view of a persisted blob.
///
/// Accepts both the current field names and the ones written by earlier
/// versions; `null` collections count as empty.
#[derive(Debug, Default, Deserialize)]
struct StateRecord {
    #[serde(default, alias = "responsabilidades")]
    responsibilities: Option<Vec<String>>,
    #[serde(default, alias = "tareas")]
    tasks: Option<BTreeMap<String, Option<Vec<String>>>>,
    #[serde(default)]
    pending_step: Option<String>,
    #[serde(default, alias = "last_assistant")]
    last_assistant_message: Option<String>,
    #[serde(default, alias = "thread")]
    transcript: Option<Vec<Value>>,
}

impl From<StateRecord> for InterviewState {
    fn from(record: StateRecord) -> Self {
        let tasks = record
            .tasks
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect();

        let pending_step = record
            .pending_step
            .as_deref()
            .and_then(Step::parse)
            .unwrap_or_default();

        // Entries that are not objects are skipped; missing fields default
        let transcript = record
            .transcript
            .unwrap_or_default()
            .into_iter()
            .filter(Value::is_object)
            .map(|entry| Turn {
                role: entry
                    .get("role")
                    .cloned()
                    .and_then(|r| serde_json::from_value(r).ok())
                    .unwrap_or_default(),
                content: entry
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        InterviewState::from_parts(
            record.responsibilities.unwrap_or_default(),
            tasks,
            pending_step,
            record.last_assistant_message,
            transcript,
        )
    }
}
