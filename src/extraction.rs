//! Extraction of responsibilities and tasks from free text
//!
//! An [`Extractor`] turns one user answer into candidate responsibilities,
//! task buckets and an optional suggested reply. The deterministic
//! [`FallbackExtractor`] always works; the [`RemoteExtractor`] asks a language
//! model first and degrades to the fallback on any failure.

mod fallback;
mod remote;

#[cfg(test)]
mod proptests;

pub use fallback::FallbackExtractor;
pub use remote::RemoteExtractor;

use crate::interview::{Step, MAX_TASKS_PER_RESPONSIBILITY};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Most responsibilities a single extraction may return
pub const MAX_RESPONSIBILITIES: usize = 7;

/// Candidates extracted from one user answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub responsibilities: Vec<String>,
    pub tasks: BTreeMap<String, Vec<String>>,
    /// Empty when the extractor has nothing to suggest
    pub suggested_reply: String,
}

impl Extraction {
    /// Trim every string, drop blank ones and apply the size caps
    pub fn normalized(self) -> Self {
        let responsibilities = self
            .responsibilities
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .take(MAX_RESPONSIBILITIES)
            .collect();

        let tasks = self
            .tasks
            .into_iter()
            .map(|(responsibility, items)| {
                let items = items
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .take(MAX_TASKS_PER_RESPONSIBILITY)
                    .collect();
                (responsibility.trim().to_string(), items)
            })
            .filter(|(responsibility, _)| !responsibility.is_empty())
            .collect();

        Self {
            responsibilities,
            tasks,
            suggested_reply: self.suggested_reply.trim().to_string(),
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }
}

/// Capability that converts raw answer text into structured candidates.
///
/// Implementations never fail: anything that goes wrong inside them must be
/// absorbed and turned into a (possibly empty) [`Extraction`].
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, step: Step, text: &str, known_responsibilities: &[String])
        -> Extraction;

    /// Short name for logs
    fn name(&self) -> &str;
}
