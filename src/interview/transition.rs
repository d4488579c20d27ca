//! Turn processing
//!
//! `begin`, `repeat_prompt` and `apply_extraction` are pure. [`Interviewer`]
//! adds the one effect a turn has, the call to the injected extractor.

use super::{prompts, InterviewState, Step};
use crate::extraction::{Extraction, Extractor};
use std::sync::Arc;

/// Result of a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub new_state: InterviewState,
    pub reply: String,
}

/// Open (or reopen) the interview by asking for responsibilities.
///
/// Collected data is kept; only the step is rewound.
pub fn begin(state: &InterviewState) -> TurnResult {
    let mut next = state.clone();
    next.set_step(Step::CollectResponsibilities);
    next.set_pending_user_input(None);
    next.record_assistant(prompts::ASK_RESPONSIBILITIES);
    TurnResult {
        new_state: next,
        reply: prompts::ASK_RESPONSIBILITIES.to_string(),
    }
}

/// Answer a blank message: nothing changes and the last prompt is repeated
pub fn repeat_prompt(state: &InterviewState) -> TurnResult {
    let mut next = state.clone();
    next.set_pending_user_input(None);
    let reply = state
        .last_assistant_message()
        .unwrap_or_else(|| prompts::for_step(state.step()))
        .to_string();
    TurnResult {
        new_state: next,
        reply,
    }
}

/// Fold an extraction of the pending user input into the state and decide the
/// next step and reply.
pub fn apply_extraction(state: &InterviewState, extraction: Extraction) -> TurnResult {
    let Some(text) = state
        .pending_user_input()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return repeat_prompt(state);
    };

    let mut next = state.clone();
    next.record_user(text);
    next.merge_responsibilities(&extraction.responsibilities);
    next.merge_tasks(&extraction.tasks);

    let mut suggestion = extraction.suggested_reply;
    match next.step() {
        Step::CollectResponsibilities
            if !next.responsibilities().is_empty() && !next.has_any_task() =>
        {
            next.set_step(Step::CollectTasks);
            if suggestion.is_empty() {
                suggestion = prompts::ASK_TASKS.to_string();
            }
        }
        Step::CollectTasks if next.is_ready() => {
            next.set_step(Step::Review);
            if suggestion.is_empty() {
                suggestion = prompts::REVIEW.to_string();
            }
        }
        // Review has no outgoing transition; later answers are merged in place
        _ => {}
    }

    let reply = if suggestion.is_empty() {
        next.last_assistant_message()
            .unwrap_or(prompts::REVIEW)
            .to_string()
    } else {
        suggestion
    };

    next.record_assistant(&reply);
    next.set_pending_user_input(None);
    TurnResult {
        new_state: next,
        reply,
    }
}

/// Runs interview turns against an injected extractor
#[derive(Clone)]
pub struct Interviewer {
    extractor: Arc<dyn Extractor>,
}

impl Interviewer {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// First turn of an interview; never consults the extractor
    pub fn begin(&self, state: &InterviewState) -> TurnResult {
        begin(state)
    }

    /// Process one user answer
    pub async fn advance(&self, state: &InterviewState, text: &str) -> TurnResult {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(step = %state.step(), "Blank answer, repeating prompt");
            return repeat_prompt(state);
        }

        let mut working = state.clone();
        working.set_pending_user_input(Some(text.to_string()));

        let extraction = self
            .extractor
            .extract(working.step(), text, working.responsibilities())
            .await;

        tracing::debug!(
            extractor = %self.extractor.name(),
            responsibilities = extraction.responsibilities.len(),
            tasks = extraction.task_count(),
            "Extraction finished"
        );

        let result = apply_extraction(&working, extraction);

        tracing::info!(
            from = %state.step(),
            to = %result.new_state.step(),
            responsibilities = result.new_state.responsibilities().len(),
            turns = result.new_state.transcript().len(),
            ready = result.new_state.is_ready(),
            "Interview turn processed"
        );
        result
    }
}
