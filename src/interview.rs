//! Interview state machine
//!
//! One turn is a pure function of the prior state, the user's text and the
//! extractor's output. Callers load the state, run a turn, and persist the
//! returned state themselves.

pub mod persistence;
pub mod prompts;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use state::{InterviewState, Step, MAX_TASKS_PER_RESPONSIBILITY};
pub use transition::{Interviewer, TurnResult};

#[cfg(test)]
pub use state::{Role, Turn};
#[cfg(test)]
pub use transition::{apply_extraction, begin, repeat_prompt};
