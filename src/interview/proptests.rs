//! Property-based tests for the interview state machine

use super::persistence;
use super::*;
use crate::extraction::Extraction;
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    "[A-E]"
}

fn arb_task() -> impl Strategy<Value = String> {
    "t[0-9]{1,2}"
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::CollectResponsibilities),
        Just(Step::CollectTasks),
        Just(Step::Review),
    ]
}

fn arb_tasks() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    proptest::collection::btree_map(
        arb_name(),
        proptest::collection::vec(arb_task(), 0..10),
        0..4,
    )
}

fn arb_extraction() -> impl Strategy<Value = Extraction> {
    (
        proptest::collection::vec(arb_name(), 0..4),
        arb_tasks(),
        prop_oneof![Just(String::new()), "[a-z ]{1,20}"],
    )
        .prop_map(|(responsibilities, tasks, suggested_reply)| {
            Extraction {
                responsibilities,
                tasks,
                suggested_reply,
            }
            .normalized()
        })
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (
        prop_oneof![Just(Role::User), Just(Role::Assistant)],
        "[a-zé ñ¿?]{0,20}",
    )
        .prop_map(|(role, content)| Turn { role, content })
}

fn arb_state() -> impl Strategy<Value = InterviewState> {
    (
        proptest::collection::vec(arb_name(), 0..5),
        arb_tasks(),
        arb_step(),
        proptest::option::of("[a-zé ]{0,20}"),
        proptest::collection::vec(arb_turn(), 0..4),
    )
        .prop_map(|(responsibilities, tasks, step, last, transcript)| {
            InterviewState::from_parts(responsibilities, tasks, step, last, transcript)
        })
}

fn arb_user_text() -> impl Strategy<Value = String> {
    "[a-z][a-z \\-\n]{0,30}"
}

// ============================================================================
// Invariant Helpers
// ============================================================================

fn has_unique_responsibilities(state: &InterviewState) -> bool {
    let mut seen = std::collections::HashSet::new();
    state.responsibilities().iter().all(|r| seen.insert(r))
}

fn buckets_are_valid(state: &InterviewState) -> bool {
    state.tasks().values().all(|items| {
        let mut seen = std::collections::HashSet::new();
        items.len() <= MAX_TASKS_PER_RESPONSIBILITY && items.iter().all(|t| seen.insert(t))
    })
}

fn with_input(state: &InterviewState, text: &str) -> InterviewState {
    let mut state = state.clone();
    state.set_pending_user_input(Some(text.to_string()));
    state
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_turns_preserve_collection_invariants(
        turns in proptest::collection::vec((arb_user_text(), arb_extraction()), 0..12)
    ) {
        let mut state = begin(&InterviewState::new()).new_state;
        for (text, extraction) in turns {
            state = apply_extraction(&with_input(&state, &text), extraction).new_state;
            prop_assert!(has_unique_responsibilities(&state), "duplicates: {:?}", state);
            prop_assert!(buckets_are_valid(&state), "bad bucket: {:?}", state);
            prop_assert!(state.pending_user_input().is_none());
        }
    }

    #[test]
    fn prop_merging_twice_is_idempotent(
        state in arb_state(),
        responsibilities in proptest::collection::vec(arb_name(), 0..5),
        tasks in arb_tasks()
    ) {
        let mut once = state.clone();
        once.merge_responsibilities(&responsibilities);
        once.merge_tasks(&tasks);

        let mut twice = once.clone();
        twice.merge_responsibilities(&responsibilities);
        twice.merge_tasks(&tasks);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_merge_never_shrinks(state in arb_state(), tasks in arb_tasks()) {
        let mut merged = state.clone();
        merged.merge_tasks(&tasks);
        for (responsibility, items) in state.tasks() {
            prop_assert!(merged.tasks_for(responsibility).starts_with(items));
        }
    }

    #[test]
    fn prop_blank_input_changes_nothing(state in arb_state(), blank in "[ \t\n]{0,5}") {
        let result = apply_extraction(&with_input(&state, &blank), Extraction::default());
        prop_assert_eq!(&result.new_state, &state);

        let expected = state
            .last_assistant_message()
            .unwrap_or_else(|| prompts::for_step(state.step()));
        prop_assert_eq!(result.reply, expected);
    }

    #[test]
    fn prop_step_only_moves_forward(
        state in arb_state(),
        text in arb_user_text(),
        extraction in arb_extraction()
    ) {
        let before = state.step();
        let after = apply_extraction(&with_input(&state, &text), extraction).new_state.step();
        let rank = |step: Step| match step {
            Step::CollectResponsibilities => 0,
            Step::CollectTasks => 1,
            Step::Review => 2,
        };
        prop_assert!(rank(after) >= rank(before));
        prop_assert!(rank(after) - rank(before) <= 1, "{before} jumped to {after}");
    }

    #[test]
    fn prop_review_requires_readiness(
        state in arb_state(),
        text in arb_user_text(),
        extraction in arb_extraction()
    ) {
        let result = apply_extraction(&with_input(&state, &text), extraction);
        if state.step() != Step::Review && result.new_state.step() == Step::Review {
            prop_assert!(result.new_state.is_ready());
        }
    }

    #[test]
    fn prop_turn_appends_user_then_assistant(
        state in arb_state(),
        text in arb_user_text(),
        extraction in arb_extraction()
    ) {
        let result = apply_extraction(&with_input(&state, &text), extraction);
        let transcript = result.new_state.transcript();
        prop_assert_eq!(transcript.len(), state.transcript().len() + 2);

        let user = &transcript[transcript.len() - 2];
        let assistant = &transcript[transcript.len() - 1];
        prop_assert_eq!(user.role, Role::User);
        prop_assert_eq!(user.content.as_str(), text.trim());
        prop_assert_eq!(assistant.role, Role::Assistant);
        prop_assert_eq!(assistant.content.as_str(), result.reply.as_str());
        prop_assert_eq!(result.new_state.last_assistant_message(), Some(result.reply.as_str()));
    }

    #[test]
    fn prop_save_is_stable(state in arb_state()) {
        let saved = persistence::save(&state);
        let loaded = persistence::load(&saved);
        prop_assert_eq!(persistence::save(&loaded), saved);
        prop_assert_eq!(loaded.transcript(), state.transcript());
        prop_assert_eq!(loaded.last_assistant_message(), state.last_assistant_message());
        prop_assert_eq!(loaded, state);
    }

    #[test]
    fn prop_load_never_panics(blob in ".{0,80}") {
        let state = persistence::load(&blob);
        prop_assert!(has_unique_responsibilities(&state));
        prop_assert!(buckets_are_valid(&state));
    }
}
