//! Property-based tests for the fallback parser

use super::fallback;
use super::*;
use proptest::prelude::*;

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::CollectResponsibilities),
        Just(Step::CollectTasks),
        Just(Step::Review),
    ]
}

/// Lines that look like answers: bullets, headers, prose and blanks
fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}( [a-z]{1,8}){0,14}",
        "- [a-z]{1,10}",
        "\\* [a-z]{1,10}",
        "(Resp|Responsabilidad): [A-D]",
        "[ \t]{0,3}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_line(), 0..25).prop_map(|lines| lines.join("\n"))
}

fn arb_known() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-D]", 0..4).prop_map(|mut names| {
        names.dedup();
        names
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_fallback_respects_caps(step in arb_step(), text in arb_text(), known in arb_known()) {
        let result = fallback::extract(step, &text, &known);
        prop_assert!(result.responsibilities.len() <= 5);
        for items in result.tasks.values() {
            prop_assert!(items.len() <= MAX_TASKS_PER_RESPONSIBILITY);
        }
    }

    #[test]
    fn prop_fallback_strings_are_trimmed(step in arb_step(), text in arb_text(), known in arb_known()) {
        let result = fallback::extract(step, &text, &known);
        let strings = result
            .responsibilities
            .iter()
            .chain(result.tasks.keys())
            .chain(result.tasks.values().flatten());
        for s in strings {
            prop_assert!(!s.is_empty());
            prop_assert_eq!(s.as_str(), s.trim());
        }
    }

    #[test]
    fn prop_fallback_always_suggests_reply(step in arb_step(), text in arb_text(), known in arb_known()) {
        let result = fallback::extract(step, &text, &known);
        prop_assert_eq!(result.suggested_reply.is_empty(), step == Step::Review);
    }

    #[test]
    fn prop_responsibility_step_yields_no_tasks(text in arb_text(), known in arb_known()) {
        let result = fallback::extract(Step::CollectResponsibilities, &text, &known);
        prop_assert!(result.tasks.is_empty());
    }

    #[test]
    fn prop_headed_items_stay_in_their_bucket(
        items_a in proptest::collection::vec("a[0-9]{1,3}", 1..6),
        items_b in proptest::collection::vec("b[0-9]{1,3}", 1..6)
    ) {
        let text = std::iter::once("Resp: A".to_string())
            .chain(items_a.iter().map(|t| format!("- {t}")))
            .chain(std::iter::once("Resp: B".to_string()))
            .chain(items_b.iter().map(|t| format!("* {t}")))
            .collect::<Vec<_>>()
            .join("\n");

        let result = fallback::extract(Step::CollectTasks, &text, &[]);
        prop_assert!(result.tasks["A"].iter().all(|t| t.starts_with('a')));
        prop_assert!(result.tasks["B"].iter().all(|t| t.starts_with('b')));
        prop_assert_eq!(&result.tasks["A"], &items_a);
        prop_assert_eq!(&result.tasks["B"], &items_b);
    }

    #[test]
    fn prop_unheaded_bullets_only_reach_known(text in arb_text(), known in arb_known()) {
        let headerless: String = text
            .lines()
            .filter(|line| !line.starts_with("Resp"))
            .collect::<Vec<_>>()
            .join("\n");
        let result = fallback::extract(Step::CollectTasks, &headerless, &known);
        for responsibility in result.tasks.keys() {
            prop_assert!(known.contains(responsibility), "unknown bucket {responsibility}");
        }
    }
}
