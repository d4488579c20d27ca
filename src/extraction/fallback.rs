//! Deterministic line-based extraction
//!
//! Used whenever no language model is configured, and as the safety net of the
//! remote extractor.

use super::{Extraction, Extractor};
use crate::interview::{prompts, Step, MAX_TASKS_PER_RESPONSIBILITY};
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Responsibilities kept from one answer
const MAX_PARSED_RESPONSIBILITIES: usize = 5;

/// Longer lines are prose, not a responsibility
const MAX_RESPONSIBILITY_WORDS: usize = 12;

/// `Responsabilidad: X`, `- Resp - X`, `* resp: X` ...
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*•]\s*)?(?:responsabilidad|resp)\s*[:\-]\s*(.+)$")
        .expect("valid responsibility header regex")
});

/// Extractor that needs nothing but the text itself
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExtractor;

#[async_trait]
impl Extractor for FallbackExtractor {
    async fn extract(
        &self,
        step: Step,
        text: &str,
        known_responsibilities: &[String],
    ) -> Extraction {
        extract(step, text, known_responsibilities)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Synchronous entry point shared by [`FallbackExtractor`] and the remote
/// extractor's degraded path
pub fn extract(step: Step, text: &str, known_responsibilities: &[String]) -> Extraction {
    let extraction = match step {
        Step::CollectResponsibilities => {
            let responsibilities = parse_responsibilities(text);
            let suggested_reply = if responsibilities.is_empty() {
                prompts::REFORMULATE_RESPONSIBILITIES
            } else {
                prompts::ASK_TASKS
            };
            Extraction {
                responsibilities,
                tasks: BTreeMap::new(),
                suggested_reply: suggested_reply.to_string(),
            }
        }
        Step::CollectTasks => {
            let tasks = parse_tasks(text, known_responsibilities);
            let produced = tasks.values().any(|items| !items.is_empty());
            Extraction {
                responsibilities: Vec::new(),
                tasks,
                suggested_reply: if produced {
                    prompts::REVIEW
                } else {
                    prompts::USE_TASK_BULLETS
                }
                .to_string(),
            }
        }
        Step::Review => Extraction::default(),
    };
    extraction.normalized()
}

/// Short, non-empty lines with their bullet markers removed
fn parse_responsibilities(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| {
            !line.is_empty() && line.split_whitespace().count() <= MAX_RESPONSIBILITY_WORDS
        })
        .take(MAX_PARSED_RESPONSIBILITIES)
        .map(ToString::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '•' | '*') || c.is_whitespace())
        .trim()
}

/// Item text if the (trimmed) line is a `- ` or `* ` bullet
fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

/// Group bullet items under `Resp:` headers, or under known responsibilities
/// when the answer has no headers.
fn parse_tasks(text: &str, known: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut tasks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(captures) = HEADER_RE.captures(line) {
            let name = captures[1].trim().to_string();
            tasks.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some(item) = bullet_item(line) else {
            continue;
        };

        let target = match &current {
            Some(name) => name.clone(),
            None => match least_loaded(known, &tasks) {
                Some(name) => name.clone(),
                None => continue,
            },
        };
        tasks.entry(target).or_default().push(item.to_string());
    }

    if tasks.is_empty() && !known.is_empty() {
        let bullets: Vec<&str> = text
            .lines()
            .filter_map(|l| l.trim().strip_prefix("- "))
            .map(str::trim)
            .collect();
        if !bullets.is_empty() {
            tasks = distribute_round_robin(&bullets, known);
        }
    }

    for items in tasks.values_mut() {
        items.truncate(MAX_TASKS_PER_RESPONSIBILITY);
    }
    tasks
}

/// Known responsibility with the fewest items so far; ties go to the earliest
fn least_loaded<'a>(
    known: &'a [String],
    tasks: &BTreeMap<String, Vec<String>>,
) -> Option<&'a String> {
    known
        .iter()
        .min_by_key(|r| tasks.get(r.as_str()).map_or(0, Vec::len))
}

/// Give each responsibility `max(1, bullets / responsibilities)` consecutive
/// bullets, then hand out the remainder one at a time starting from the first.
///
/// The split is a heuristic kept for compatibility with existing interviews;
/// nothing depends on its exact shape.
fn distribute_round_robin(bullets: &[&str], known: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut tasks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if known.is_empty() {
        return tasks;
    }

    let per = (bullets.len() / known.len()).max(1);
    let mut chunks = bullets.chunks(per);
    for responsibility in known {
        let Some(chunk) = chunks.next() else { break };
        tasks
            .entry(responsibility.clone())
            .or_default()
            .extend(chunk.iter().map(ToString::to_string));
    }

    let assigned = (per * known.len()).min(bullets.len());
    for (i, bullet) in bullets.iter().skip(assigned).enumerate() {
        tasks
            .entry(known[i % known.len()].clone())
            .or_default()
            .push((*bullet).to_string());
    }
    tasks
}
