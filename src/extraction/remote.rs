//! Language-model backed extraction with deterministic fallback

use super::{fallback, Extraction, Extractor};
use crate::interview::Step;
use crate::llm::{LlmError, LlmMessage, LlmRequest, LlmService};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

const EXTRACTION_PROMPT: &str = r#"Eres un asistente que entrevista a una persona para documentar el traspaso de su puesto.
Estructura su respuesta en:
- responsabilidades: lista de frases cortas (entre 2 y 7)
- tareas: objeto cuya clave es la responsabilidad y cuyo valor es una lista de 2 a 7 tareas concretas y accionables
Responde SIEMPRE con un único objeto JSON válido con esta forma:
{"responsabilidades": ["..."], "tareas": {"Responsabilidad": ["tarea A", "tarea B"]}, "mensajes": {"assistant": "siguiente pregunta"}}
No escribas nada fuera del JSON. Si la persona solo aporta una parte (por ejemplo, responsabilidades), rellena solo ese bloque."#;

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.1;

/// Why a remote extraction was discarded
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),
    #[error("LLM reply contains no JSON object")]
    NoJson,
    #[error("LLM reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("LLM reply is JSON but not an object")]
    Shape,
}

/// Extractor that asks a language model and falls back to line parsing
pub struct RemoteExtractor {
    llm: Arc<dyn LlmService>,
}

impl RemoteExtractor {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    async fn request(&self, text: &str) -> Result<Extraction, ExtractionError> {
        let request = LlmRequest {
            system: vec![EXTRACTION_PROMPT.to_string()],
            messages: vec![LlmMessage::user(text)],
            max_tokens: Some(MAX_TOKENS),
            temperature: Some(TEMPERATURE),
            json_output: true,
        };
        let response = self.llm.complete(&request).await?;
        let value = parse_reply(&response.text)?;
        coerce(&value)
    }
}

#[async_trait]
impl Extractor for RemoteExtractor {
    async fn extract(
        &self,
        step: Step,
        text: &str,
        known_responsibilities: &[String],
    ) -> Extraction {
        match self.request(text).await {
            Ok(extraction) => extraction.normalized(),
            Err(e) => {
                tracing::warn!(
                    model = %self.llm.model_id(),
                    step = %step,
                    error = %e,
                    "Remote extraction failed, using fallback parser"
                );
                fallback::extract(step, text, known_responsibilities)
            }
        }
    }

    fn name(&self) -> &str {
        self.llm.model_id()
    }
}

/// Parse the whole reply as JSON, or else the first balanced `{...}` block in it
fn parse_reply(text: &str) -> Result<Value, ExtractionError> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Ok(value);
    }
    let block = first_json_block(text).ok_or(ExtractionError::NoJson)?;
    Ok(serde_json::from_str(block)?)
}

/// First brace-balanced block, ignoring braces inside string literals
fn first_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.get(start..)?.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return text.get(start..=start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Map the model's JSON onto an [`Extraction`].
///
/// Only a non-object top level is an error; fields with the wrong type are
/// treated as absent.
fn coerce(value: &Value) -> Result<Extraction, ExtractionError> {
    let object = value.as_object().ok_or(ExtractionError::Shape)?;

    let responsibilities = field(object, &["responsabilidades", "responsibilities"])
        .map(string_list)
        .unwrap_or_default();

    let tasks: BTreeMap<String, Vec<String>> = field(object, &["tareas", "tasks"])
        .and_then(Value::as_object)
        .map(|buckets| {
            buckets
                .iter()
                .map(|(responsibility, items)| (responsibility.clone(), string_list(items)))
                .collect()
        })
        .unwrap_or_default();

    let suggested_reply = field(object, &["mensajes", "messages"])
        .and_then(|m| m.get("assistant"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Extraction {
        responsibilities,
        tasks,
        suggested_reply,
    })
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// Non-empty scalar entries of an array, as strings
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
