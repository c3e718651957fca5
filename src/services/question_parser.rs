//! Recovers question records from raw language-model output.
//!
//! Model output is untrusted: it arrives wrapped in markdown fences, prefixed
//! with a format tag, as concatenated bare objects, with trailing commas or
//! cut off mid-array. Each recovery step below is a separate string
//! transformation; `parse_questions` chains them and never fails. Callers
//! treat an empty result as "no usable output".

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::domain::{
    question::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY},
    GeneratedQuestion, QuestionSource, QuestionType,
};

static FORMAT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[A-Za-z][A-Za-z0-9_-]*[ \t]*\r?\n?\s*([\[{][\s\S]*)$")
        .expect("FORMAT_TAG is a valid regex pattern")
});

static ADJACENT_OBJECTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\s*\{").expect("ADJACENT_OBJECTS is a valid regex pattern"));

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("TRAILING_COMMA is a valid regex pattern"));

// Objects with at most one level of nested braces. Question objects are flat.
static BALANCED_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}")
        .expect("BALANCED_OBJECT is a valid regex pattern")
});

const FENCE: &str = "```";

/// Parses model output into validated questions, in order of appearance.
pub fn parse_questions(raw: &str) -> Vec<GeneratedQuestion> {
    if raw.trim().is_empty() {
        log::debug!("Model output is empty, no questions to parse");
        return Vec::new();
    }

    let text = strip_format_tag(raw);
    let text = extract_fenced_block(text).unwrap_or(text);

    let Some(payload) = select_container(text) else {
        log::warn!("Model output contains no JSON payload");
        return Vec::new();
    };

    let sanitized = sanitize(&payload);
    let items = match serde_json::from_str::<Value>(&sanitized) {
        Ok(value) => into_items(value),
        Err(err) => {
            log::warn!("Model output is not valid JSON ({}), salvaging objects", err);
            salvage_objects(text)
        }
    };

    let mut total = items.len();
    let mut questions: Vec<GeneratedQuestion> =
        items.iter().filter_map(normalize_question).collect();

    // The container may have been a nested array such as `choices`
    if questions.is_empty() {
        let salvaged = salvage_objects(text);
        if !salvaged.is_empty() {
            log::debug!("Parsed container held no questions, salvaging objects");
            total = salvaged.len();
            questions = salvaged.iter().filter_map(normalize_question).collect();
        }
    }

    if questions.len() < total {
        log::debug!(
            "Discarded {} of {} parsed items without a question or answer",
            total - questions.len(),
            total
        );
    }

    questions
}

/// Drops a bare leading word such as `json` when a payload follows it.
pub fn strip_format_tag(text: &str) -> &str {
    match FORMAT_TAG.captures(text).and_then(|caps| caps.get(1)) {
        Some(payload) => payload.as_str(),
        None => text,
    }
}

/// Inner content of the first fenced code block. An unclosed fence yields the
/// rest of the text.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_fence = &text[open + FENCE.len()..];

    // Skip the info string (`json`, `JSON`, ...) on the opening line
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];

    let inner = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };

    Some(inner.trim())
}

/// Narrows the text to the JSON container holding the questions.
pub fn select_container(text: &str) -> Option<String> {
    let trimmed = text.trim_start();

    if trimmed.starts_with('{') {
        return wrap_objects(trimmed);
    }

    // An object opening before any array is the payload itself
    let object_first = match (trimmed.find('{'), trimmed.find('[')) {
        (Some(brace), Some(bracket)) => brace < bracket,
        _ => false,
    };
    if object_first {
        return wrap_objects(trimmed);
    }

    match trimmed.find('[') {
        Some(start) => {
            let end = trimmed
                .rfind(']')
                .filter(|&end| end > start)
                .map(|end| end + 1)
                .unwrap_or(trimmed.len()); // Truncated, repaired by `sanitize`
            Some(trimmed[start..end].to_string())
        }
        None => wrap_objects(trimmed),
    }
}

/// `{..}{..}` becomes `[{..},{..}]`.
pub fn wrap_objects(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}').filter(|&end| end > start)?;

    let joined = ADJACENT_OBJECTS.replace_all(&text[start..=end], "},{");
    Some(format!("[{}]", joined))
}

pub fn sanitize(text: &str) -> String {
    let text = strip_control_chars(text);
    let text = remove_trailing_commas(&text);
    close_truncated_array(&text)
}

pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

/// Cuts an array truncated mid-element back to its last complete object and
/// closes the brackets left open.
pub fn close_truncated_array(text: &str) -> String {
    if bracket_deficit(text) == 0 {
        return text.to_string();
    }

    let Some(last_object_end) = text.rfind('}') else {
        return text.to_string();
    };

    let mut repaired = text[..=last_object_end]
        .trim_end()
        .trim_end_matches(',')
        .to_string();
    let missing = bracket_deficit(&repaired);
    repaired.push_str(&"]".repeat(missing));
    repaired
}

fn bracket_deficit(text: &str) -> usize {
    let opened = text.matches('[').count();
    let closed = text.matches(']').count();
    opened.saturating_sub(closed)
}

/// Last resort: every brace-balanced object that parses on its own.
pub fn salvage_objects(text: &str) -> Vec<Value> {
    BALANCED_OBJECT
        .find_iter(text)
        .filter_map(|candidate| {
            let cleaned = remove_trailing_commas(&strip_control_chars(candidate.as_str()));
            serde_json::from_str::<Value>(&cleaned).ok()
        })
        .filter(Value::is_object)
        .collect()
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(unwrap_envelope).collect(),
        Value::Object(_) => unwrap_envelope(value),
        _ => Vec::new(),
    }
}

/// `{"questions": [...]}` stands for its list.
fn unwrap_envelope(item: Value) -> Vec<Value> {
    if let Value::Object(object) = &item {
        if !object.contains_key("question") {
            if let Some(Value::Array(items)) = object.get("questions") {
                return items.clone();
            }
        }
    }
    vec![item]
}

/// Validates one parsed item. Only `question` and `answer` are required;
/// everything else falls back to a default.
pub fn normalize_question(item: &Value) -> Option<GeneratedQuestion> {
    let object = item.as_object()?;

    let question = object
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())?
        .to_string();

    let answer = object
        .get("answer")
        .and_then(stringify_answer)
        .filter(|a| !a.trim().is_empty())?;

    let question_type = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_wire)
        .unwrap_or(QuestionType::SingleChoice);

    let source = match object.get("source").and_then(Value::as_str) {
        Some("project") => QuestionSource::Project,
        _ => QuestionSource::General,
    };

    let choices = object.get("choices").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .map(|choice| match choice {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect()
    });

    Some(GeneratedQuestion {
        question_type,
        difficulty: parse_difficulty(object.get("difficulty")),
        source,
        question,
        choices,
        answer,
        explanation: optional_text(object, &["explanation"]),
        file_path: optional_text(object, &["filePath", "file_path"]),
        code_snippet: optional_text(object, &["codeSnippet", "code_snippet"]),
    })
}

fn stringify_answer(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_difficulty(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number.filter(|n| n.is_finite()) {
        Some(n) => n
            .round()
            .clamp(MIN_DIFFICULTY as f64, MAX_DIFFICULTY as f64) as u8,
        None => DEFAULT_DIFFICULTY,
    }
}

fn optional_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
