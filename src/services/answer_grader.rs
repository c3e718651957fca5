use serde::{Deserialize, Serialize};

use crate::models::domain::{Question, QuestionType};

/// Share of canonical answer words that must appear in an open response.
const OPEN_ANSWER_MATCH_RATIO: f64 = 0.5;
/// Canonical words of this length or shorter are ignored when matching.
const OPEN_ANSWER_MIN_WORD_LEN: usize = 3;

const CORRECT_QUALITY: i32 = 4;
const CONFIDENT_QUALITY: i32 = 5;
const INCORRECT_QUALITY: i32 = 1;

/// What the user submitted: a choice label, a boolean or free text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UserResponse {
    Bool(bool),
    Text(String),
}

impl UserResponse {
    pub fn as_text(&self) -> String {
        match self {
            UserResponse::Bool(value) => value.to_string(),
            UserResponse::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for UserResponse {
    fn from(text: &str) -> Self {
        UserResponse::Text(text.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GradeOutcome {
    pub is_correct: bool,
}

pub fn grade(question: &Question, response: &UserResponse) -> GradeOutcome {
    let response = response.as_text();

    let is_correct = match question.question_type {
        QuestionType::SingleChoice => same_choice_letter(&response, &question.answer),
        QuestionType::TrueFalse => response.trim().eq_ignore_ascii_case(question.answer.trim()),
        QuestionType::Open | QuestionType::FindTheBug => {
            open_answer_matches(&response, &question.answer)
        }
    };

    GradeOutcome { is_correct }
}

/// Maps a binary verdict onto an SM-2 grade. A wrong answer is a 1 rather
/// than a 0: the user has seen the answer, and 0 is reserved for blackouts.
pub fn to_quality(is_correct: bool, confidence_bonus: bool) -> i32 {
    match (is_correct, confidence_bonus) {
        (true, true) => CONFIDENT_QUALITY,
        (true, false) => CORRECT_QUALITY,
        (false, _) => INCORRECT_QUALITY,
    }
}

fn leading_letter(text: &str) -> Option<char> {
    text.trim()
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
}

fn same_choice_letter(response: &str, answer: &str) -> bool {
    match (leading_letter(response), leading_letter(answer)) {
        (Some(given), Some(expected)) => given == expected,
        _ => false,
    }
}

fn qualifying_words(answer: &str) -> Vec<String> {
    answer
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > OPEN_ANSWER_MIN_WORD_LEN)
        .collect()
}

/// Passes when at least half of the canonical answer's long words appear in
/// the response. Words keep their punctuation. An answer without long words
/// never matches.
fn open_answer_matches(response: &str, answer: &str) -> bool {
    let words = qualifying_words(answer);
    if words.is_empty() {
        return false;
    }

    let response = response.trim().to_lowercase();
    let matched = words
        .iter()
        .filter(|word| response.contains(word.as_str()))
        .count();

    matched as f64 / words.len() as f64 >= OPEN_ANSWER_MATCH_RATIO
}
