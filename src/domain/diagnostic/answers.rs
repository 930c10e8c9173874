//! Questionnaire answers and Likert normalization.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::foundation::ValidationError;

/// Lowest value on the Likert scale.
pub const LIKERT_MIN: f64 = 1.0;

/// Highest value on the Likert scale.
pub const LIKERT_MAX: f64 = 5.0;

/// Raw answers of one questionnaire submission, keyed by question.
///
/// Read-only for the duration of an analysis; values keep whatever encoding
/// the form sent (numeric strings, numbers, letters, free text, null).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuestionnaireAnswers(Map<String, Value>);

impl QuestionnaireAnswers {
    /// Wraps an already-parsed answer map.
    pub fn new(answers: Map<String, Value>) -> Self {
        Self(answers)
    }

    /// Builds answers from an arbitrary JSON value, rejecting anything but an object.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ValidationError::invalid_format(
                "body",
                format!("expected a JSON object of answers, got {}", json_kind(&other)),
            )),
        }
    }

    /// Raw value for a question, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Free-text answer for a question.
    ///
    /// Strings and numbers are kept; absent, null, empty, boolean and
    /// structured values yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no question was answered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for QuestionnaireAnswers {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Converts raw answer encodings onto the common 1..5 scale.
///
/// Numbers within range and digit strings parsing to 1..5 are accepted.
/// When letter codes are enabled, a single letter `A`..`E` maps to 1..5
/// (four-option questions simply never send `E`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerNormalizer {
    accept_letters: bool,
}

impl AnswerNormalizer {
    /// Numeric encodings only.
    pub const NUMERIC: Self = Self {
        accept_letters: false,
    };

    /// Numeric encodings plus letter codes.
    pub const WITH_LETTERS: Self = Self {
        accept_letters: true,
    };

    /// Picks the normalizer for a domain's letter-code setting.
    pub fn for_letter_codes(letter_codes: bool) -> Self {
        if letter_codes {
            Self::WITH_LETTERS
        } else {
            Self::NUMERIC
        }
    }

    /// Normalizes one raw answer. `None` is the uniform "no usable value" signal.
    pub fn normalize(&self, raw: &Value) -> Option<f64> {
        match raw {
            Value::Number(n) => n.as_f64().filter(|v| in_likert_range(*v)),
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    return s
                        .parse::<u32>()
                        .ok()
                        .map(f64::from)
                        .filter(|v| in_likert_range(*v));
                }
                if self.accept_letters {
                    return letter_value(s);
                }
                None
            }
            _ => None,
        }
    }
}

/// Normalizes a raw answer with numeric encodings only.
pub fn normalize_likert(raw: &Value) -> Option<f64> {
    AnswerNormalizer::NUMERIC.normalize(raw)
}

fn in_likert_range(value: f64) -> bool {
    value.is_finite() && (LIKERT_MIN..=LIKERT_MAX).contains(&value)
}

fn letter_value(s: &str) -> Option<f64> {
    let mut chars = s.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match letter.to_ascii_uppercase() {
        'A' => Some(1.0),
        'B' => Some(2.0),
        'C' => Some(3.0),
        'D' => Some(4.0),
        'E' => Some(5.0),
        _ => None,
    }
}
