//! Lenient extraction of a JSON array from noisy model output.
//!
//! Models asked for "JSON only" still wrap replies in Markdown fences, add
//! prose around the array, or leave a trailing comma before a closing
//! bracket. The salvage rules, applied in order:
//!
//! 1. strip a leading ```` ``` ````/```` ```json ```` fence and a trailing fence
//! 2. slice to the outermost `[` ... `]` pair
//! 3. drop trailing commas immediately before a closing `]` or `}`
//!
//! What survives must parse as strict JSON; anything else is an error, so
//! callers can tell "model produced garbage" from "model produced an empty
//! array". Do not add further heuristics without test cases.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::record::TestCase;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON array found in model output")]
    MissingArray,

    #[error("malformed JSON array: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("array element {index} is not an object")]
    NotAnObject { index: usize },
}

static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();

fn trailing_comma() -> &'static Regex {
    TRAILING_COMMA
        .get_or_init(|| Regex::new(r",\s*([\]}])").expect("trailing comma regex should compile"))
}

/// Extract the outermost JSON array from raw model output.
pub fn extract_json_array(raw: &str) -> Result<Vec<Value>, ParseError> {
    let s = strip_code_fences(raw.trim());

    let sliced = match (s.find('['), s.rfind(']')) {
        (Some(i), Some(j)) if j > i => &s[i..=j],
        _ => return Err(ParseError::MissingArray),
    };

    let repaired = trailing_comma().replace_all(sliced, "$1");
    let value: Value = serde_json::from_str(&repaired)?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::MissingArray),
    }
}

/// Parse model output into test-case records.
pub fn parse_test_cases(raw: &str) -> Result<Vec<TestCase>, ParseError> {
    let items = extract_json_array(raw)?;

    let mut cases = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(ParseError::NotAnObject { index });
        }
        cases.push(serde_json::from_value(item)?);
    }
    Ok(cases)
}

fn strip_code_fences(s: &str) -> &str {
    let mut s = s;
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}
