use crate::{Error, Result};
use serde_json::Value;

/// Bare tokens accepted outside string literals, longest first.
const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Caller-supplied JSON forwarded to the endpoint.
///
/// Text may carry bare `NaN`, `Infinity` and `-Infinity` values. The parsed
/// [`Value`] holds `null` in their place and the original text is kept so the
/// tokens can be forwarded untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawJson {
    text: String,
    value: Value,
    non_finite: usize,
}

impl RawJson {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::input("Missing required field: JSON payload"));
        }
        let (strict, non_finite) = replace_non_finite(text);
        let value = serde_json::from_str(&strict)
            .map_err(|e| Error::input(format!("Invalid JSON: {e}")))?;
        Ok(Self {
            text: text.to_string(),
            value,
            non_finite,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed form, with non-finite tokens read as `null`.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn non_finite_count(&self) -> usize {
        self.non_finite
    }
}

impl From<Value> for RawJson {
    fn from(value: Value) -> Self {
        Self {
            text: value.to_string(),
            value,
            non_finite: 0,
        }
    }
}

/// Swaps bare non-finite tokens outside string literals for `null`.
fn replace_non_finite(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            count += 1;
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    (out, count)
}
