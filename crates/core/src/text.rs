#![forbid(unsafe_code)]

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Trimmed string content of a raw field; anything that is not a string yields "".
pub fn sanitize_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

pub fn slugify(value: &str, fallback: &str) -> String {
    let folded = value.trim().nfkc().collect::<String>().to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for ch in folded.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

/// Parses a declared rank: a finite number (or numeric string) truncated to an integer >= 1.
pub fn order_value(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    let integer = number.trunc();
    if integer >= 1.0 && integer < i64::MAX as f64 {
        Some(integer as i64)
    } else {
        None
    }
}

/// Canonical form of a free-text tag. Short all-letter codes are upper-cased ("ab" -> "AB").
pub fn normalize_tag(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(trimmed.to_ascii_uppercase());
    }
    Some(trimmed.to_string())
}

fn collation_key(value: &str) -> String {
    value.trim().nfkc().collect::<String>().to_lowercase()
}

/// Base-sensitivity comparison: case and compatibility width differences compare equal.
pub fn compare_base(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Base comparison with a code point tiebreak, for keys that must sort deterministically.
pub fn compare_locale(a: &str, b: &str) -> Ordering {
    compare_base(a, b).then_with(|| a.cmp(b))
}

pub fn rank(index: usize) -> i64 {
    i64::try_from(index + 1).unwrap_or(i64::MAX)
}

/// Allocates ids unique within one collection; collisions get `-2`, `-3`, ... suffixes.
#[derive(Clone, Debug, Default)]
pub struct IdPool {
    taken: HashSet<String>,
}

impl IdPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: ids.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    pub fn claim(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut counter = 2u64;
        while self.taken.contains(&id) {
            id = format!("{base}-{counter}");
            counter += 1;
        }
        self.taken.insert(id.clone());
        id
    }
}
