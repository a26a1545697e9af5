#![forbid(unsafe_code)]

use crate::alias::{AliasResolver, AliasTable};
use crate::text::{IdPool, sanitize_label, slugify};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_VALUE_COLOR: &str = "#9e9e9e";

const PRESET_COLORS: &[(&str, &str)] = &[
    ("未着手", "#9e9e9e"),
    ("進行中", "#f2c94c"),
    ("完了", "#4caf50"),
    ("true", "#4caf50"),
    ("false", "#9e9e9e"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueSetEntry {
    pub id: String,
    pub label: String,
    pub color: String,
}

impl ValueSetEntry {
    fn preset(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            color: preset_color(label).to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "id": self.id, "label": self.label, "color": self.color })
    }
}

pub fn default_value_set() -> Vec<ValueSetEntry> {
    vec![
        ValueSetEntry::preset("not-started", "未着手"),
        ValueSetEntry::preset("in-progress", "進行中"),
        ValueSetEntry::preset("done", "完了"),
    ]
}

/// Two-entry set that legacy boolean matrices migrate into.
pub fn legacy_boolean_value_set() -> Vec<ValueSetEntry> {
    vec![
        ValueSetEntry::preset("false", "false"),
        ValueSetEntry::preset("true", "true"),
    ]
}

/// `#rrggbb` (the `#` is optional on input); anything else is rejected.
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        None
    }
}

pub fn preset_color(label: &str) -> &'static str {
    let label = label.trim();
    PRESET_COLORS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(label))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_VALUE_COLOR)
}

fn resolve_color(raw: Option<&Value>, label: &str) -> String {
    let declared = raw.and_then(Value::as_str);
    if let Some(color) = declared.and_then(normalize_color) {
        return color;
    }
    if let Some(declared) = declared.filter(|c| !c.trim().is_empty()) {
        tracing::warn!(label, color = declared, "invalid value color, using preset");
    }
    preset_color(label).to_string()
}

/// Canonical value set. Missing, empty or fully invalid input yields the default set.
pub fn normalize_value_set(raw: Option<&Value>) -> Vec<ValueSetEntry> {
    let entries = match raw {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => return default_value_set(),
    };

    let mut out = Vec::new();
    let mut ids = IdPool::new();
    let mut seen_labels = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let (label, provided_id, color) = match entry {
            Value::String(s) => (s.trim().to_string(), String::new(), None),
            Value::Object(obj) => {
                let provided_id = sanitize_label(obj.get("id"));
                let mut label = sanitize_label(obj.get("label"));
                if label.is_empty() {
                    label = provided_id.clone();
                }
                (label, provided_id, obj.get("color"))
            }
            _ => continue,
        };
        if label.is_empty() {
            continue;
        }
        if !seen_labels.insert(label.to_lowercase()) {
            tracing::warn!(label = %label, "duplicate value label dropped");
            continue;
        }
        let base = if provided_id.is_empty() {
            slugify(&label, &format!("value-{}", index + 1))
        } else {
            provided_id
        };
        let id = ids.claim(&base);
        let color = resolve_color(color, &label);
        out.push(ValueSetEntry { id, label, color });
    }

    if out.is_empty() {
        return default_value_set();
    }
    out
}

/// True for raw cells written by the boolean-era matrix (`true`, `"false"`, `1`, `"0"`, ...).
pub(crate) fn is_legacy_boolean_cell(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_f64(), Some(v) if v == 0.0 || v == 1.0),
        Value::String(s) => legacy_flag(s).is_some(),
        _ => false,
    }
}

fn legacy_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

/// Resolves stored cells (value ids, labels, legacy booleans) against one value set.
#[derive(Debug)]
pub struct ValueMatcher<'a> {
    entries: &'a [ValueSetEntry],
    table: AliasTable,
}

impl<'a> ValueMatcher<'a> {
    pub fn new(entries: &'a [ValueSetEntry]) -> Self {
        let mut table = AliasTable::new();
        for (index, entry) in entries.iter().enumerate() {
            table.insert_id(&entry.id, index);
            table.insert_alias(&entry.label.to_lowercase(), index);
        }
        Self { entries, table }
    }

    pub fn lookup(&self, candidate: &str) -> Option<&'a ValueSetEntry> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }
        let index = self
            .table
            .by_id(candidate)
            .or_else(|| self.table.by_alias(&candidate.to_lowercase()))?;
        self.entries.get(index)
    }

    /// Entry labelled `true`, else the second entry, else the first.
    pub fn true_like(&self) -> Option<&'a ValueSetEntry> {
        self.labelled("true")
            .or_else(|| self.entries.get(1))
            .or_else(|| self.entries.first())
    }

    /// Entry labelled `false`, else the first.
    pub fn false_like(&self) -> Option<&'a ValueSetEntry> {
        self.labelled("false").or_else(|| self.entries.first())
    }

    fn labelled(&self, label: &str) -> Option<&'a ValueSetEntry> {
        self.entries
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(label))
    }

    fn flag(&self, flag: bool) -> Option<&'a ValueSetEntry> {
        if flag {
            self.true_like()
        } else {
            self.false_like()
        }
    }

    pub fn resolve_or(
        &self,
        raw: Option<&Value>,
        fallback: Option<&'a ValueSetEntry>,
    ) -> Option<&'a ValueSetEntry> {
        let resolved = match raw {
            None | Some(Value::Null) => None,
            Some(Value::Bool(flag)) => self.flag(*flag),
            Some(Value::Number(n)) => self.lookup(&n.to_string()).or_else(|| match n.as_f64() {
                Some(v) if v == 1.0 => self.true_like(),
                Some(v) if v == 0.0 => self.false_like(),
                _ => None,
            }),
            Some(Value::String(s)) => self
                .lookup(s)
                .or_else(|| legacy_flag(s).and_then(|flag| self.flag(flag))),
            Some(_) => None,
        };
        resolved.or(fallback)
    }
}

impl AliasResolver for ValueMatcher<'_> {
    type Entry = ValueSetEntry;

    fn resolve(&self, candidate: &str) -> Option<&ValueSetEntry> {
        self.lookup(candidate)
    }
}
