#![forbid(unsafe_code)]

use super::{RawDocument, renormalize};
use crate::DataError;
use crate::normalize::{Document, ValueSetEntry, normalize_color};
use crate::order::move_entry;
use serde::Deserialize;
use serde_json::json;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValueSetEntryInput {
    pub id: Option<String>,
    pub label: String,
    pub color: Option<String>,
}

fn label_taken(entries: &[ValueSetEntry], label: &str, exclude: Option<usize>) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(index, entry)| {
            Some(index) != exclude && entry.label.to_lowercase() == label.to_lowercase()
        })
}

fn checked_index(entries: &[ValueSetEntry], index: usize) -> Result<usize, DataError> {
    if index < entries.len() {
        Ok(index)
    } else {
        Err(DataError::ValueIndexOutOfRange)
    }
}

pub fn add_value_set_entry(doc: &Document, input: &ValueSetEntryInput) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let label = input.label.trim();
    if label.is_empty() {
        return Err(DataError::EmptyValueLabel);
    }
    if label_taken(&normalized.value_set, label, None) {
        return Err(DataError::DuplicateValueLabel);
    }

    let mut entry = json!({ "label": label });
    if let Some(obj) = entry.as_object_mut() {
        if let Some(id) = input.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            obj.insert("id".to_string(), json!(id));
        }
        if let Some(color) = &input.color {
            obj.insert("color".to_string(), json!(color));
        }
    }

    let mut raw = RawDocument::from_document(&normalized);
    raw.value_set.push(entry);
    raw.normalize()
}

/// Updates label and color in place; the entry id (and therefore every cell) is kept.
pub fn update_value_set_entry(
    doc: &Document,
    index: usize,
    input: &ValueSetEntryInput,
) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let index = checked_index(&normalized.value_set, index)?;
    let label = input.label.trim();
    if label.is_empty() {
        return Err(DataError::EmptyValueLabel);
    }
    if label_taken(&normalized.value_set, label, Some(index)) {
        return Err(DataError::DuplicateValueLabel);
    }

    let mut next = normalized.clone();
    let entry = &mut next.value_set[index];
    entry.label = label.to_string();
    if let Some(color) = input.color.as_deref() {
        match normalize_color(color) {
            Some(color) => entry.color = color,
            None => tracing::warn!(label, color, "invalid value color ignored"),
        }
    }
    RawDocument::from_document(&next).normalize()
}

/// Removes an entry; every cell that held it becomes unset.
pub fn remove_value_set_entry(doc: &Document, index: usize) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let index = checked_index(&normalized.value_set, index)?;
    if normalized.value_set.len() <= 1 {
        return Err(DataError::LastValueEntry);
    }

    let mut next = normalized.clone();
    let removed = next.value_set.remove(index);
    for item in &mut next.items {
        for cell in item.values.values_mut() {
            if cell.as_deref() == Some(removed.id.as_str()) {
                *cell = None;
            }
        }
    }
    RawDocument::from_document(&next).normalize()
}

/// Moves an entry; array position is the only ordering the value set carries.
pub fn reorder_value_set(doc: &Document, from: i64, to: i64) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let Ok(from) = usize::try_from(from) else {
        return Err(DataError::SourceIndexOutOfRange);
    };
    if from >= normalized.value_set.len() {
        return Err(DataError::SourceIndexOutOfRange);
    }

    let mut next = normalized.clone();
    if !move_entry(&mut next.value_set, from, to) {
        return Ok(normalized);
    }
    RawDocument::from_document(&next).normalize()
}
