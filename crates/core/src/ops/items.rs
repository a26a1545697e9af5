#![forbid(unsafe_code)]

use super::{RawDocument, nullable, renormalize};
use crate::DataError;
use crate::normalize::{Document, Item};
use crate::text::{IdPool, slugify};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemInput {
    pub name: String,
    pub tag: Option<String>,
    pub tags: Vec<String>,
    pub order: Option<i64>,
    /// Explicit cells by column id. Accepts value ids, labels and legacy booleans.
    pub values: Map<String, Value>,
    /// Columns to pre-seed with the first value-set entry when no explicit cell is given.
    pub columns: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub tag: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub order: Option<i64>,
    pub values: Option<Map<String, Value>>,
    /// Replaces the set of filled columns: unselected cells are cleared.
    pub columns: Option<Vec<String>>,
}

fn tag_fields(primary: Option<&str>, tags: &[String]) -> (Value, Value) {
    let primary = primary.map(str::trim).filter(|t| !t.is_empty());
    let mut all: Vec<String> = Vec::new();
    for tag in primary.into_iter().chain(tags.iter().map(|t| t.trim())) {
        if !tag.is_empty() && !all.iter().any(|existing| existing == tag) {
            all.push(tag.to_string());
        }
    }
    let primary = all.first().cloned();
    (json!(primary), json!(all))
}

pub fn add_item(doc: &Document, input: &ItemInput) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(DataError::EmptyItemName);
    }
    if normalized.items.iter().any(|item| item.name == name) {
        return Err(DataError::DuplicateItemName);
    }

    let mut ids = IdPool::with_existing(normalized.items.iter().map(|i| i.id.as_str()));
    let id = ids.claim(&slugify(name, "item"));
    let seed = normalized.value_set.first().map(|entry| entry.id.clone());
    let selected: HashSet<&str> = input
        .columns
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();

    let mut values = Map::new();
    for column in &normalized.columns {
        let cell = match input.values.get(&column.id) {
            Some(explicit) => explicit.clone(),
            None if selected.contains(column.id.as_str()) => json!(seed),
            None => Value::Null,
        };
        values.insert(column.id.clone(), cell);
    }

    let (tag, tags) = tag_fields(input.tag.as_deref(), &input.tags);
    let mut item = json!({
        "id": id,
        "name": name,
        "tag": tag,
        "tags": tags,
        "values": values,
    });
    if let (Some(order), Some(obj)) = (input.order, item.as_object_mut()) {
        obj.insert("order".to_string(), json!(order));
    }

    let mut raw = RawDocument::from_document(&normalized);
    raw.items.push(item);
    raw.normalize()
}

pub fn update_item(doc: &Document, item_id: &str, updates: &ItemUpdate) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = item_id.trim();
    let Some(target) = normalized.items.iter().position(|item| item.id == id) else {
        return Err(DataError::ItemNotFound);
    };
    let existing = &normalized.items[target];

    let name = updates
        .name
        .as_deref()
        .unwrap_or(&existing.name)
        .trim()
        .to_string();
    if name.is_empty() {
        return Err(DataError::EmptyItemName);
    }
    if normalized
        .items
        .iter()
        .enumerate()
        .any(|(index, item)| item.name == name && index != target)
    {
        return Err(DataError::DuplicateItemName);
    }

    let tags_input = updates.tags.as_deref().unwrap_or(&existing.tags);
    let (tag, tags) = match &updates.tag {
        Some(Some(primary)) => tag_fields(Some(primary), tags_input),
        Some(None) => tag_fields(None, updates.tags.as_deref().unwrap_or_default()),
        None => {
            let primary = tags_input
                .first()
                .map(String::as_str)
                .or(existing.tag.as_deref());
            tag_fields(primary, tags_input)
        }
    };

    let values = updated_cells(&normalized, existing, updates);
    let order = updates.order.filter(|o| *o >= 1).unwrap_or(existing.order);

    let mut raw = RawDocument::from_document(&normalized);
    raw.items[target] = json!({
        "id": existing.id,
        "name": name,
        "order": order,
        "tag": tag,
        "tags": tags,
        "values": values,
    });
    raw.normalize()
}

fn updated_cells(doc: &Document, existing: &Item, updates: &ItemUpdate) -> Map<String, Value> {
    let explicit = updates.values.as_ref();
    let mut values = Map::new();
    for column in &doc.columns {
        let current = existing.values.get(&column.id).cloned().flatten();
        let cell = match explicit.and_then(|v| v.get(&column.id)) {
            Some(value) => value.clone(),
            None => json!(current),
        };
        values.insert(column.id.clone(), cell);
    }

    if let Some(selected) = &updates.columns {
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let seed = doc.value_set.first().map(|entry| entry.id.clone());
        for column in &doc.columns {
            let cell = if !selected.contains(column.id.as_str()) {
                Value::Null
            } else {
                match values.get(&column.id) {
                    Some(value) if !value.is_null() => value.clone(),
                    _ => json!(seed),
                }
            };
            values.insert(column.id.clone(), cell);
        }
    }
    values
}

pub fn remove_item(doc: &Document, item_id: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = item_id.trim();
    if id.is_empty() {
        return Err(DataError::InvalidItemId);
    }
    if normalized.item(id).is_none() {
        return Err(DataError::ItemNotFound);
    }
    let mut next = normalized.clone();
    next.items.retain(|item| item.id != id);
    RawDocument::from_document(&next).normalize()
}

/// Advances one cell through the value set: unset, first entry, ..., last entry, unset.
pub fn cycle_item_value(doc: &Document, item_id: &str, column_id: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let item_id = item_id.trim();
    let column_id = column_id.trim();
    let Some(item) = normalized.item(item_id) else {
        return Err(DataError::ItemNotFound);
    };
    if normalized.column(column_id).is_none() {
        return Err(DataError::ColumnNotFound);
    }

    let current = item.values.get(column_id).cloned().flatten();
    let position = current
        .as_deref()
        .and_then(|id| normalized.value_set.iter().position(|entry| entry.id == id));
    let next = match position {
        None => normalized.value_set.first(),
        Some(index) => normalized.value_set.get(index + 1),
    }
    .map(|entry| entry.id.clone());

    let mut values = Map::new();
    values.insert(column_id.to_string(), json!(next));
    let updates = ItemUpdate {
        values: Some(values),
        ..ItemUpdate::default()
    };
    update_item(&normalized, item_id, &updates)
}
