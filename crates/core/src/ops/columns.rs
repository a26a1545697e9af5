#![forbid(unsafe_code)]

use super::{RawDocument, renormalize};
use crate::DataError;
use crate::normalize::{COLUMN_TYPE, Document};
use crate::text::{IdPool, slugify};
use serde_json::{Value, json};

pub fn add_column(doc: &Document, name: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(DataError::EmptyColumnName);
    }
    if normalized.columns.iter().any(|column| column.name == name) {
        return Err(DataError::DuplicateColumnName);
    }

    let mut ids = IdPool::with_existing(normalized.columns.iter().map(|c| c.id.as_str()));
    let id = ids.claim(&slugify(name, "column"));
    let order = normalized
        .columns
        .last()
        .map_or(normalized.columns.len() as i64, |c| c.order)
        + 1;

    let mut raw = RawDocument::from_document(&normalized);
    raw.columns
        .push(json!({ "id": id, "name": name, "order": order, "type": COLUMN_TYPE }));
    for item in &mut raw.items {
        if let Some(values) = item.get_mut("values").and_then(Value::as_object_mut) {
            values.insert(id.clone(), Value::Null);
        }
    }
    raw.normalize()
}

pub fn rename_column(doc: &Document, column_id: &str, name: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = column_id.trim();
    let name = name.trim();
    if id.is_empty() {
        return Err(DataError::InvalidColumnId);
    }
    if name.is_empty() {
        return Err(DataError::EmptyNewColumnName);
    }
    if normalized.column(id).is_none() {
        return Err(DataError::ColumnNotFound);
    }
    if normalized
        .columns
        .iter()
        .any(|column| column.name == name && column.id != id)
    {
        return Err(DataError::DuplicateColumnName);
    }

    let mut next = normalized.clone();
    for column in &mut next.columns {
        if column.id == id {
            column.name = name.to_string();
        }
    }
    RawDocument::from_document(&next).normalize()
}

pub fn remove_column(doc: &Document, column_id: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = column_id.trim();
    if id.is_empty() {
        return Err(DataError::InvalidColumnId);
    }
    if normalized.column(id).is_none() {
        return Err(DataError::ColumnNotFound);
    }
    if normalized.columns.len() <= 1 {
        return Err(DataError::LastColumn);
    }

    let mut next = normalized.clone();
    next.columns.retain(|column| column.id != id);
    for item in &mut next.items {
        item.values.remove(id);
    }
    RawDocument::from_document(&next).normalize()
}
