#![forbid(unsafe_code)]

//! Mutations over a document. Every operation re-normalizes its input, validates, builds a
//! fresh raw document and normalizes that again; the input is never modified.

mod columns;
mod items;
mod tags;
mod value_set;

pub use columns::*;
pub use items::*;
pub use tags::*;
pub use value_set::*;

use crate::normalize::{Document, normalize_data};
use crate::DataError;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

fn renormalize(doc: &Document) -> Result<Document, DataError> {
    normalize_data(&doc.to_value())
}

struct RawDocument {
    value_set: Vec<Value>,
    columns: Vec<Value>,
    tags: Vec<Value>,
    items: Vec<Value>,
}

impl RawDocument {
    fn from_document(doc: &Document) -> Self {
        Self {
            value_set: doc.value_set.iter().map(|e| e.to_value()).collect(),
            columns: doc.columns.iter().map(|c| c.to_value()).collect(),
            tags: doc.tags.iter().map(|t| t.to_value()).collect(),
            items: doc.items.iter().map(|i| i.to_value()).collect(),
        }
    }

    fn normalize(self) -> Result<Document, DataError> {
        normalize_data(&json!({
            "valueSet": self.value_set,
            "columns": self.columns,
            "tags": self.tags,
            "items": self.items,
        }))
    }
}

/// Reorder positions must be integers; `3.0` counts, `1.5`, strings and `null` do not.
pub fn reorder_index(value: &Value) -> Result<i64, DataError> {
    if let Some(index) = value.as_i64() {
        return Ok(index);
    }
    match value.as_f64() {
        Some(index) if index.fract() == 0.0 && index.abs() < i64::MAX as f64 => Ok(index as i64),
        _ => Err(DataError::InvalidReorder),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests;
