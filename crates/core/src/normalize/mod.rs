#![forbid(unsafe_code)]

mod columns;
mod items;
mod tags;
mod value_set;

pub use columns::*;
pub use items::*;
pub use tags::*;
pub use value_set::*;

use crate::DataError;
use columns::normalize_column_set;
use items::normalize_item_set;
use value_set::is_legacy_boolean_cell;
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub value_set: Vec<ValueSetEntry>,
    pub columns: Vec<Column>,
    pub tags: Vec<TagDef>,
    pub items: Vec<Item>,
}

impl Document {
    /// The persisted JSON shape; feeding it back through [`normalize_data`] is a no-op.
    pub fn to_value(&self) -> Value {
        json!({
            "valueSet": self.value_set.iter().map(ValueSetEntry::to_value).collect::<Vec<_>>(),
            "columns": self.columns.iter().map(Column::to_value).collect::<Vec<_>>(),
            "tags": self.tags.iter().map(TagDef::to_value).collect::<Vec<_>>(),
            "items": self.items.iter().map(Item::to_value).collect::<Vec<_>>(),
        })
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&TagDef> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn value_entry(&self, id: &str) -> Option<&ValueSetEntry> {
        self.value_set.iter().find(|entry| entry.id == id)
    }
}

/// Converts arbitrary (possibly legacy-shaped) input into a canonical document.
///
/// Objects are read as documents. A bare array is read as a legacy list of boolean-valued
/// items whose columns are inferred from the cell keys. Anything else is rejected.
pub fn normalize_data(raw: &Value) -> Result<Document, DataError> {
    let legacy;
    let doc = match raw {
        Value::Object(map) => map,
        Value::Array(items) => {
            legacy = legacy_item_list(items);
            &legacy
        }
        _ => return Err(DataError::InvalidFormat),
    };

    let column_set = normalize_column_set(doc.get("columns"));
    if column_set.columns.is_empty() {
        return Err(DataError::NoColumns);
    }
    let tags = normalize_tag_definitions(doc.get("tags"));
    let value_set = resolve_value_set(doc.get("valueSet"), doc.get("items"));
    let items = normalize_item_set(doc.get("items"), &column_set, &tags, &value_set);

    Ok(Document {
        value_set,
        columns: column_set.columns,
        tags,
        items,
    })
}

fn resolve_value_set(raw: Option<&Value>, raw_items: Option<&Value>) -> Vec<ValueSetEntry> {
    let declared = raw
        .and_then(Value::as_array)
        .is_some_and(|entries| !entries.is_empty());
    if declared {
        return normalize_value_set(raw);
    }
    if has_legacy_boolean_cells(raw_items) {
        return legacy_boolean_value_set();
    }
    default_value_set()
}

fn has_legacy_boolean_cells(raw_items: Option<&Value>) -> bool {
    let Some(items) = raw_items.and_then(Value::as_array) else {
        return false;
    };
    let mut cells = items
        .iter()
        .filter_map(|item| item.get("values").and_then(Value::as_object))
        .flat_map(|values| values.values())
        .filter(|cell| !is_blank_cell(cell))
        .peekable();
    cells.peek().is_some() && cells.all(is_legacy_boolean_cell)
}

fn is_blank_cell(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn legacy_item_list(items: &[Value]) -> Map<String, Value> {
    let mut keys: Vec<String> = Vec::new();
    for values in items
        .iter()
        .filter_map(|item| item.get("values").and_then(Value::as_object))
    {
        for key in values.keys() {
            if !key.trim().is_empty() && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    let columns = keys
        .iter()
        .map(|key| json!({ "id": key, "name": key }))
        .collect::<Vec<_>>();

    let mut doc = Map::new();
    doc.insert("columns".to_string(), Value::Array(columns));
    doc.insert("items".to_string(), Value::Array(items.to_vec()));
    doc
}
