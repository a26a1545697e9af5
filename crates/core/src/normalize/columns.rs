#![forbid(unsafe_code)]

use crate::order::{Ranked, reindex};
use crate::text::{IdPool, compare_locale, order_value, sanitize_label, slugify};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const COLUMN_TYPE: &str = "status";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub order: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Column {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "order": self.order,
            "type": self.kind,
        })
    }
}

impl Ranked for Column {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

/// Normalized columns plus the raw key each one was declared under (when it differs from the
/// canonical id), so item cells keyed by the raw key still land in the right column.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColumnSet {
    pub(crate) columns: Vec<Column>,
    pub(crate) source_keys: HashMap<String, String>,
}

pub fn normalize_columns(raw: Option<&Value>) -> Vec<Column> {
    normalize_column_set(raw).columns
}

pub(crate) fn normalize_column_set(raw: Option<&Value>) -> ColumnSet {
    let Some(Value::Array(entries)) = raw else {
        return ColumnSet::default();
    };

    let mut columns = Vec::new();
    let mut source_keys = HashMap::new();
    let mut ids = IdPool::new();
    let mut names = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let obj = entry.as_object();
        let name = sanitize_label(obj.and_then(|o| o.get("name")));
        if name.is_empty() {
            continue;
        }
        if !names.insert(name.clone()) {
            tracing::warn!(name = %name, "duplicate column name dropped");
            continue;
        }
        let provided_id = sanitize_label(obj.and_then(|o| o.get("id")));
        let source_key = if provided_id.is_empty() {
            name.clone()
        } else {
            provided_id
        };
        let id = ids.claim(&slugify(&source_key, &format!("column-{}", index + 1)));
        if id != source_key {
            source_keys.insert(id.clone(), source_key);
        }
        let order = order_value(obj.and_then(|o| o.get("order")))
            .unwrap_or_else(|| crate::text::rank(index));
        columns.push(Column {
            id,
            name,
            order,
            kind: COLUMN_TYPE.to_string(),
        });
    }

    columns.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| compare_locale(&a.name, &b.name))
    });
    reindex(&mut columns);
    ColumnSet {
        columns,
        source_keys,
    }
}
