#![forbid(unsafe_code)]

use super::csv::{NAME_HEADER_ID, NAME_HEADER_LABEL, TAG_HEADER_ID, TAG_HEADER_LABEL};
use super::csv::{TableData, TableHeader, TableRow};
use crate::normalize::{Column, Document, TagDef, ValueSetEntry};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Active view filters. `None` in any field means "everything".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatrixFilter {
    pub columns: Option<Vec<String>>,
    /// `None` entries select untagged items.
    pub tags: Option<Vec<Option<String>>>,
    pub items: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub id: String,
    pub name: String,
    pub tag: Option<String>,
    pub tag_label: String,
    pub values: Vec<Option<ValueSetEntry>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub columns: Vec<Column>,
    pub tags: Vec<TagDef>,
    pub rows: Vec<MatrixRow>,
    /// Position of every visible row in the document's item list.
    pub item_order: Vec<usize>,
}

pub fn visible_columns(columns: &[Column], selected: Option<&[String]>) -> Vec<Column> {
    let mut sorted = columns.to_vec();
    sorted.sort_by_key(|column| column.order);
    match selected {
        None => sorted,
        Some(ids) => {
            let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            sorted.retain(|column| ids.contains(column.id.as_str()));
            sorted
        }
    }
}

pub fn build_matrix(doc: &Document, filter: &MatrixFilter) -> Matrix {
    let columns = visible_columns(&doc.columns, filter.columns.as_deref());
    let tag_set: Option<HashSet<Option<&str>>> = filter
        .tags
        .as_ref()
        .map(|tags| tags.iter().map(Option::as_deref).collect());
    let item_set: Option<HashSet<&str>> = filter
        .items
        .as_ref()
        .map(|items| items.iter().map(String::as_str).collect());
    let tag_by_id: HashMap<&str, &TagDef> = doc.tags.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut rows = Vec::new();
    let mut item_order = Vec::new();
    for (index, item) in doc.items.iter().enumerate() {
        if let Some(tags) = &tag_set
            && !tags.contains(&item.tag.as_deref())
        {
            continue;
        }
        if let Some(items) = &item_set
            && !items.contains(item.id.as_str())
        {
            continue;
        }
        let tag_label = match item.tag.as_deref() {
            None => String::new(),
            Some(tag) => tag_by_id
                .get(tag)
                .map_or_else(|| tag.to_string(), |def| def.label.clone()),
        };
        let values = columns
            .iter()
            .map(|column| {
                item.values
                    .get(&column.id)
                    .and_then(Option::as_deref)
                    .and_then(|id| doc.value_entry(id))
                    .cloned()
            })
            .collect();
        rows.push(MatrixRow {
            id: item.id.clone(),
            name: item.name.clone(),
            tag: item.tag.clone(),
            tag_label,
            values,
        });
        item_order.push(index);
    }

    Matrix {
        columns,
        tags: doc.tags.clone(),
        rows,
        item_order,
    }
}

/// Flattens a matrix into the CSV table shape: tag, name, then one label per visible column.
pub fn table_data(matrix: &Matrix) -> TableData {
    let mut headers = vec![
        TableHeader::new(TAG_HEADER_ID, TAG_HEADER_LABEL),
        TableHeader::new(NAME_HEADER_ID, NAME_HEADER_LABEL),
    ];
    headers.extend(
        matrix
            .columns
            .iter()
            .map(|column| TableHeader::new(&column.id, &column.name)),
    );
    let rows = matrix
        .rows
        .iter()
        .map(|row| TableRow {
            tag_label: row.tag_label.clone(),
            name: row.name.clone(),
            values: row
                .values
                .iter()
                .map(|cell| cell.as_ref().map(|entry| entry.label.clone()).unwrap_or_default())
                .collect(),
        })
        .collect();
    TableData { headers, rows }
}
