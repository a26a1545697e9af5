#![forbid(unsafe_code)]

use super::columns::{Column, ColumnSet};
use super::tags::{TAG_ORDER_FALLBACK, TagDef, TagMatcher};
use super::value_set::{ValueMatcher, ValueSetEntry};
use crate::text::{IdPool, compare_base, normalize_tag, order_value, sanitize_label, slugify};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

const UNTAGGED_BUCKET: &str = "";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub tag: Option<String>,
    pub tags: Vec<String>,
    /// One entry per column id; `None` is an unset cell.
    pub values: BTreeMap<String, Option<String>>,
}

impl Item {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "order": self.order,
            "tag": self.tag,
            "tags": self.tags,
            "values": self.values,
        })
    }
}

struct PendingItem {
    id: String,
    name: String,
    order: Option<i64>,
    tag: Option<String>,
    tags: Vec<String>,
    values: BTreeMap<String, Option<String>>,
    input_index: usize,
}

pub fn normalize_items(
    raw: Option<&Value>,
    columns: &[Column],
    tag_defs: &[TagDef],
    value_set: &[ValueSetEntry],
) -> Vec<Item> {
    let column_set = ColumnSet {
        columns: columns.to_vec(),
        source_keys: HashMap::new(),
    };
    normalize_item_set(raw, &column_set, tag_defs, value_set)
}

pub(crate) fn normalize_item_set(
    raw: Option<&Value>,
    column_set: &ColumnSet,
    tag_defs: &[TagDef],
    value_set: &[ValueSetEntry],
) -> Vec<Item> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };

    let tag_matcher = TagMatcher::new(tag_defs);
    let value_matcher = ValueMatcher::new(value_set);
    let empty_values = Map::new();
    let mut ids = IdPool::new();
    let mut names = HashSet::new();
    let mut unmatched_tags = HashSet::new();
    let mut pending = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let obj = entry.as_object();
        let name = sanitize_label(obj.and_then(|o| o.get("name")));
        if name.is_empty() {
            continue;
        }
        if !names.insert(name.clone()) {
            tracing::warn!(name = %name, "duplicate item name dropped");
            continue;
        }
        let provided_id = sanitize_label(obj.and_then(|o| o.get("id")));
        let base = if provided_id.is_empty() { &name } else { &provided_id };
        let id = ids.claim(&slugify(base, &format!("item-{}", index + 1)));

        let candidates = tag_candidates(obj);
        let tags = match &tag_matcher {
            Some(matcher) => {
                let mut matched: Vec<String> = Vec::new();
                for candidate in &candidates {
                    match matcher.lookup(candidate) {
                        Some(definition) => {
                            if !matched.contains(&definition.id) {
                                matched.push(definition.id.clone());
                            }
                        }
                        None => {
                            if unmatched_tags.insert(candidate.to_lowercase()) {
                                tracing::warn!(tag = %candidate, "no tag definition matches");
                            }
                        }
                    }
                }
                matched
            }
            None => {
                let mut normalized: Vec<String> = Vec::new();
                for candidate in &candidates {
                    if let Some(tag) = normalize_tag(candidate)
                        && !normalized.contains(&tag)
                    {
                        normalized.push(tag);
                    }
                }
                normalized
            }
        };

        let raw_values = obj
            .and_then(|o| o.get("values"))
            .and_then(Value::as_object)
            .unwrap_or(&empty_values);
        let mut values = BTreeMap::new();
        for column in &column_set.columns {
            let raw_cell = column_set
                .source_keys
                .get(&column.id)
                .and_then(|key| raw_values.get(key))
                .or_else(|| raw_values.get(&column.id));
            let resolved = value_matcher
                .resolve_or(raw_cell, None)
                .map(|entry| entry.id.clone());
            values.insert(column.id.clone(), resolved);
        }

        pending.push(PendingItem {
            id,
            name,
            order: order_value(obj.and_then(|o| o.get("order"))),
            tag: tags.first().cloned(),
            tags,
            values,
            input_index: index,
        });
    }

    backfill_orders(&mut pending);

    match tag_matcher {
        Some(_) => {
            let by_id: HashMap<&str, &TagDef> =
                tag_defs.iter().map(|def| (def.id.as_str(), def)).collect();
            pending.sort_by(|a, b| compare_with_definitions(a, b, &by_id));
        }
        None => pending.sort_by(compare_free_text),
    }

    pending
        .into_iter()
        .map(|item| Item {
            id: item.id,
            name: item.name,
            order: item.order.unwrap_or(1),
            tag: item.tag,
            tags: item.tags,
            values: item.values,
        })
        .collect()
}

fn tag_candidates(obj: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(obj) = obj else {
        return Vec::new();
    };
    let single = obj.get("tag").into_iter();
    let listed = obj
        .get("tags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    let mut out: Vec<String> = Vec::new();
    for raw in single.chain(listed) {
        let candidate = sanitize_label(Some(raw));
        if !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Items without a declared order take the next rank after the highest one seen so far in
/// their primary-tag bucket, walking in input order.
fn backfill_orders(items: &mut [PendingItem]) {
    let mut counters: HashMap<String, i64> = HashMap::new();
    for item in items.iter_mut() {
        let bucket = item.tag.clone().unwrap_or_else(|| UNTAGGED_BUCKET.to_string());
        let current = counters.get(&bucket).copied().unwrap_or(0);
        match item.order {
            Some(order) => {
                counters.insert(bucket, current.max(order));
            }
            None => {
                let next = current.saturating_add(1);
                counters.insert(bucket, next);
                item.order = Some(next);
            }
        }
    }
}

fn compare_with_definitions(
    a: &PendingItem,
    b: &PendingItem,
    by_id: &HashMap<&str, &TagDef>,
) -> Ordering {
    let definition = |item: &PendingItem| item.tag.as_deref().and_then(|t| by_id.get(t).copied());
    let rank = |item: &PendingItem| definition(item).map_or(TAG_ORDER_FALLBACK, |d| d.order);
    let label = |item: &PendingItem| match (definition(item), item.tag.as_deref()) {
        (Some(def), _) => def.label.clone(),
        (None, Some(tag)) => tag.to_string(),
        (None, None) => String::new(),
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| compare_base(&label(a), &label(b)))
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| compare_base(&a.name, &b.name))
        .then_with(|| a.input_index.cmp(&b.input_index))
}

fn compare_free_text(a: &PendingItem, b: &PendingItem) -> Ordering {
    let tagged = |item: &PendingItem| item.tag.is_some();
    tagged(b)
        .cmp(&tagged(a))
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| match (&a.tag, &b.tag) {
            (Some(a_tag), Some(b_tag)) => compare_base(a_tag, b_tag),
            _ => Ordering::Equal,
        })
        .then_with(|| compare_base(&a.name, &b.name))
        .then_with(|| a.input_index.cmp(&b.input_index))
}
