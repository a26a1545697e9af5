#![forbid(unsafe_code)]

use crate::alias::{AliasResolver, AliasTable};
use crate::order::{Ranked, reindex};
use crate::text::{compare_base, normalize_tag, order_value, sanitize_label};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Rank given to tags without a usable declared order; they sort last.
pub const TAG_ORDER_FALLBACK: i64 = i64::MAX;

pub const TAG_ID_PREFIX: &str = "tag-";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagDef {
    pub id: String,
    pub label: String,
    pub order: i64,
    pub aliases: Vec<String>,
}

impl TagDef {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "label": self.label,
            "order": self.order,
            "aliases": self.aliases,
        })
    }
}

impl Ranked for TagDef {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

pub fn normalize_tag_definitions(raw: Option<&Value>) -> Vec<TagDef> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };

    let mut definitions: Vec<TagDef> = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_labels = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let obj = entry.as_object();
        let id = sanitize_label(obj.and_then(|o| o.get("id")));
        if id.is_empty() {
            tracing::warn!(index, "tag definition without id dropped");
            continue;
        }
        if seen_ids.contains(&id) {
            tracing::warn!(id = %id, "duplicate tag id dropped");
            continue;
        }
        let mut label = sanitize_label(obj.and_then(|o| o.get("label")));
        if label.is_empty() {
            label = id.clone();
        }
        if seen_labels.contains(&label) {
            tracing::warn!(id = %id, label = %label, "duplicate tag label dropped");
            continue;
        }
        let order = order_value(obj.and_then(|o| o.get("order"))).unwrap_or(TAG_ORDER_FALLBACK);

        let mut aliases: Vec<String> = Vec::new();
        let declared = obj
            .and_then(|o| o.get("aliases"))
            .and_then(Value::as_array)
            .map(|a| a.as_slice())
            .unwrap_or_default();
        let candidates = [label.clone(), id.clone()]
            .into_iter()
            .chain(declared.iter().map(|alias| sanitize_label(Some(alias))));
        for alias in candidates {
            if !alias.is_empty() && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        seen_ids.insert(id.clone());
        seen_labels.insert(label.clone());
        definitions.push(TagDef {
            id,
            label,
            order,
            aliases,
        });
    }

    definitions.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| compare_base(&a.label, &b.label))
    });
    reindex(&mut definitions);
    definitions
}

/// Resolves free-text tag references: id, normalized id, alias, normalized alias.
#[derive(Debug)]
pub struct TagMatcher<'a> {
    definitions: &'a [TagDef],
    table: AliasTable,
}

impl<'a> TagMatcher<'a> {
    /// `None` when there are no definitions to match against.
    pub fn new(definitions: &'a [TagDef]) -> Option<Self> {
        if definitions.is_empty() {
            return None;
        }
        let mut table = AliasTable::new();
        for (index, definition) in definitions.iter().enumerate() {
            table.insert_id(&definition.id, index);
            let spellings = [&definition.id, &definition.label]
                .into_iter()
                .chain(definition.aliases.iter());
            for spelling in spellings {
                table.insert_alias(spelling, index);
                if let Some(normalized) = normalize_tag(spelling) {
                    table.insert_alias(&normalized, index);
                }
            }
        }
        Some(Self { definitions, table })
    }

    pub fn lookup(&self, candidate: &str) -> Option<&'a TagDef> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = normalize_tag(trimmed);
        let normalized = normalized.as_deref();
        let index = self
            .table
            .by_id(trimmed)
            .or_else(|| normalized.and_then(|n| self.table.by_id(n)))
            .or_else(|| self.table.by_alias(trimmed))
            .or_else(|| normalized.and_then(|n| self.table.by_alias(n)))?;
        self.definitions.get(index)
    }
}

impl AliasResolver for TagMatcher<'_> {
    type Entry = TagDef;

    fn resolve(&self, candidate: &str) -> Option<&TagDef> {
        self.lookup(candidate)
    }
}
