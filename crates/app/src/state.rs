#![forbid(unsafe_code)]

use crate::AppError;
use cm_core::view::MatrixFilter;
use cm_core::{Document, Item};
use serde::Serialize;
use std::collections::HashSet;

/// Tag-filter value standing for "items without a tag".
pub(crate) const UNTAGGED_TAG_VALUE: &str = "__untagged__";

/// Active filters. `None` means "all"; `Some([])` means "none".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Selection {
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) items: Option<Vec<String>>,
}

#[derive(Debug)]
pub(crate) struct AppState {
    document: Document,
    selection: Selection,
    read_only: bool,
}

impl AppState {
    pub(crate) fn new(document: Document, read_only: bool) -> Self {
        Self {
            document,
            selection: Selection::default(),
            read_only,
        }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub(crate) fn ensure_writable(&self) -> Result<(), AppError> {
        if self.read_only {
            return Err(AppError::ReadOnly);
        }
        Ok(())
    }

    /// Installs the result of a mutation and reconciles the filters with it.
    pub(crate) fn apply(&mut self, next: Document) {
        self.document = next;
        self.reconcile_columns();
        self.selection.tags = reconcile(
            self.selection.tags.take(),
            &available_tag_values(&self.document),
        );
        self.selection.items = reconcile(
            self.selection.items.take(),
            &available_item_ids(&self.document.items),
        );
    }

    /// Installs a loaded or reset document; every filter goes back to "all".
    pub(crate) fn replace(&mut self, next: Document) {
        self.document = next;
        self.selection = Selection::default();
    }

    pub(crate) fn select_columns(&mut self, columns: Option<Vec<String>>) {
        let available = self.document.columns.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        self.selection.columns = choose(columns, &available);
    }

    pub(crate) fn select_tags(&mut self, tags: Option<Vec<String>>) {
        let available = available_tag_values(&self.document);
        self.selection.tags = choose(tags, &available);
    }

    pub(crate) fn select_items(&mut self, items: Option<Vec<String>>) {
        let available = available_item_ids(&self.document.items);
        self.selection.items = choose(items, &available);
    }

    pub(crate) fn matrix_filter(&self) -> MatrixFilter {
        MatrixFilter {
            columns: self.selection.columns.clone(),
            tags: self.selection.tags.as_ref().map(|tags| {
                tags.iter()
                    .map(|tag| (tag != UNTAGGED_TAG_VALUE).then(|| tag.clone()))
                    .collect()
            }),
            items: self.selection.items.clone(),
        }
    }

    fn reconcile_columns(&mut self) {
        let Some(selected) = self.selection.columns.take() else {
            return;
        };
        let ids: HashSet<&str> = self.document.columns.iter().map(|c| c.id.as_str()).collect();
        let kept = selected
            .into_iter()
            .filter(|id| ids.contains(id.as_str()))
            .collect::<Vec<_>>();
        if !ids.is_empty() && kept.len() == ids.len() {
            return;
        }
        self.selection.columns = Some(kept);
    }
}

/// Tag ids when definitions exist, otherwise the free-text tags in use; plus the untagged
/// sentinel when some item has no tag.
pub(crate) fn available_tag_values(doc: &Document) -> Vec<String> {
    let mut values: Vec<String> = if doc.tags.is_empty() {
        let mut seen = Vec::new();
        for tag in doc.items.iter().filter_map(|item| item.tag.as_ref()) {
            if !seen.contains(tag) {
                seen.push(tag.clone());
            }
        }
        seen
    } else {
        doc.tags.iter().map(|tag| tag.id.clone()).collect()
    };
    if doc.items.iter().any(|item| item.tag.is_none()) {
        values.push(UNTAGGED_TAG_VALUE.to_string());
    }
    values
}

fn available_item_ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

fn retain_available(selected: Vec<String>, available: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for value in selected {
        if available.contains(&value) && !kept.contains(&value) {
            kept.push(value);
        }
    }
    kept
}

/// Explicit user choice: everything selected collapses to `None`, nothing stays `Some([])`.
fn choose(selected: Option<Vec<String>>, available: &[String]) -> Option<Vec<String>> {
    let kept = retain_available(selected?, available);
    if kept.len() == available.len() {
        return None;
    }
    Some(kept)
}

/// After a mutation: empty or complete selections collapse to `None`.
fn reconcile(selected: Option<Vec<String>>, available: &[String]) -> Option<Vec<String>> {
    if available.is_empty() {
        return None;
    }
    let kept = retain_available(selected?, available);
    if kept.is_empty() || kept.len() == available.len() {
        return None;
    }
    Some(kept)
}
