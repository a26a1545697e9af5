#![forbid(unsafe_code)]

//! Best-effort persistence of the document and the read-only preference. Failures are logged
//! and reported as "nothing stored" or "not saved"; they never reach mutation callers.

use crate::{KeyValueStore, StoreError};
use cm_core::{Document, normalize_data};
use serde_json::Value;

pub const STORAGE_KEY: &str = "checklist-boolean-data";
pub const READONLY_STORAGE_KEY: &str = "check-matrix-readonly-mode";

fn read_stored_value(store: &impl KeyValueStore) -> Result<Option<Value>, StoreError> {
    let Some(raw) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

fn write_document(store: &mut impl KeyValueStore, doc: &Document) -> Result<(), StoreError> {
    let payload = serde_json::to_string(&doc.to_value())?;
    store.set(STORAGE_KEY, &payload)
}

pub fn load_document(store: &impl KeyValueStore) -> Option<Document> {
    let value = match read_stored_value(store) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read stored document");
            return None;
        }
    };
    match normalize_data(&value) {
        Ok(doc) => Some(doc),
        Err(err) => {
            tracing::warn!(error = %err, code = err.code(), "stored document rejected");
            None
        }
    }
}

/// Returns whether the document reached the store.
pub fn save_document(store: &mut impl KeyValueStore, doc: &Document) -> bool {
    match write_document(store, doc) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "failed to save document");
            false
        }
    }
}

pub fn clear_document(store: &mut impl KeyValueStore) {
    if let Err(err) = store.remove(STORAGE_KEY) {
        tracing::warn!(error = %err, "failed to clear stored document");
    }
}

/// `"true"`/`"1"` and `"false"`/`"0"` are exact; anything else is read-only only when it
/// spells `yes`.
pub fn parse_read_only_flag(stored: &str) -> bool {
    match stored {
        "true" | "1" => true,
        "false" | "0" => false,
        other => other.trim().eq_ignore_ascii_case("yes"),
    }
}

pub fn load_read_only_preference(store: &impl KeyValueStore) -> bool {
    match store.get(READONLY_STORAGE_KEY) {
        Ok(Some(stored)) => parse_read_only_flag(&stored),
        Ok(None) => false,
        Err(err) => {
            tracing::warn!(error = %err, "failed to restore read-only preference");
            false
        }
    }
}

pub fn save_read_only_preference(store: &mut impl KeyValueStore, read_only: bool) {
    let flag = if read_only { "true" } else { "false" };
    if let Err(err) = store.set(READONLY_STORAGE_KEY, flag) {
        tracing::warn!(error = %err, "failed to save read-only preference");
    }
}
