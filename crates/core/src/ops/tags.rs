#![forbid(unsafe_code)]

use super::{RawDocument, renormalize};
use crate::DataError;
use crate::normalize::{Document, TAG_ID_PREFIX, TagDef};
use crate::order::{move_entry, reindex};
use crate::text::{IdPool, rank, slugify};

fn has_duplicate_label(tags: &[TagDef], label: &str, exclude_id: Option<&str>) -> bool {
    tags.iter()
        .any(|tag| tag.label == label && Some(tag.id.as_str()) != exclude_id)
}

fn generate_tag_id(label: &str, ids: &mut IdPool) -> String {
    let slug = slugify(label, "tag");
    let base = if slug.starts_with(TAG_ID_PREFIX) {
        slug
    } else {
        format!("{TAG_ID_PREFIX}{slug}")
    };
    ids.claim(&base)
}

pub fn add_tag(doc: &Document, label: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let label = label.trim();
    if label.is_empty() {
        return Err(DataError::EmptyTagLabel);
    }
    if has_duplicate_label(&normalized.tags, label, None) {
        return Err(DataError::DuplicateTagLabel);
    }

    let mut ids = IdPool::with_existing(normalized.tags.iter().map(|t| t.id.as_str()));
    let mut next = normalized.clone();
    next.tags.push(TagDef {
        id: generate_tag_id(label, &mut ids),
        label: label.to_string(),
        order: rank(normalized.tags.len()),
        aliases: vec![label.to_string()],
    });
    RawDocument::from_document(&next).normalize()
}

/// Renames a tag. The previous label stays resolvable as an alias.
pub fn update_tag(doc: &Document, tag_id: &str, label: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = tag_id.trim();
    if id.is_empty() {
        return Err(DataError::InvalidTagId);
    }
    let label = label.trim();
    if label.is_empty() {
        return Err(DataError::EmptyTagLabel);
    }
    if normalized.tag(id).is_none() {
        return Err(DataError::TagNotFound);
    }
    if has_duplicate_label(&normalized.tags, label, Some(id)) {
        return Err(DataError::DuplicateTagLabel);
    }

    let mut next = normalized.clone();
    if let Some(tag) = next.tags.iter_mut().find(|tag| tag.id == id) {
        tag.label = label.to_string();
        if !tag.aliases.iter().any(|alias| alias == label) {
            tag.aliases.push(label.to_string());
        }
    }
    RawDocument::from_document(&next).normalize()
}

/// Removes a tag. Items whose primary tag it was fall back to their next remaining tag.
pub fn delete_tag(doc: &Document, tag_id: &str) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let id = tag_id.trim();
    if id.is_empty() {
        return Err(DataError::InvalidTagId);
    }
    if normalized.tag(id).is_none() {
        return Err(DataError::TagNotFound);
    }

    let mut next = normalized.clone();
    next.tags.retain(|tag| tag.id != id);
    reindex(&mut next.tags);
    for item in &mut next.items {
        item.tags.retain(|tag| tag != id);
        if item.tag.as_deref() == Some(id) {
            item.tag = item.tags.first().cloned();
        }
    }
    RawDocument::from_document(&next).normalize()
}

/// Moves the tag at `from` to `to` (clamped into range) and renumbers every tag densely.
pub fn reorder_tags(doc: &Document, from: i64, to: i64) -> Result<Document, DataError> {
    let normalized = renormalize(doc)?;
    let Ok(from) = usize::try_from(from) else {
        return Err(DataError::SourceIndexOutOfRange);
    };
    if from >= normalized.tags.len() {
        return Err(DataError::SourceIndexOutOfRange);
    }

    let mut next = normalized.clone();
    if !move_entry(&mut next.tags, from, to) {
        return Ok(normalized);
    }
    reindex(&mut next.tags);
    RawDocument::from_document(&next).normalize()
}
