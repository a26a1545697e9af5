#![forbid(unsafe_code)]

//! Read-side projections of a document: the filtered matrix and the exports built from it.

mod csv;
mod matrix;

pub use csv::*;
pub use matrix::*;

use crate::normalize::Document;

/// Pretty-printed (2-space) JSON of the document, suitable for saving and loading back.
pub fn export_json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

#[cfg(test)]
mod tests;
