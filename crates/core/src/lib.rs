#![forbid(unsafe_code)]

//! Check-matrix document model: normalization of arbitrary JSON into a canonical document,
//! whole-document mutations, and the matrix/CSV projections built on top of it.

pub mod alias;
pub mod defaults;
mod error;
pub mod normalize;
pub mod ops;
pub mod order;
pub mod text;
pub mod view;

pub use defaults::default_document;
pub use error::DataError;
pub use normalize::{Column, Document, Item, TagDef, ValueSetEntry, normalize_data};
