#![forbid(unsafe_code)]

mod document;
mod error;
mod kv;
mod sqlite;

pub use document::*;
pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::{KvRow, SqliteStore};

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for b in digest {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
