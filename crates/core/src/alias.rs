#![forbid(unsafe_code)]

use std::collections::HashMap;

/// Resolves free text (an id, a label, a legacy spelling) to one canonical entry.
pub trait AliasResolver {
    type Entry;

    fn resolve(&self, candidate: &str) -> Option<&Self::Entry>;
}

/// Index of canonical ids and alternate spellings into an entry slice.
/// The first registration of a key wins.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    ids: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_id(&mut self, id: &str, index: usize) {
        self.ids.entry(id.to_string()).or_insert(index);
    }

    pub fn insert_alias(&mut self, alias: &str, index: usize) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        self.aliases.entry(alias.to_string()).or_insert(index);
    }

    pub fn by_id(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    pub fn by_alias(&self, alias: &str) -> Option<usize> {
        self.aliases.get(alias).copied()
    }
}
