#![forbid(unsafe_code)]

use crate::text::rank;

/// Entities carrying a dense 1-based `order` field.
pub trait Ranked {
    fn set_order(&mut self, order: i64);
}

/// Rewrites `order` so it matches the position in the slice (1..=len).
pub fn reindex<T: Ranked>(entries: &mut [T]) {
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.set_order(rank(index));
    }
}

/// Moves `from` to the clamped `to` position. Returns false when nothing moved.
pub(crate) fn move_entry<T>(entries: &mut Vec<T>, from: usize, to: i64) -> bool {
    let last = entries.len().saturating_sub(1);
    let target = usize::try_from(to.max(0)).unwrap_or(usize::MAX).min(last);
    if from == target || from >= entries.len() {
        return false;
    }
    let moved = entries.remove(from);
    entries.insert(target, moved);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Slot(&'static str, i64);

    impl Ranked for Slot {
        fn set_order(&mut self, order: i64) {
            self.1 = order;
        }
    }

    #[test]
    fn reindex_assigns_positions() {
        let mut slots = vec![Slot("a", 7), Slot("b", 7), Slot("c", 100)];
        reindex(&mut slots);
        assert_eq!(slots, vec![Slot("a", 1), Slot("b", 2), Slot("c", 3)]);
    }

    #[test]
    fn move_entry_clamps_target() {
        let mut v = vec![1, 2, 3];
        assert!(move_entry(&mut v, 0, 99));
        assert_eq!(v, vec![2, 3, 1]);
        assert!(move_entry(&mut v, 2, -4));
        assert_eq!(v, vec![1, 2, 3]);
        assert!(!move_entry(&mut v, 1, 1));
    }
}
