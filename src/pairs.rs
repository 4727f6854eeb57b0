//! Lookup keyed by an ordered pair of symbol strings.

use rustc_hash::FxHashMap;

/// Two-level map from `(left, right)` to a value, queryable with borrowed `&str` halves so
/// that hot lookups during training and encoding do not allocate.
#[derive(Debug, Clone)]
pub(crate) struct PairIndex<V> {
    inner: FxHashMap<String, FxHashMap<String, V>>,
}

impl<V> Default for PairIndex<V> {
    fn default() -> Self {
        Self {
            inner: FxHashMap::default(),
        }
    }
}

impl<V: Copy> PairIndex<V> {
    pub(crate) fn get(&self, left: &str, right: &str) -> Option<V> {
        self.inner.get(left)?.get(right).copied()
    }

    /// Inserts `value` unless the pair is already present; returns the stored value.
    pub(crate) fn get_or_insert(&mut self, left: &str, right: &str, value: V) -> V {
        if let Some(existing) = self.get(left, right) {
            return existing;
        }
        self.inner
            .entry(left.to_owned())
            .or_default()
            .insert(right.to_owned(), value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_matters() {
        let mut index = PairIndex::default();
        index.get_or_insert("a", "b", 1usize);
        assert_eq!(index.get("a", "b"), Some(1));
        assert_eq!(index.get("b", "a"), None);
    }

    #[test]
    fn first_insert_wins() {
        let mut index = PairIndex::default();
        assert_eq!(index.get_or_insert("ɛ", "</w>", 3u32), 3);
        assert_eq!(index.get_or_insert("ɛ", "</w>", 7u32), 3);
        assert_eq!(index.get("ɛ", "</w>"), Some(3));
    }
}
