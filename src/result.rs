use std::collections::HashSet;

use crate::base::{Key, Len};
use crate::index::Index;

/// Keys matched by a combined query.
///
/// The result borrows the index it was computed from: sizes and the
/// complement are relative to that index's table as it was when queried.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    keys: HashSet<Key>,
    index: &'a Index,
}

impl<'a> QueryResult<'a> {
    pub(crate) fn new(keys: HashSet<Key>, index: &'a Index) -> Self {
        Self { keys, index }
    }

    /// Matched keys, in no particular order
    pub fn items(&self) -> Vec<Key> {
        self.keys.iter().copied().collect()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Returns true if the result holds less than `threshold` of the table
    /// keys, i.e. sending the result is cheaper than sending its complement.
    pub fn smaller_than_complement(&self, threshold: f32) -> bool {
        let table_size = self.index.table().len();
        if table_size == 0 {
            return true;
        }
        (self.keys.len() as f32) / (table_size as f32) < threshold
    }

    /// Table keys that are not in the result (scans the whole table)
    pub fn complement(&self) -> Vec<Key> {
        self.index
            .table()
            .iter()
            .map(|(&key, _)| key)
            .filter(|key| !self.keys.contains(key))
            .collect()
    }

    pub fn into_keys(self) -> HashSet<Key> {
        self.keys
    }
}

impl Len for QueryResult<'_> {
    fn len(&self) -> usize {
        self.keys.len()
    }
}
