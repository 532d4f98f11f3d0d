use std::collections::{hash_map, HashMap};

use crate::base::{Bit, Key, Len};
use crate::bitvector::BitVector;

/// Map of keys to bit vectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    vectors: HashMap<Key, BitVector>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bit for `key`, creating its vector if needed
    pub fn set(&mut self, key: Key, bit: Bit) {
        self.vectors.entry(key).or_default().set(bit);
    }

    pub fn get(&self, key: Key) -> Option<&BitVector> {
        self.vectors.get(&key)
    }

    pub fn contains(&self, key: Key) -> bool {
        self.vectors.contains_key(&key)
    }

    /// All keys, in no particular order
    pub fn keys(&self) -> Vec<Key> {
        self.vectors.keys().copied().collect()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Key, BitVector> {
        self.vectors.iter()
    }

    /// Number of bytes allocated over all the vectors
    pub fn allocated_bytes(&self) -> usize {
        self.vectors.values().map(BitVector::allocated_bytes).sum()
    }

    /// Adds a restored vector; returns false if the key was already present
    pub(crate) fn insert(&mut self, key: Key, vector: BitVector) -> bool {
        match self.vectors.entry(key) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(entry) => {
                entry.insert(vector);
                true
            }
        }
    }
}

impl Len for Table {
    fn len(&self) -> usize {
        self.vectors.len()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a Key, &'a BitVector);
    type IntoIter = hash_map::Iter<'a, Key, BitVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        let mut table = Table::new();
        table.set(100, 0);
        table.set(100, 2);
        table.set(101, 12);

        assert_eq!(table.len(), 2);
        assert_eq!(table.allocated_bytes(), 2);
        assert!(table.get(100).unwrap().has(2));
        assert!(table.get(102).is_none());
        assert!(table.contains(101));
        assert!(!table.contains(102));

        let mut keys = table.keys();
        keys.sort();
        assert_eq!(keys, vec![100, 101]);

        assert!(!table.insert(100, BitVector::new()));
        assert!(table.insert(102, BitVector::new()));
    }
}
