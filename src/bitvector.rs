//! Sparse per-key bit vectors

use std::collections::HashMap;

use crate::base::{locate, Bit};

/// Bit vector stored as a map from byte offset to byte value.
///
/// Only bytes that ever held a set bit are allocated. Clearing bits never
/// releases a byte entry, so [`BitVector::allocated_bytes`] only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    bytes: HashMap<u32, u8>,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bit to 1
    pub fn set(&mut self, bit: Bit) {
        let (offset, shift) = locate(bit);
        *self.bytes.entry(offset).or_insert(0) |= 1 << shift;
    }

    /// Sets the bit to 0 (the byte entry stays allocated)
    pub fn clear(&mut self, bit: Bit) {
        let (offset, shift) = locate(bit);
        if let Some(byte) = self.bytes.get_mut(&offset) {
            *byte &= !(1 << shift);
        }
    }

    /// Flips the bit and returns its new state
    pub fn flip(&mut self, bit: Bit) -> bool {
        if self.has(bit) {
            self.clear(bit);
            false
        } else {
            self.set(bit);
            true
        }
    }

    pub fn has(&self, bit: Bit) -> bool {
        let (offset, shift) = locate(bit);
        self.bytes
            .get(&offset)
            .map_or(false, |byte| byte & (1 << shift) != 0)
    }

    /// True if at least one of the bits is set
    pub fn any(&self, bits: &[Bit]) -> bool {
        bits.iter().any(|&bit| self.has(bit))
    }

    /// True if all the bits are set
    pub fn all(&self, bits: &[Bit]) -> bool {
        bits.iter().all(|&bit| self.has(bit))
    }

    /// True if none of the bits is set
    pub fn not_any(&self, bits: &[Bit]) -> bool {
        !self.any(bits)
    }

    /// True if at least one of the bits is not set
    pub fn not_all(&self, bits: &[Bit]) -> bool {
        !self.all(bits)
    }

    /// Number of byte entries actually stored
    pub fn allocated_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Byte entries as (offset, value), in ascending offset order
    pub fn bytes(&self) -> Vec<(u32, u8)> {
        let mut bytes: Vec<(u32, u8)> = self.bytes.iter().map(|(&o, &v)| (o, v)).collect();
        bytes.sort_unstable_by_key(|&(offset, _)| offset);
        bytes
    }

    /// Restores a byte entry as is; returns false if the offset was taken
    pub(crate) fn insert_byte(&mut self, offset: u32, value: u8) -> bool {
        self.bytes.insert(offset, value).is_none()
    }
}
