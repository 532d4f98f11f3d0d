pub type Key = u32;
pub type Member = u32;
pub type Bit = u32;
pub type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Byte offset and shift of a bit within a byte array
#[inline]
pub fn locate(bit: Bit) -> (u32, u8) {
    (bit / 8, (bit % 8) as u8)
}

/// Number of bytes needed to hold `bits` bits
#[inline]
pub fn byte_width(bits: usize) -> usize {
    (bits + 7) / 8
}
