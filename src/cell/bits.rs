//! Bit-addressed buffers.
//!
//! [`BitString`] is the owned bit sequence used for cell payloads, slice constants and
//! dictionary keys. Bits are stored most-significant first inside each byte, and bits past
//! the logical length are always zero so that equality and hashing only observe the
//! logical content.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::Result;

/// An owned sequence of bits.
///
/// # Examples
///
/// ```rust
/// use cellscope::BitString;
///
/// let mut bits = BitString::new();
/// bits.push_uint(0b101, 3);
/// assert_eq!(bits.len(), 3);
/// assert_eq!(bits.to_string(), "x{B_}");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    data: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Creates an empty bit string.
    #[must_use]
    pub fn new() -> Self {
        BitString::default()
    }

    /// Creates an empty bit string with room for `bits` bits.
    #[must_use]
    pub fn with_capacity(bits: usize) -> Self {
        BitString {
            data: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Creates a bit string from the first `bit_len` bits of `bytes`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `bytes` holds fewer than `bit_len` bits.
    pub fn from_bytes(bytes: &[u8], bit_len: usize) -> Result<Self> {
        if bit_len > bytes.len() * 8 {
            return Err(out_of_bounds_error!());
        }

        let mut data = bytes[..bit_len.div_ceil(8)].to_vec();
        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFF << (8 - tail);
            }
        }

        Ok(BitString { data, len: bit_len })
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bit string holds no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Appends a single bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let index = self.len;
            self.data[index / 8] |= 0x80 >> (index % 8);
        }
        self.len += 1;
    }

    /// Appends the lowest `bits` bits of `value`, most significant first.
    ///
    /// Widths above 64 are padded with leading zero bits.
    pub fn push_uint(&mut self, value: u64, bits: usize) {
        for i in (0..bits).rev() {
            self.push(i < 64 && (value >> i) & 1 == 1);
        }
    }

    /// Appends all bits of `other`.
    pub fn extend_from(&mut self, other: &BitString) {
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Iterates over the bits, first to last.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.data[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// Copies the bits in `start..end` into a new bit string.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range is inverted or exceeds the length.
    pub fn range(&self, start: usize, end: usize) -> Result<BitString> {
        if start > end || end > self.len {
            return Err(out_of_bounds_error!());
        }
        Ok(self.copy_range(start, end))
    }

    /// Range copy for callers that already validated their window.
    pub(crate) fn copy_range(&self, start: usize, end: usize) -> BitString {
        let end = end.min(self.len);
        let mut result = BitString::with_capacity(end.saturating_sub(start));
        for i in start..end {
            result.push(self.data[i / 8] & (0x80 >> (i % 8)) != 0);
        }
        result
    }

    /// Reads `bits` bits starting at `start` as an unsigned big-endian integer.
    pub(crate) fn read_uint(&self, start: usize, bits: usize) -> u64 {
        let mut value = 0u64;
        for i in start..start + bits {
            let bit = self.data[i / 8] & (0x80 >> (i % 8)) != 0;
            value = (value << 1) | u64::from(bit);
        }
        value
    }

    /// Returns a copy with the completion tag removed.
    ///
    /// The completion tag is a single `1` bit followed by zero or more `0` bits at the very
    /// end. A string consisting only of zero bits has no tag and becomes empty.
    #[must_use]
    pub fn without_completion_tag(&self) -> BitString {
        match (0..self.len).rev().find(|&i| self.get(i) == Some(true)) {
            Some(marker) => self.copy_range(0, marker),
            None => BitString::new(),
        }
    }

    /// Interprets the bits as an unsigned big-endian integer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bit string is wider than 64 bits.
    pub fn to_unsigned(&self) -> Result<u64> {
        if self.len > 64 {
            return Err(malformed_error!(
                "{} bits do not fit into a 64-bit integer",
                self.len
            ));
        }
        Ok(self.read_uint(0, self.len))
    }

    /// Interprets the bits as a two's complement signed integer.
    ///
    /// An empty bit string yields `0`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the bit string is wider than 64 bits.
    pub fn to_signed(&self) -> Result<i64> {
        let raw = self.to_unsigned()?;
        if self.len == 0 {
            return Ok(0);
        }
        let shift = 64 - self.len;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// The backing bytes, with unused trailing bits cleared.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Converts a fixed-width key into a signed integer identifier.
///
/// This is the conversion used for dictionary keys that name methods: the key is read as
/// a two's complement number of exactly its own width.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for keys wider than 64 bits.
///
/// # Examples
///
/// ```rust
/// use cellscope::{bits_to_signed_integer, BitString};
///
/// let mut key = BitString::new();
/// key.push_uint(0b111_1101, 7);
/// assert_eq!(bits_to_signed_integer(&key)?, -3);
/// # Ok::<(), cellscope::Error>(())
/// ```
pub fn bits_to_signed_integer(bits: &BitString) -> Result<i64> {
    bits.to_signed()
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut padded = self.clone();
        let tagged = padded.len % 4 != 0;
        if tagged {
            padded.push(true);
            while padded.len % 4 != 0 {
                padded.push(false);
            }
        }

        f.write_str("x{")?;
        for nibble in 0..padded.len / 4 {
            let byte = padded.data[nibble / 2];
            let value = if nibble % 2 == 0 { byte >> 4 } else { byte & 0x0F };
            write!(f, "{value:X}")?;
        }
        if tagged {
            f.write_str("_")?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({self})")
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(value: u64, width: usize) -> BitString {
        let mut result = BitString::new();
        result.push_uint(value, width);
        result
    }

    #[test]
    fn test_push_and_get() {
        let b = bits(0b1011, 4);
        assert_eq!(b.len(), 4);
        assert_eq!(b.get(0), Some(true));
        assert_eq!(b.get(1), Some(false));
        assert_eq!(b.get(3), Some(true));
        assert_eq!(b.get(4), None);
    }

    #[test]
    fn test_from_bytes_masks_tail() {
        let b = BitString::from_bytes(&[0xFF, 0xFF], 12).unwrap();
        assert_eq!(b.as_bytes(), &[0xFF, 0xF0]);
        assert_eq!(b, bits(0xFFF, 12));
        assert!(BitString::from_bytes(&[0xFF], 9).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BitString::new().to_string(), "x{}");
        assert_eq!(bits(0xA5, 8).to_string(), "x{A5}");
        assert_eq!(bits(0b101, 3).to_string(), "x{B_}");
        assert_eq!(bits(0b1, 1).to_string(), "x{C_}");
        assert_eq!(bits(0x1, 5).to_string(), "x{0C_}");
    }

    #[test]
    fn test_completion_tag() {
        assert_eq!(bits(0b1011_1000, 8).without_completion_tag(), bits(0b1011, 4));
        assert_eq!(bits(0b1000, 4).without_completion_tag(), BitString::new());
        assert_eq!(bits(0, 6).without_completion_tag(), BitString::new());
    }

    #[test]
    fn test_signed_conversion() {
        assert_eq!(bits(5, 19).to_signed().unwrap(), 5);
        assert_eq!(bits(0x7FFFD, 19).to_signed().unwrap(), -3);
        assert_eq!(bits(u64::MAX, 64).to_signed().unwrap(), -1);
        assert_eq!(bits(1 << 62, 63).to_signed().unwrap(), -(1 << 62));
        assert_eq!(BitString::new().to_signed().unwrap(), 0);

        let mut wide = bits(0, 64);
        wide.push(true);
        assert!(bits_to_signed_integer(&wide).is_err());
    }

    #[test]
    fn test_range() {
        let b = bits(0b1100_1010, 8);
        assert_eq!(b.range(2, 6).unwrap(), bits(0b0010, 4));
        assert!(b.range(6, 2).is_err());
        assert!(b.range(0, 9).is_err());
    }
}
