//! Monotonic read cursor over a cell.

use std::sync::Arc;

use crate::{
    cell::{BitCursor, BitString, Cell},
    Result,
};

/// A read cursor over a window of one cell's bits and references.
///
/// A fresh slice covers the whole cell. Reading advances the window start and never moves
/// it back. [`Slice::split`] detaches a sub-window (for example the body of an inline
/// continuation) as an independent cursor and advances past it.
///
/// Cloning a slice is cheap: the cell itself is shared.
#[derive(Clone, Debug)]
pub struct Slice {
    cell: Arc<Cell>,
    bit_pos: usize,
    bit_end: usize,
    ref_pos: usize,
    ref_end: usize,
}

impl Slice {
    /// Opens a cursor over the whole of `cell`.
    #[must_use]
    pub fn new(cell: Arc<Cell>) -> Self {
        let bit_end = cell.bit_len();
        let ref_end = cell.references().len();
        Slice {
            cell,
            bit_pos: 0,
            bit_end,
            ref_pos: 0,
            ref_end,
        }
    }

    /// The underlying cell.
    #[must_use]
    pub fn cell(&self) -> &Arc<Cell> {
        &self.cell
    }

    /// Number of data bits left in the window.
    #[must_use]
    pub fn remaining_bits(&self) -> usize {
        self.bit_end - self.bit_pos
    }

    /// Number of references left in the window.
    #[must_use]
    pub fn remaining_refs(&self) -> usize {
        self.ref_end - self.ref_pos
    }

    fn ensure_bits(&self, bits: usize) -> Result<()> {
        if bits > self.remaining_bits() {
            return Err(out_of_bounds_error!());
        }
        Ok(())
    }

    /// Reads `bits` bits as an unsigned integer without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for widths above 64 and
    /// [`crate::Error::OutOfBounds`] if the window is too short.
    pub fn peek_uint(&self, bits: usize) -> Result<u64> {
        if bits > 64 {
            return Err(malformed_error!("Cannot read {} bits into a u64", bits));
        }
        self.ensure_bits(bits)?;
        Ok(self.cell.data().read_uint(self.bit_pos, bits))
    }

    /// Reads `bits` bits as an unsigned integer.
    ///
    /// # Errors
    /// See [`Slice::peek_uint`].
    pub fn load_uint(&mut self, bits: usize) -> Result<u64> {
        let value = self.peek_uint(bits)?;
        self.bit_pos += bits;
        Ok(value)
    }

    /// Reads `bits` bits as a two's complement signed integer.
    ///
    /// # Errors
    /// See [`Slice::peek_uint`].
    pub fn load_int(&mut self, bits: usize) -> Result<i64> {
        let raw = self.load_uint(bits)?;
        if bits == 0 {
            return Ok(0);
        }
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Reads a single bit.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no bits are left.
    pub fn load_bit(&mut self) -> Result<bool> {
        Ok(self.load_uint(1)? == 1)
    }

    /// Copies the next `bits` bits and advances past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window is too short.
    pub fn load_bits(&mut self, bits: usize) -> Result<BitString> {
        self.ensure_bits(bits)?;
        let result = self
            .cell
            .data()
            .copy_range(self.bit_pos, self.bit_pos + bits);
        self.bit_pos += bits;
        Ok(result)
    }

    /// Advances past `bits` bits.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window is too short.
    pub fn skip_bits(&mut self, bits: usize) -> Result<()> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    /// Takes the next reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no references are left.
    pub fn load_ref(&mut self) -> Result<Arc<Cell>> {
        if self.ref_pos >= self.ref_end {
            return Err(out_of_bounds_error!());
        }
        let cell = self
            .cell
            .reference(self.ref_pos)
            .cloned()
            .ok_or(out_of_bounds_error!())?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Detaches the next `bits` bits and `refs` references as an independent cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if either window is too short.
    pub fn split(&mut self, bits: usize, refs: usize) -> Result<Slice> {
        self.ensure_bits(bits)?;
        if refs > self.remaining_refs() {
            return Err(out_of_bounds_error!());
        }

        let sub = Slice {
            cell: Arc::clone(&self.cell),
            bit_pos: self.bit_pos,
            bit_end: self.bit_pos + bits,
            ref_pos: self.ref_pos,
            ref_end: self.ref_pos + refs,
        };
        self.bit_pos += bits;
        self.ref_pos += refs;
        Ok(sub)
    }
}

impl BitCursor for Slice {
    fn remaining_bits(&self) -> usize {
        Slice::remaining_bits(self)
    }

    fn to_bit_string(&self) -> BitString {
        self.cell.data().copy_range(self.bit_pos, self.bit_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellBuilder;

    fn sample() -> Arc<Cell> {
        let leaf = CellBuilder::new().build().unwrap();
        let mut builder = CellBuilder::new();
        builder
            .store_uint(0xF0, 8)
            .unwrap()
            .store_uint(0b101, 3)
            .unwrap()
            .store_ref(leaf.clone())
            .unwrap()
            .store_ref(leaf)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_sequential_reads() {
        let mut slice = sample().slice();
        assert_eq!(slice.remaining_bits(), 11);
        assert_eq!(slice.peek_uint(4).unwrap(), 0xF);
        assert_eq!(slice.load_uint(4).unwrap(), 0xF);
        assert_eq!(slice.load_int(4).unwrap(), 0);
        assert!(slice.load_bit().unwrap());
        assert_eq!(slice.load_int(2).unwrap(), 1);
        assert!(BitCursor::is_exhausted(&slice));
        assert!(slice.load_bit().is_err());
    }

    #[test]
    fn test_signed_reads() {
        let mut builder = CellBuilder::new();
        builder.store_int(-3, 8).unwrap();
        let mut slice = builder.build().unwrap().slice();
        assert_eq!(slice.load_int(8).unwrap(), -3);
    }

    #[test]
    fn test_references() {
        let mut slice = sample().slice();
        assert_eq!(slice.remaining_refs(), 2);
        slice.load_ref().unwrap();
        slice.load_ref().unwrap();
        assert!(slice.load_ref().is_err());
    }

    #[test]
    fn test_split() {
        let mut slice = sample().slice();
        let mut sub = slice.split(8, 1).unwrap();
        assert_eq!(sub.remaining_bits(), 8);
        assert_eq!(sub.remaining_refs(), 1);
        assert_eq!(slice.remaining_bits(), 3);
        assert_eq!(slice.remaining_refs(), 1);

        assert_eq!(sub.load_uint(8).unwrap(), 0xF0);
        assert!(sub.load_bit().is_err());
        sub.load_ref().unwrap();
        assert!(sub.load_ref().is_err());

        assert!(slice.split(4, 0).is_err());
        assert!(slice.split(0, 2).is_err());
    }

    #[test]
    fn test_snapshot_does_not_advance() {
        let mut slice = sample().slice();
        slice.skip_bits(8).unwrap();
        let snapshot = slice.to_bit_string();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.to_unsigned().unwrap(), 0b101);
        assert_eq!(slice.remaining_bits(), 3);
    }

    #[test]
    fn test_oversized_peek() {
        let slice = sample().slice();
        assert!(slice.peek_uint(65).is_err());
        assert!(slice.peek_uint(12).is_err());
    }
}
