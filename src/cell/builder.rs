use std::sync::Arc;

use crate::{
    cell::{BitString, Cell, MAX_DATA_BITS, MAX_REFERENCES},
    Result,
};

/// Incremental builder for [`Cell`]s.
///
/// Every store operation checks the cell limits up front, so a builder that accepted all
/// its writes always builds successfully.
///
/// # Examples
///
/// ```rust
/// use cellscope::CellBuilder;
///
/// let body = {
///     let mut b = CellBuilder::new();
///     b.store_uint(0x00, 8)?; // NOP
///     b.build()?
/// };
///
/// let mut b = CellBuilder::new();
/// b.store_uint(0x8A, 8)?.store_ref(body)?; // PUSHREFCONT
/// let root = b.build()?;
/// assert_eq!(root.references().len(), 1);
/// # Ok::<(), cellscope::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct CellBuilder {
    data: BitString,
    references: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        CellBuilder::default()
    }

    fn ensure_room(&self, bits: usize) -> Result<()> {
        if self.data.len() + bits > MAX_DATA_BITS {
            return Err(malformed_error!(
                "Storing {} bits would exceed the cell limit of {}",
                bits,
                MAX_DATA_BITS
            ));
        }
        Ok(())
    }

    /// Appends one bit.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the cell is full.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self> {
        self.ensure_room(1)?;
        self.data.push(bit);
        Ok(self)
    }

    /// Appends `value` as an unsigned integer of `bits` bits.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the value does not fit or the cell is full.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self> {
        if bits < 64 && value >> bits != 0 {
            return Err(malformed_error!("{} does not fit into {} bits", value, bits));
        }
        self.ensure_room(bits)?;
        self.data.push_uint(value, bits);
        Ok(self)
    }

    /// Appends `value` as a two's complement integer of `bits` bits.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the value does not fit or the cell is full.
    pub fn store_int(&mut self, value: i64, bits: usize) -> Result<&mut Self> {
        if bits == 0 || bits > 64 {
            return Err(malformed_error!("Unsupported signed width {}", bits));
        }
        if bits < 64 {
            let limit = 1i64 << (bits - 1);
            if value < -limit || value >= limit {
                return Err(malformed_error!("{} does not fit into {} bits", value, bits));
            }
        }
        self.ensure_room(bits)?;
        self.data.push_uint(value as u64, bits);
        Ok(self)
    }

    /// Appends all bits of `bits`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the cell would overflow.
    pub fn store_bits(&mut self, bits: &BitString) -> Result<&mut Self> {
        self.ensure_room(bits.len())?;
        self.data.extend_from(bits);
        Ok(self)
    }

    /// Appends a reference to `cell`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the cell already holds four references.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self> {
        if self.references.len() >= MAX_REFERENCES {
            return Err(malformed_error!(
                "Cell already holds {} references",
                MAX_REFERENCES
            ));
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Bits stored so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    /// References stored so far.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.references.len()
    }

    /// Finishes the cell.
    ///
    /// # Errors
    /// Never fails for a builder whose stores all succeeded.
    pub fn build(&self) -> Result<Arc<Cell>> {
        Cell::new(self.data.clone(), self.references.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_limits() {
        let mut builder = CellBuilder::new();
        assert!(builder.store_uint(256, 8).is_err());
        assert!(builder.store_int(128, 8).is_err());
        assert!(builder.store_int(-129, 8).is_err());
        builder.store_int(-128, 8).unwrap();
        builder.store_uint(u64::MAX, 64).unwrap();
        assert_eq!(builder.bit_len(), 72);

        let mut full = CellBuilder::new();
        full.store_uint(0, 64).unwrap();
        for _ in 0..14 {
            full.store_uint(0, 68).unwrap();
        }
        assert_eq!(full.bit_len(), 1016);
        assert!(full.store_uint(0, 8).is_err());
        full.store_uint(0, 7).unwrap();
        assert!(full.store_bit(true).is_err());
    }

    #[test]
    fn test_reference_limit() {
        let leaf = CellBuilder::new().build().unwrap();
        let mut builder = CellBuilder::new();
        for _ in 0..MAX_REFERENCES {
            builder.store_ref(leaf.clone()).unwrap();
        }
        assert!(builder.store_ref(leaf).is_err());
        assert_eq!(builder.build().unwrap().references().len(), MAX_REFERENCES);
    }
}
