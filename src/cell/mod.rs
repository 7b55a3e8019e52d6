//! Cell tree model, cursors and bag-of-cells loading.
//!
//! Programs for the virtual machine are not flat byte streams: they are trees (more
//! precisely DAGs) of cells, where each cell carries up to 1023 data bits and up to four
//! references to other cells. Code continues across references, so a disassembler needs a
//! cursor that can read bits from one cell and hand out fresh cursors for referenced cells.
//!
//! # Key Components
//!
//! - [`Cell`] - Immutable node holding data bits and child references
//! - [`CellBuilder`] - Incremental construction of cells
//! - [`BitString`] - Owned bit sequence used for payloads and dictionary keys
//! - [`Slice`] - Monotonic read cursor over a window of one cell
//! - [`BitCursor`] - The minimal cursor capability the disassembler consumes
//! - [`Boc`] - Bag-of-cells container deserialization
//! - [`Parser`] - Bounds-checked byte reader backing the container parser
//!
//! # Examples
//!
//! ```rust
//! use cellscope::{CellBuilder, BitCursor};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0xDB30, 16)?;
//! let cell = builder.build()?;
//!
//! let mut slice = cell.slice();
//! assert_eq!(slice.remaining_bits(), 16);
//! assert_eq!(slice.load_uint(8)?, 0xDB);
//! assert!(!slice.is_exhausted());
//! # Ok::<(), cellscope::Error>(())
//! ```

mod bits;
mod boc;
mod builder;
mod parser;
mod slice;

use std::sync::Arc;

pub use bits::{bits_to_signed_integer, BitString};
pub use boc::{Boc, BocFlags};
pub use builder::CellBuilder;
pub use parser::Parser;
pub use slice::Slice;

use crate::Result;

/// Maximum number of data bits a single cell can hold.
pub const MAX_DATA_BITS: usize = 1023;

/// Maximum number of references a single cell can hold.
pub const MAX_REFERENCES: usize = 4;

/// The cursor capability the disassembler core relies on.
///
/// A cursor is a read position over the bits of one cell. It is consumed monotonically by
/// the instruction decoder and never rewound. Implementations are free to carry anything
/// else they need (reference windows, backing storage); the core only asks how much is left
/// and, for operands it does not expand, for a snapshot of the remaining bits.
pub trait BitCursor {
    /// Number of data bits not yet consumed.
    fn remaining_bits(&self) -> usize;

    /// Returns `true` once every data bit has been consumed.
    fn is_exhausted(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Copies the unconsumed bits without advancing.
    fn to_bit_string(&self) -> BitString;
}

/// A node of the cell tree.
///
/// Cells are immutable once built and shared through [`Arc`]. The exotic flag is carried
/// through from the container for display purposes; exotic payloads are otherwise treated
/// like ordinary data.
#[derive(Debug, PartialEq, Eq)]
pub struct Cell {
    data: BitString,
    references: Vec<Arc<Cell>>,
    exotic: bool,
}

impl Cell {
    /// Creates an ordinary cell.
    ///
    /// # Arguments
    /// * `data` - Payload bits, at most [`MAX_DATA_BITS`]
    /// * `references` - Child cells, at most [`MAX_REFERENCES`]
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if either limit is exceeded.
    pub fn new(data: BitString, references: Vec<Arc<Cell>>) -> Result<Arc<Cell>> {
        Cell::with_kind(data, references, false)
    }

    pub(crate) fn with_kind(
        data: BitString,
        references: Vec<Arc<Cell>>,
        exotic: bool,
    ) -> Result<Arc<Cell>> {
        if data.len() > MAX_DATA_BITS {
            return Err(malformed_error!(
                "Cell holds {} data bits, limit is {}",
                data.len(),
                MAX_DATA_BITS
            ));
        }
        if references.len() > MAX_REFERENCES {
            return Err(malformed_error!(
                "Cell holds {} references, limit is {}",
                references.len(),
                MAX_REFERENCES
            ));
        }

        Ok(Arc::new(Cell {
            data,
            references,
            exotic,
        }))
    }

    /// The payload bits.
    #[must_use]
    pub fn data(&self) -> &BitString {
        &self.data
    }

    /// Number of payload bits.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    /// All child references, in order.
    #[must_use]
    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    /// The child reference at `index`.
    #[must_use]
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.references.get(index)
    }

    /// Whether the container marked this cell as exotic.
    #[must_use]
    pub fn is_exotic(&self) -> bool {
        self.exotic
    }

    /// Opens a cursor over the whole cell.
    #[must_use]
    pub fn slice(self: &Arc<Self>) -> Slice {
        Slice::new(Arc::clone(self))
    }
}
