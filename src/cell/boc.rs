//! Bag-of-cells container deserialization.
//!
//! Compiled contracts are shipped as a serialized bag of cells: a header, a list of root
//! indices and a flat table of cell records whose references are indices into the same
//! table. This module turns such a container into a tree of [`Cell`]s.
//!
//! # Supported Layouts
//!
//! - `b5ee9c72` - generic layout with optional index, CRC32-C trailer and root list
//! - `68ff65f3` - legacy indexed layout, single root
//! - `acc3a728` - legacy indexed layout with CRC32-C trailer, single root
//!
//! Every cell reference must point to a strictly later record. This ordering is how the
//! format guarantees an acyclic graph, and the loader rejects anything else, which lets
//! the disassembler recurse through references without cycle detection.

use std::{fs, path::Path, sync::Arc};

use bitflags::bitflags;
use memmap2::Mmap;

use crate::{
    cell::{parser::Parser, BitString, Cell, MAX_REFERENCES},
    Error::{Empty, NotSupported},
    Result,
};

const MAGIC_GENERIC: u32 = 0xB5EE_9C72;
const MAGIC_INDEXED: u32 = 0x68FF_65F3;
const MAGIC_INDEXED_CRC32C: u32 = 0xACC3_A728;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Header flags of the generic bag-of-cells layout
    pub struct BocFlags: u8 {
        /// An offset index follows the root list
        const HAS_INDEX = 0x80;
        /// A CRC32-C checksum of everything before it closes the container
        const HAS_CRC32C = 0x40;
        /// Index entries carry a cache bit
        const HAS_CACHE_BITS = 0x20;
    }
}

/// Raw cell record before references are resolved.
struct CellRecord {
    data: BitString,
    references: Vec<usize>,
    exotic: bool,
}

/// A deserialized bag of cells.
///
/// # Examples
///
/// ```rust
/// use cellscope::Boc;
///
/// // One root cell holding the bytes 0x00 0x71
/// let bytes = [
///     0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00, 0x04, 0x00, 0x71,
/// ];
/// let boc = Boc::from_slice(&bytes)?;
/// assert_eq!(boc.cell_count(), 1);
/// assert_eq!(boc.root().unwrap().bit_len(), 16);
/// # Ok::<(), cellscope::Error>(())
/// ```
#[derive(Debug)]
pub struct Boc {
    roots: Vec<Arc<Cell>>,
    cell_count: usize,
}

impl Boc {
    /// Load a bag of cells from a file on disk, memory mapping it.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped,
    /// [`crate::Error::Empty`] for a zero-length file, and any parse error of
    /// [`Boc::from_slice`].
    pub fn from_file(path: &Path) -> Result<Boc> {
        let file = fs::File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(Empty);
        }

        let mmap = unsafe { Mmap::map(&file) }?;
        Boc::from_slice(&mmap)
    }

    /// Load a bag of cells from an owned buffer.
    ///
    /// # Errors
    /// See [`Boc::from_slice`].
    pub fn from_mem(data: Vec<u8>) -> Result<Boc> {
        Boc::from_slice(&data)
    }

    /// Load a bag of cells from a byte slice.
    ///
    /// # Errors
    /// - [`crate::Error::Empty`] for empty input
    /// - [`crate::Error::NotSupported`] for an unknown magic
    /// - [`crate::Error::Malformed`] for inconsistent headers, forward-violating references,
    ///   bad completion tags or checksum mismatches
    /// - [`crate::Error::OutOfBounds`] for truncated input
    pub fn from_slice(data: &[u8]) -> Result<Boc> {
        if data.is_empty() {
            return Err(Empty);
        }

        let mut parser = Parser::new(data);
        let magic = parser.read_be_u32()?;

        let (flags, size) = match magic {
            MAGIC_GENERIC => {
                let byte = parser.read_u8()?;
                if byte & 0x18 != 0 {
                    return Err(malformed_error!("Reserved header flags set: {:#04x}", byte));
                }
                (BocFlags::from_bits_truncate(byte), usize::from(byte & 0x07))
            }
            MAGIC_INDEXED => (BocFlags::HAS_INDEX, usize::from(parser.read_u8()?)),
            MAGIC_INDEXED_CRC32C => (
                BocFlags::HAS_INDEX | BocFlags::HAS_CRC32C,
                usize::from(parser.read_u8()?),
            ),
            _ => return Err(NotSupported),
        };

        if size == 0 || size > 4 {
            return Err(malformed_error!("Invalid reference size {}", size));
        }

        let offset_size = usize::from(parser.read_u8()?);
        if offset_size == 0 || offset_size > 8 {
            return Err(malformed_error!("Invalid offset size {}", offset_size));
        }

        let cell_count = read_count(&mut parser, size)?;
        let root_count = read_count(&mut parser, size)?;
        let _absent = read_count(&mut parser, size)?;
        let total_size = read_count(&mut parser, offset_size)?;

        if root_count == 0 {
            return Err(malformed_error!("Container declares no roots"));
        }
        if root_count > cell_count {
            return Err(malformed_error!(
                "Container declares {} roots but only {} cells",
                root_count,
                cell_count
            ));
        }

        let root_indices = if magic == MAGIC_GENERIC {
            let mut indices = Vec::with_capacity(root_count);
            for _ in 0..root_count {
                let index = read_count(&mut parser, size)?;
                if index >= cell_count {
                    return Err(malformed_error!("Root index {} out of range", index));
                }
                indices.push(index);
            }
            indices
        } else {
            if root_count != 1 {
                return Err(malformed_error!(
                    "Indexed layout requires exactly one root, found {}",
                    root_count
                ));
            }
            vec![0]
        };

        if flags.contains(BocFlags::HAS_INDEX) {
            let index_len = cell_count
                .checked_mul(offset_size)
                .ok_or_else(|| malformed_error!("Index size overflows"))?;
            parser.advance_by(index_len)?;
        }

        let cell_data = parser.read_bytes(total_size)?;
        let mut records = Vec::with_capacity(cell_count.min(cell_data.len()));
        let mut cells_parser = Parser::new(cell_data);
        for index in 0..cell_count {
            records.push(read_cell(&mut cells_parser, index, cell_count, size)?);
        }
        if cells_parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after cell data",
                cell_data.len() - cells_parser.pos()
            ));
        }

        if flags.contains(BocFlags::HAS_CRC32C) {
            let checked = &data[..parser.pos()];
            let expected = parser.read_le_u32()?;
            let actual = crc32c::crc32c(checked);
            if expected != actual {
                return Err(malformed_error!(
                    "CRC32-C mismatch: stored {:#010x}, computed {:#010x}",
                    expected,
                    actual
                ));
            }
        }

        let cells = resolve(records)?;
        let roots = root_indices
            .into_iter()
            .map(|index| Arc::clone(&cells[index]))
            .collect();

        Ok(Boc { roots, cell_count })
    }

    /// All root cells, in container order.
    #[must_use]
    pub fn roots(&self) -> &[Arc<Cell>] {
        &self.roots
    }

    /// The first root cell.
    #[must_use]
    pub fn root(&self) -> Option<&Arc<Cell>> {
        self.roots.first()
    }

    /// Number of cell records in the container.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }
}

fn read_count(parser: &mut Parser<'_>, size: usize) -> Result<usize> {
    let value = parser.read_be_uint(size)?;
    usize::try_from(value).map_err(|_| malformed_error!("Count {} does not fit", value))
}

fn read_cell(
    parser: &mut Parser<'_>,
    index: usize,
    cell_count: usize,
    size: usize,
) -> Result<CellRecord> {
    let d1 = parser.read_u8()?;
    let d2 = parser.read_u8()?;

    let ref_count = usize::from(d1 & 0x07);
    let exotic = d1 & 0x08 != 0;
    let with_hashes = d1 & 0x10 != 0;
    let level_mask = d1 >> 5;

    if ref_count > MAX_REFERENCES {
        return Err(malformed_error!(
            "Cell {} declares {} references",
            index,
            ref_count
        ));
    }

    if with_hashes {
        let hash_count = level_mask.count_ones() as usize + 1;
        parser.advance_by(hash_count * (32 + 2))?;
    }

    let byte_len = usize::from(d2).div_ceil(2);
    let bytes = parser.read_bytes(byte_len)?;
    let bit_len = if d2 % 2 == 0 {
        byte_len * 8
    } else {
        match bytes.last() {
            Some(&last) if last != 0 => byte_len * 8 - last.trailing_zeros() as usize - 1,
            _ => {
                return Err(malformed_error!(
                    "Cell {} has a padded payload without completion tag",
                    index
                ))
            }
        }
    };
    let data = BitString::from_bytes(bytes, bit_len)?;

    let mut references = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let target = read_count(parser, size)?;
        if target <= index || target >= cell_count {
            return Err(malformed_error!(
                "Cell {} references cell {} out of topological order",
                index,
                target
            ));
        }
        references.push(target);
    }

    Ok(CellRecord {
        data,
        references,
        exotic,
    })
}

/// Builds cells back to front so every reference is already materialized.
fn resolve(records: Vec<CellRecord>) -> Result<Vec<Arc<Cell>>> {
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; records.len()];

    for (index, record) in records.into_iter().enumerate().rev() {
        let mut references = Vec::with_capacity(record.references.len());
        for target in record.references {
            let child = built[target]
                .clone()
                .ok_or_else(|| malformed_error!("Cell {} is not yet built", target))?;
            references.push(child);
        }
        built[index] = Some(Cell::with_kind(record.data, references, record.exotic)?);
    }

    built
        .into_iter()
        .map(|cell| cell.ok_or_else(|| malformed_error!("Unresolved cell")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const SINGLE: [u8; 15] = [
        0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00, 0x04, 0x00, 0x71,
    ];

    // root: 0x8A + ref -> cell 1 (0x00)
    const TWO_CELLS: [u8; 18] = [
        0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x02, 0x01, 0x00, 0x07, 0x00, 0x01, 0x02, 0x8A, 0x01,
        0x00, 0x02, 0x00,
    ];

    #[test]
    fn test_crc32c_check_value() {
        assert_eq!(crc32c::crc32c(b"123456789"), 0xE306_9283);
    }

    #[test]
    fn test_single_cell() {
        let boc = Boc::from_slice(&SINGLE).unwrap();
        assert_eq!(boc.cell_count(), 1);
        assert_eq!(boc.roots().len(), 1);

        let root = boc.root().unwrap();
        assert_eq!(root.bit_len(), 16);
        assert_eq!(root.data().to_unsigned().unwrap(), 0x0071);
    }

    #[test]
    fn test_references_resolved() {
        let boc = Boc::from_mem(TWO_CELLS.to_vec()).unwrap();
        let root = boc.root().unwrap();
        assert_eq!(root.bit_len(), 8);
        assert_eq!(root.references().len(), 1);
        assert_eq!(root.reference(0).unwrap().bit_len(), 8);
    }

    #[test]
    fn test_completion_tag_payload() {
        // d2 = 1: 0xAC = 1010 1100, tag stripped -> 10101
        let bytes = [
            0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x03, 0x00, 0x00, 0x01, 0xAC,
        ];
        let boc = Boc::from_slice(&bytes).unwrap();
        let root = boc.root().unwrap();
        assert_eq!(root.bit_len(), 5);
        assert_eq!(root.data().to_unsigned().unwrap(), 0b10101);
    }

    #[test]
    fn test_crc_trailer() {
        let mut bytes = SINGLE.to_vec();
        bytes[4] |= 0x40;
        let crc = crc32c::crc32c(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        assert!(Boc::from_slice(&bytes).is_ok());

        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            Boc::from_slice(&bytes),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_backward_reference_rejected() {
        let mut bytes = TWO_CELLS.to_vec();
        // root references itself
        bytes[14] = 0x00;
        assert!(matches!(
            Boc::from_slice(&bytes),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(Boc::from_slice(&[]), Err(Error::Empty)));
        assert!(matches!(
            Boc::from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]),
            Err(Error::NotSupported)
        ));
        assert!(matches!(
            Boc::from_slice(&SINGLE[..12]),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.boc");
        std::fs::write(&path, SINGLE).unwrap();
        let boc = Boc::from_file(&path).unwrap();
        assert_eq!(boc.cell_count(), 1);

        let empty = dir.path().join("empty.boc");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(Boc::from_file(&empty), Err(Error::Empty)));
    }
}
