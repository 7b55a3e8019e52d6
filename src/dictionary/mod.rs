//! Dictionary decoding.
//!
//! Jump tables in compiled contracts are stored as dictionaries: binary tries with
//! fixed-width keys whose leaves hold the value bits. The disassembler only needs the list
//! of (key, value) pairs a dictionary encodes, which is what the [`DictionaryDecoder`]
//! capability provides.
//!
//! # Key Components
//!
//! - [`DictionaryDecoder`] - The capability consumed by the disassembler
//! - [`DictEntry`] - One key and the cursor over its value
//! - [`HashmapDecoder`] - Parser for the standard `Hashmap n X` trie layout
//!
//! # Examples
//!
//! ```rust
//! use cellscope::{CellBuilder, BitCursor, dictionary::{DictionaryDecoder, HashmapDecoder}};
//!
//! // A single-entry dictionary with 8-bit keys: label hml_long "10", length 8, key 0x2A,
//! // followed by the value bits.
//! let mut builder = CellBuilder::new();
//! builder
//!     .store_uint(0b10, 2)?
//!     .store_uint(8, 4)?
//!     .store_uint(0x2A, 8)?
//!     .store_uint(0xDB30, 16)?;
//! let root = builder.build()?;
//!
//! let entries = HashmapDecoder.parse_dictionary(8, root.slice())?;
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].key.to_unsigned()?, 0x2A);
//! assert_eq!(entries[0].value.remaining_bits(), 16);
//! # Ok::<(), cellscope::Error>(())
//! ```

mod hashmap;

pub use hashmap::HashmapDecoder;

use crate::{cell::BitString, Result};

/// One entry of a decoded dictionary.
#[derive(Debug, Clone)]
pub struct DictEntry<C> {
    /// The full key, exactly as wide as the dictionary's key width
    pub key: BitString,
    /// A cursor over the value stored under `key`
    pub value: C,
}

/// The "parse dictionary" capability.
///
/// `C` is the cursor type: the dictionary root is handed in as a cursor and every value is
/// handed back as one, so the disassembler can continue decoding values as code.
pub trait DictionaryDecoder<C> {
    /// Parses the dictionary at `cursor`, whose keys are `key_bits` wide.
    ///
    /// Entries are returned in key order as the trie stores them, left branch first.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidDictionary`] if the trie cannot be partitioned into
    /// keys of exactly `key_bits` bits.
    fn parse_dictionary(&self, key_bits: usize, cursor: C) -> Result<Vec<DictEntry<C>>>;
}
