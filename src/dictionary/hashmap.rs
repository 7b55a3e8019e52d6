//! Parser for the `Hashmap n X` trie.
//!
//! Every node starts with a label holding the next run of key bits, in one of three
//! encodings:
//!
//! - `hml_short$0`: unary length, then the bits
//! - `hml_long$10`: binary length in `ceil(log2(m + 1))` bits, then the bits
//! - `hml_same$11`: one repeated bit value, then the binary length
//!
//! where `m` is the number of key bits still undetermined at that node. Once the label
//! exhausts the key, the rest of the node is the value. Otherwise the node is a fork with
//! two references, the left one extending the key with `0`.

use log::debug;

use crate::{
    cell::{BitString, Slice, MAX_DATA_BITS},
    dictionary::{DictEntry, DictionaryDecoder},
    Error, Result,
};

/// Decoder for dictionaries stored in the standard trie layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashmapDecoder;

impl DictionaryDecoder<Slice> for HashmapDecoder {
    fn parse_dictionary(&self, key_bits: usize, cursor: Slice) -> Result<Vec<DictEntry<Slice>>> {
        if key_bits > MAX_DATA_BITS {
            return Err(Error::InvalidDictionary(format!(
                "key width of {} bits exceeds {}",
                key_bits, MAX_DATA_BITS
            )));
        }

        let mut entries = Vec::new();
        walk(cursor, key_bits, BitString::with_capacity(key_bits), &mut entries).map_err(
            |error| match error {
                Error::OutOfBounds { .. } => {
                    Error::InvalidDictionary("truncated dictionary node".to_string())
                }
                other => other,
            },
        )?;

        debug!(
            "Parsed dictionary with {} entries ({}-bit keys)",
            entries.len(),
            key_bits
        );
        Ok(entries)
    }
}

fn walk(
    mut node: Slice,
    remaining: usize,
    prefix: BitString,
    entries: &mut Vec<DictEntry<Slice>>,
) -> Result<()> {
    let label = read_label(&mut node, remaining)?;
    let remaining = remaining - label.len();

    let mut key = prefix;
    key.extend_from(&label);

    if remaining == 0 {
        entries.push(DictEntry { key, value: node });
        return Ok(());
    }

    if node.remaining_refs() < 2 {
        return Err(Error::InvalidDictionary(format!(
            "fork at {} remaining key bits has {} branches",
            remaining,
            node.remaining_refs()
        )));
    }

    for bit in [false, true] {
        let branch = node.load_ref()?;
        let mut branch_key = key.clone();
        branch_key.push(bit);
        walk(branch.slice(), remaining - 1, branch_key, entries)?;
    }

    Ok(())
}

/// Bits needed to store a label length of at most `max`.
fn length_width(max: usize) -> usize {
    (usize::BITS - max.leading_zeros()) as usize
}

fn read_label(node: &mut Slice, max: usize) -> Result<BitString> {
    if !node.load_bit()? {
        let mut length = 0;
        while node.load_bit()? {
            length += 1;
            if length > max {
                return Err(label_too_long(length, max));
            }
        }
        return node.load_bits(length);
    }

    let same = node.load_bit()?;
    let repeated = if same { Some(node.load_bit()?) } else { None };

    let length = node.load_uint(length_width(max))? as usize;
    if length > max {
        return Err(label_too_long(length, max));
    }

    match repeated {
        Some(bit) => {
            let mut label = BitString::with_capacity(length);
            for _ in 0..length {
                label.push(bit);
            }
            Ok(label)
        }
        None => node.load_bits(length),
    }
}

fn label_too_long(length: usize, max: usize) -> Error {
    Error::InvalidDictionary(format!(
        "label of {} bits exceeds the {} remaining key bits",
        length, max
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cell::{BitCursor, CellBuilder},
        test::{code_cell, dictionary_cell},
    };

    fn keys(entries: &[DictEntry<Slice>]) -> Vec<i64> {
        entries
            .iter()
            .map(|entry| entry.key.to_signed().unwrap())
            .collect()
    }

    #[test]
    fn parse_short_label_leaf() {
        // hml_short: 0, unary 4 as 11110, key 1010, value 0xFF
        let mut builder = CellBuilder::new();
        builder
            .store_uint(0b0_11110, 6)
            .unwrap()
            .store_uint(0b1010, 4)
            .unwrap()
            .store_uint(0xFF, 8)
            .unwrap();
        let root = builder.build().unwrap();

        let entries = HashmapDecoder.parse_dictionary(4, root.slice()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.to_unsigned().unwrap(), 0b1010);
        assert_eq!(entries[0].value.remaining_bits(), 8);
    }

    #[test]
    fn parse_same_label_leaf() {
        // hml_same: 11, bit 1, length 5 in 3 bits
        let mut builder = CellBuilder::new();
        builder
            .store_uint(0b11_1, 3)
            .unwrap()
            .store_uint(5, 3)
            .unwrap()
            .store_uint(0xA, 4)
            .unwrap();
        let root = builder.build().unwrap();

        let entries = HashmapDecoder.parse_dictionary(5, root.slice()).unwrap();
        assert_eq!(keys(&entries), [-1]);
        assert_eq!(entries[0].value.to_bit_string().to_unsigned().unwrap(), 0xA);
    }

    #[test]
    fn parse_fork_orders_left_first() {
        let body = code_cell(&[0x00], &[]);
        let root = dictionary_cell(8, &[(-3, body.clone()), (5, body.clone()), (0, body)]);

        let entries = HashmapDecoder.parse_dictionary(8, root.slice()).unwrap();
        assert_eq!(keys(&entries), [0, 5, -3]);
        for entry in &entries {
            assert_eq!(entry.key.len(), 8);
            assert_eq!(entry.value.remaining_bits(), 8);
        }
    }

    #[test]
    fn parse_keeps_value_references() {
        let target = code_cell(&[0xDB, 0x30], &[]);
        let body = code_cell(&[0x8A], &[target]);
        let root = dictionary_cell(19, &[(7, body)]);

        let entries = HashmapDecoder.parse_dictionary(19, root.slice()).unwrap();
        assert_eq!(keys(&entries), [7]);
        assert_eq!(entries[0].value.remaining_refs(), 1);
    }

    #[test]
    fn parse_rejects_long_label() {
        // hml_long announcing 9 bits for a 4-bit key
        let mut builder = CellBuilder::new();
        builder
            .store_uint(0b10, 2)
            .unwrap()
            .store_uint(7, 3)
            .unwrap()
            .store_uint(0, 7)
            .unwrap();
        let root = builder.build().unwrap();

        let result = HashmapDecoder.parse_dictionary(4, root.slice());
        assert!(matches!(result, Err(Error::InvalidDictionary(_))));
    }

    #[test]
    fn parse_rejects_fork_without_branches() {
        // empty label at an 8-bit key, no references
        let mut builder = CellBuilder::new();
        builder.store_uint(0b00, 2).unwrap();
        let root = builder.build().unwrap();

        let result = HashmapDecoder.parse_dictionary(8, root.slice());
        assert!(matches!(result, Err(Error::InvalidDictionary(_))));
    }

    #[test]
    fn parse_rejects_truncated_label() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0b0_111, 4).unwrap();
        let root = builder.build().unwrap();

        let result = HashmapDecoder.parse_dictionary(8, root.slice());
        assert!(matches!(result, Err(Error::InvalidDictionary(_))));
    }

    #[test]
    fn parse_rejects_oversized_keys() {
        let root = code_cell(&[], &[]);
        let result = HashmapDecoder.parse_dictionary(1024, root.slice());
        assert!(matches!(result, Err(Error::InvalidDictionary(_))));
    }

    #[test]
    fn length_width_matches_label_encoding() {
        assert_eq!(length_width(0), 0);
        assert_eq!(length_width(1), 1);
        assert_eq!(length_width(4), 3);
        assert_eq!(length_width(8), 4);
        assert_eq!(length_width(19), 5);
        assert_eq!(length_width(1023), 10);
    }
}
