use std::sync::Arc;

use crate::cell::{BitString, Cell, CellBuilder};

// Helper function to create an ordinary cell from whole bytes and references
pub fn code_cell(bytes: &[u8], refs: &[Arc<Cell>]) -> Arc<Cell> {
    let mut builder = CellBuilder::new();
    for byte in bytes {
        builder.store_uint(u64::from(*byte), 8).unwrap();
    }
    for reference in refs {
        builder.store_ref(reference.clone()).unwrap();
    }
    builder.build().unwrap()
}

// Helper function to create a dictionary trie with `key_bits` wide signed keys.
// Values are inlined into the leaves, data bits and references alike.
pub fn dictionary_cell(key_bits: usize, entries: &[(i64, Arc<Cell>)]) -> Arc<Cell> {
    let keyed: Vec<(BitString, Arc<Cell>)> = entries
        .iter()
        .map(|(key, value)| {
            let mut bits = BitString::new();
            bits.push_uint(*key as u64, key_bits);
            (bits, value.clone())
        })
        .collect();

    trie_node(&keyed, key_bits)
}

// Helper function to create a code cell holding `DICTPUSHCONST key_bits` over `dictionary`,
// followed by `tail` bytes
pub fn dictpushconst_cell(key_bits: usize, dictionary: Arc<Cell>, tail: &[u8]) -> Arc<Cell> {
    let mut builder = CellBuilder::new();
    builder
        .store_uint(0x1E94, 13)
        .unwrap()
        .store_bit(true)
        .unwrap()
        .store_uint(key_bits as u64, 10)
        .unwrap()
        .store_ref(dictionary)
        .unwrap();
    for byte in tail {
        builder.store_uint(u64::from(*byte), 8).unwrap();
    }
    builder.build().unwrap()
}

fn trie_node(entries: &[(BitString, Arc<Cell>)], remaining: usize) -> Arc<Cell> {
    let common = common_prefix(entries, remaining);
    let label = entries[0].0.range(0, common).unwrap();
    let width = (usize::BITS - remaining.leading_zeros()) as usize;

    // hml_long
    let mut builder = CellBuilder::new();
    builder
        .store_uint(0b10, 2)
        .unwrap()
        .store_uint(common as u64, width)
        .unwrap()
        .store_bits(&label)
        .unwrap();

    if common == remaining {
        let value = &entries[0].1;
        builder.store_bits(value.data()).unwrap();
        for reference in value.references() {
            builder.store_ref(reference.clone()).unwrap();
        }
        return builder.build().unwrap();
    }

    for side in [false, true] {
        let branch: Vec<(BitString, Arc<Cell>)> = entries
            .iter()
            .filter(|(key, _)| key.get(common) == Some(side))
            .map(|(key, value)| (key.range(common + 1, key.len()).unwrap(), value.clone()))
            .collect();
        builder
            .store_ref(trie_node(&branch, remaining - common - 1))
            .unwrap();
    }

    builder.build().unwrap()
}

fn common_prefix(entries: &[(BitString, Arc<Cell>)], remaining: usize) -> usize {
    let first = &entries[0].0;
    (0..remaining)
        .find(|&i| entries.iter().any(|(key, _)| key.get(i) != first.get(i)))
        .unwrap_or(remaining)
}
