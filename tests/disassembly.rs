//! End-to-end disassembly through the public API: containers in, programs and flattened
//! views out.

use std::sync::Arc;

use cellscope::{
    assembly::Codepage0,
    dictionary::HashmapDecoder,
    disassembler::{
        disassemble, disassemble_with, flatten, flatten_program, CollisionPolicy,
        DisassemblerConfig, FlatInstruction, Instruction, Location, Operand, Program,
        StackContext, ENTRY_METHOD_ID,
    },
    BitString, Boc, Cell, CellBuilder, Error,
};

fn code(bytes: &[u8], refs: &[Arc<Cell>]) -> Arc<Cell> {
    let mut builder = CellBuilder::new();
    for byte in bytes {
        builder.store_uint(u64::from(*byte), 8).unwrap();
    }
    for reference in refs {
        builder.store_ref(reference.clone()).unwrap();
    }
    builder.build().unwrap()
}

/// A dictionary with a single `key_bits` wide entry, value inlined in the leaf.
fn single_entry_dictionary(key_bits: usize, key: i64, value: &Arc<Cell>) -> Arc<Cell> {
    let width = (usize::BITS - key_bits.leading_zeros()) as usize;
    let mut label = BitString::new();
    label.push_uint(key as u64, key_bits);

    let mut builder = CellBuilder::new();
    builder
        .store_uint(0b10, 2)
        .unwrap()
        .store_uint(key_bits as u64, width)
        .unwrap()
        .store_bits(&label)
        .unwrap()
        .store_bits(value.data())
        .unwrap();
    for reference in value.references() {
        builder.store_ref(reference.clone()).unwrap();
    }
    builder.build().unwrap()
}

/// A two-entry dictionary whose keys differ in the first bit.
fn split_dictionary(
    key_bits: usize,
    left: (i64, &Arc<Cell>),
    right: (i64, &Arc<Cell>),
) -> Arc<Cell> {
    let width = (usize::BITS - key_bits.leading_zeros()) as usize;
    let mut builder = CellBuilder::new();
    // empty hml_long label, then the fork
    builder
        .store_uint(0b10, 2)
        .unwrap()
        .store_uint(0, width)
        .unwrap()
        .store_ref(single_entry_dictionary(key_bits - 1, left.0, left.1))
        .unwrap()
        .store_ref(single_entry_dictionary(key_bits - 1, right.0, right.1))
        .unwrap();
    builder.build().unwrap()
}

fn dictpushconst(key_bits: usize, dictionary: Arc<Cell>) -> CellBuilder {
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
    builder
}

fn entry(program: &Program) -> &[Instruction] {
    &program.method(ENTRY_METHOD_ID).unwrap().instructions
}

fn assert_dense(block: &[Instruction]) {
    for (expected, instruction) in block.iter().enumerate() {
        assert_eq!(instruction.location.index(), expected);
        for nested in instruction.blocks() {
            assert!(nested
                .iter()
                .all(|inner| matches!(inner.location, Location::Lambda { .. })));
            assert_dense(nested);
        }
    }
}

#[test]
fn empty_root_yields_empty_entry() {
    let program = disassemble(&code(&[], &[])).unwrap();
    assert_eq!(program.len(), 1);
    assert!(entry(&program).is_empty());
}

#[test]
fn single_instruction_program() {
    let program = disassemble(&code(&[0xA0], &[])).unwrap();
    let instructions = entry(&program);

    assert_eq!(instructions.len(), 1);
    assert_eq!(
        instructions[0].location,
        Location::Method {
            method_id: ENTRY_METHOD_ID,
            index: 0
        }
    );
    assert!(instructions[0].operands.is_empty());
}

#[test]
fn pushed_continuation_becomes_lambda() {
    // PUSHCONT_SHORT { PUSHINT_4 1; ADD }
    let program = disassemble(&code(&[0x92, 0x71, 0xA0], &[])).unwrap();
    let instructions = entry(&program);

    assert_eq!(instructions.len(), 1);
    let lambda = instructions[0].operand("s").and_then(Operand::as_block).unwrap();
    assert_eq!(lambda.len(), 2);
    assert_eq!(lambda[0].location, Location::Lambda { index: 0 });
    assert_eq!(lambda[1].location, Location::Lambda { index: 1 });
    assert_dense(instructions);
}

#[test]
fn dictionary_expands_into_methods() {
    let five = code(&[0xA0], &[]);
    let minus_three = code(&[0xDB, 0x30], &[]);
    // 5 starts with 0, -3 with 1: they split at the first key bit
    let dictionary = split_dictionary(19, (5, &five), (-3, &minus_three));
    let root = dictpushconst(19, dictionary).build().unwrap();

    let program = disassemble(&root).unwrap();
    assert_eq!(program.len(), 3);

    for (id, mnemonic) in [(5, "ADD"), (-3, "RET")] {
        let method = program.method(id).unwrap();
        assert_eq!(method.instructions.len(), 1);
        assert_eq!(method.instructions[0].mnemonic, mnemonic);
        assert_eq!(
            method.instructions[0].location,
            Location::Method {
                method_id: id,
                index: 0
            }
        );
    }

    let push = &entry(&program)[0];
    assert_eq!(push.mnemonic, "DICTPUSHCONST");
    assert_eq!(push.operand("n").and_then(Operand::as_int), Some(19));
    assert_eq!(push.operands.len(), 1);
}

#[test]
fn second_dictionary_push_wins() {
    let first = single_entry_dictionary(19, 7, &code(&[0x00], &[]));
    let second = single_entry_dictionary(19, 7, &code(&[0x01, 0x01], &[]));

    let mut builder = dictpushconst(19, first);
    builder
        .store_uint(0x1E94, 13)
        .unwrap()
        .store_bit(true)
        .unwrap()
        .store_uint(19, 10)
        .unwrap()
        .store_ref(second)
        .unwrap();
    let root = builder.build().unwrap();

    let program = disassemble(&root).unwrap();
    assert_eq!(program.len(), 2);
    let seven = program.method(7).unwrap();
    assert_eq!(seven.instructions.len(), 2);
    assert!(seven.instructions.iter().all(|i| i.mnemonic == "SWAP"));

    let config = DisassemblerConfig::default().with_collision(CollisionPolicy::Reject);
    let result = disassemble_with(&Codepage0, &HashmapDecoder, config, root.slice());
    assert!(matches!(result, Err(Error::DuplicateMethod(7))));
}

#[test]
fn flattening_preserves_every_instruction() {
    let branch = code(&[0x92, 0x00, 0x01, 0xDB, 0x30], &[]);
    let method = code(&[0xE3, 0x00, 0xA0], &[branch]);
    let dictionary = single_entry_dictionary(19, 1, &method);
    let mut builder = dictpushconst(19, dictionary);
    builder.store_uint(0xDB30, 16).unwrap();
    let root = builder.build().unwrap();

    let program = disassemble(&root).unwrap();
    assert_eq!(program.instruction_count(), 8);
    for method in program.methods() {
        assert_dense(&method.instructions);
    }

    let flat = flatten_program(&program, &StackContext::entry());
    let total: usize = flat
        .values()
        .flat_map(|list| list.iter())
        .map(FlatInstruction::instruction_count)
        .sum();
    assert_eq!(total, program.instruction_count());

    let plain = flatten(entry(&program), &StackContext::new());
    assert_eq!(plain.len(), entry(&program).len());
    assert_eq!(plain[1].opcode, "RET");
}

#[test]
fn container_to_json() {
    // Root: NOP; PUSHINT_4 1
    let bytes = [
        0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00, 0x04, 0x00,
        0x71,
    ];
    let boc = Boc::from_slice(&bytes).unwrap();
    let program = disassemble(boc.root().unwrap()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&program.to_json().unwrap()).unwrap();
    let instructions = &json["methods"]["2147483647"]["instList"];
    assert_eq!(instructions[0]["type"], "NOP");
    assert_eq!(instructions[1]["type"], "PUSHINT_4");
    assert_eq!(instructions[1]["x"], 1);
    assert_eq!(instructions[1]["location"]["methodId"], 2_147_483_647);
    assert_eq!(instructions[1]["location"]["type"], "TvmInstMethodLocation");
    assert_eq!(instructions[1]["location"]["index"], 1);
}

#[test]
fn truncated_code_is_fatal() {
    // PUSHINT_8 without its operand, nested in a referenced branch
    let branch = code(&[0x80], &[]);
    let root = code(&[0x00, 0xDB, 0x3C], &[branch]);
    assert!(matches!(disassemble(&root), Err(Error::OutOfBounds { .. })));
}
