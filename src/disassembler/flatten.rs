//! Structural flattening of disassembled code.
//!
//! Flattening strips locations and reduces every instruction to an `{opcode, operands}`
//! record, recursing into nested blocks. It interprets nothing: an execution context is
//! threaded through the walk, and every nested block receives its own copy of it so that
//! sibling branches cannot observe each other.
//!
//! # Examples
//!
//! ```rust
//! use cellscope::{
//!     CellBuilder,
//!     disassembler::{disassemble, flatten_program, FlatOperand, StackContext, ENTRY_METHOD_ID},
//! };
//!
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x92_00_01, 24)?; // PUSHCONT_SHORT { NOP; SWAP }
//! let root = builder.build()?;
//!
//! let program = disassemble(&root)?;
//! let flat = flatten_program(&program, &StackContext::entry());
//! let entry = &flat[&ENTRY_METHOD_ID];
//!
//! assert_eq!(entry[0].opcode, "PUSHCONT_SHORT");
//! match &entry[0].operands["s"] {
//!     FlatOperand::Block(body) => assert_eq!(body.len(), 2),
//!     other => panic!("unexpected operand {:?}", other),
//! }
//! # Ok::<(), cellscope::Error>(())
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    cell::BitString,
    disassembler::{Instruction, MethodId, Operand, Program},
};

/// An operand of a flattened instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlatOperand {
    /// An integer immediate
    Int(i64),
    /// A constant bit payload
    Bits(BitString),
    /// A flattened nested block
    Block(Vec<FlatInstruction>),
}

/// A location-free instruction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatInstruction {
    /// The instruction name
    pub opcode: &'static str,
    /// Operands keyed by name, nested blocks flattened in place
    pub operands: BTreeMap<&'static str, FlatOperand>,
}

impl FlatInstruction {
    /// Counts this record and every record nested below it.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        1 + self
            .operands
            .values()
            .map(|operand| match operand {
                FlatOperand::Block(block) => {
                    block.iter().map(FlatInstruction::instruction_count).sum()
                }
                _ => 0,
            })
            .sum::<usize>()
    }
}

/// Named value slots of an execution context.
///
/// The context is a placeholder for stack tracking: it names the values known to be on
/// the stack when a block starts. Flattening only copies it into nested blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackContext {
    slots: Vec<String>,
}

impl StackContext {
    /// Creates a context with no known slots.
    #[must_use]
    pub fn new() -> Self {
        StackContext::default()
    }

    /// The context a contract's entry continuation starts with: the message body and the
    /// function selector, selector on top.
    #[must_use]
    pub fn entry() -> Self {
        StackContext {
            slots: vec!["body".to_string(), "selector".to_string()],
        }
    }

    /// Pushes a named slot.
    pub fn push(&mut self, name: impl Into<String>) {
        self.slots.push(name.into());
    }

    /// Pops the topmost slot.
    pub fn pop(&mut self) -> Option<String> {
        self.slots.pop()
    }

    /// The slots, bottom first.
    #[must_use]
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Number of slots.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }
}

/// Flattens `instructions`, giving each nested block its own copy of `context`.
#[must_use]
pub fn flatten<C: Clone>(instructions: &[Instruction], context: &C) -> Vec<FlatInstruction> {
    instructions
        .iter()
        .map(|instruction| FlatInstruction {
            opcode: instruction.mnemonic,
            operands: instruction
                .operands
                .iter()
                .map(|(&name, operand)| {
                    let flat = match operand {
                        Operand::Int(value) => FlatOperand::Int(*value),
                        Operand::Bits(bits) => FlatOperand::Bits(bits.clone()),
                        Operand::Block(block) => {
                            let nested = context.clone();
                            FlatOperand::Block(flatten(block, &nested))
                        }
                    };
                    (name, flat)
                })
                .collect(),
        })
        .collect()
}

/// Flattens every method of `program`, each starting from a copy of `context`.
#[must_use]
pub fn flatten_program<C: Clone>(
    program: &Program,
    context: &C,
) -> BTreeMap<MethodId, Vec<FlatInstruction>> {
    program
        .methods()
        .map(|method| (method.id, flatten(&method.instructions, &context.clone())))
        .collect()
}
