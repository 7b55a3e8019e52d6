//! Disassembled instructions, their operands and locations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell::BitString;

/// Identifier of a method inside a [`crate::disassembler::Program`].
///
/// Dictionary keys of up to 64 bits are read as signed integers, so the full `i64` range
/// is possible.
pub type MethodId = i64;

/// Identifier of the synthetic method holding the program's entry continuation.
pub const ENTRY_METHOD_ID: MethodId = i32::MAX as MethodId;

/// The address of an instruction inside its owning block.
///
/// Lambda locations are local: two instructions in two different anonymous blocks can
/// share the same location.
///
/// Serialized with a `type` tag: `{"type": "TvmInstMethodLocation", "methodId": .., "index": ..}`
/// or `{"type": "TvmInstLambdaLocation", "index": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum Location {
    /// Position inside a method registered on the program
    #[serde(rename = "TvmInstMethodLocation")]
    Method {
        /// The owning method
        #[serde(rename = "methodId")]
        method_id: MethodId,
        /// Zero-based position within the method body
        index: usize,
    },
    /// Position inside an anonymous block
    #[serde(rename = "TvmInstLambdaLocation")]
    Lambda {
        /// Zero-based position within the block
        index: usize,
    },
}

impl Location {
    /// Creates the location of the `index`-th instruction of a block owned by `method_id`,
    /// or of an anonymous block when `method_id` is `None`.
    #[must_use]
    pub fn new(method_id: Option<MethodId>, index: usize) -> Self {
        match method_id {
            Some(method_id) => Location::Method { method_id, index },
            None => Location::Lambda { index },
        }
    }

    /// The position within the owning block.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Location::Method { index, .. } | Location::Lambda { index } => *index,
        }
    }

    /// The owning method, if the block is a method body.
    #[must_use]
    pub fn method_id(&self) -> Option<MethodId> {
        match self {
            Location::Method { method_id, .. } => Some(*method_id),
            Location::Lambda { .. } => None,
        }
    }
}

/// A fully disassembled operand value.
///
/// Serialized without a tag: integers as numbers, bit payloads as `x{..}` strings, blocks
/// as arrays of instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// An integer immediate
    Int(i64),
    /// A constant bit payload
    Bits(BitString),
    /// A nested anonymous block, owned by this operand slot
    Block(Vec<Instruction>),
}

impl Operand {
    /// Returns the integer value, if this is an integer operand.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Operand::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the nested block, if this operand holds one.
    #[must_use]
    pub fn as_block(&self) -> Option<&[Instruction]> {
        match self {
            Operand::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    /// The instruction name
    #[serde(rename = "type")]
    pub mnemonic: &'static str,
    /// Where the instruction sits in its owning block
    pub location: Location,
    /// Operands keyed by name, with nested code already expanded
    #[serde(flatten)]
    pub operands: BTreeMap<&'static str, Operand>,
}

impl Instruction {
    /// Returns the operand called `name`.
    #[must_use]
    pub fn operand(&self, name: &str) -> Option<&Operand> {
        self.operands.get(name)
    }

    /// Iterates over the anonymous blocks nested directly below this instruction.
    pub fn blocks(&self) -> impl Iterator<Item = &[Instruction]> + '_ {
        self.operands.values().filter_map(Operand::as_block)
    }

    /// Counts this instruction and every instruction nested below it.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        1 + self
            .blocks()
            .flat_map(|block| block.iter())
            .map(Instruction::instruction_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(mnemonic: &'static str, index: usize) -> Instruction {
        Instruction {
            mnemonic,
            location: Location::new(None, index),
            operands: BTreeMap::new(),
        }
    }

    #[test]
    fn location_constructors() {
        assert_eq!(
            Location::new(Some(5), 2),
            Location::Method {
                method_id: 5,
                index: 2
            }
        );
        assert_eq!(Location::new(None, 3), Location::Lambda { index: 3 });
        assert_eq!(Location::new(Some(-1), 4).index(), 4);
        assert_eq!(Location::new(Some(-1), 4).method_id(), Some(-1));
        assert_eq!(Location::new(None, 0).method_id(), None);
    }

    #[test]
    fn instruction_count_includes_nested_blocks() {
        let mut operands = BTreeMap::new();
        operands.insert("c1", Operand::Block(vec![leaf("NOP", 0), leaf("SWAP", 1)]));
        operands.insert("c2", Operand::Block(vec![leaf("RET", 0)]));
        operands.insert("n", Operand::Int(3));
        let outer = Instruction {
            mnemonic: "IFREFELSEREF",
            location: Location::new(Some(ENTRY_METHOD_ID), 0),
            operands,
        };

        assert_eq!(outer.blocks().count(), 2);
        assert_eq!(outer.instruction_count(), 4);
        assert_eq!(outer.operand("n").and_then(Operand::as_int), Some(3));
    }

    #[test]
    fn serialize_flattens_operands() {
        let mut operands = BTreeMap::new();
        operands.insert("x", Operand::Int(-3));
        let instruction = Instruction {
            mnemonic: "PUSHINT_8",
            location: Location::new(Some(7), 1),
            operands,
        };

        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "PUSHINT_8",
                "location": {"type": "TvmInstMethodLocation", "methodId": 7, "index": 1},
                "x": -3
            })
        );
    }

    #[test]
    fn serialize_lambda_block() {
        let mut operands = BTreeMap::new();
        operands.insert("s", Operand::Block(vec![leaf("NOP", 0)]));
        let instruction = Instruction {
            mnemonic: "PUSHCONT_SHORT",
            location: Location::new(None, 0),
            operands,
        };

        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(json["location"], serde_json::json!({"type": "TvmInstLambdaLocation", "index": 0}));
        assert_eq!(json["s"][0]["type"], "NOP");
    }
}
