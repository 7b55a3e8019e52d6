//! Raw decoded instructions and the decoder capability.
//!
//! An instruction coming out of the decoder is "raw": its operands may still hold cursors
//! over nested cells. The disassembler turns those cursors into code blocks where the
//! mnemonic calls for it and freezes the rest.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::{
    cell::{BitCursor, BitString},
    Result,
};

/// Coarse grouping of instructions, mirroring the sections of the code page.
///
/// The category has no influence on disassembly. It is carried for display and filtering
/// in tools built on top of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum InstructionCategory {
    /// Stack shuffling primitives
    Stack,
    /// Tuple and null primitives
    Tuple,
    /// Integer, slice, cell and continuation constants
    Constant,
    /// Integer arithmetic, shifts and logic
    Arithmetic,
    /// Integer and slice comparison
    Comparison,
    /// Builder primitives
    CellBuild,
    /// Slice parsing primitives
    CellParse,
    /// Continuation and control flow primitives
    Continuation,
    /// Exception raising and handling
    Exception,
    /// Dictionary manipulation
    Dictionary,
    /// Gas, blockchain, hashing and message primitives
    Blockchain,
    /// Debug primitives
    Debug,
    /// Code page selection
    Codepage,
}

/// An operand value as produced by the instruction decoder.
#[derive(Debug, Clone)]
pub enum RawOperand<C> {
    /// An integer immediate
    Int(i64),
    /// A constant bit payload (inline slices, long integers, debug strings)
    Bits(BitString),
    /// A cursor over nested bits, either an inline sub-window or a referenced cell
    Slice(C),
}

impl<C> RawOperand<C> {
    /// Returns the integer value, if this is an integer operand.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawOperand::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Consumes the operand, returning the cursor if it holds one.
    pub fn into_slice(self) -> Option<C> {
        match self {
            RawOperand::Slice(cursor) => Some(cursor),
            _ => None,
        }
    }
}

/// One decoded instruction before nested code is expanded.
#[derive(Debug, Clone)]
pub struct RawInstruction<C> {
    /// The instruction name, e.g. `PUSHCONT`
    pub mnemonic: &'static str,
    /// The code page section the instruction belongs to
    pub category: InstructionCategory,
    /// Operands keyed by their conventional name (`i`, `n`, `s`, `c`, ...)
    pub operands: BTreeMap<&'static str, RawOperand<C>>,
}

impl<C> RawInstruction<C> {
    /// Removes and returns the operand called `name`.
    pub fn take(&mut self, name: &str) -> Option<RawOperand<C>> {
        self.operands.remove(name)
    }
}

/// The "decode next instruction" capability.
///
/// Implementations read exactly one instruction at the cursor position and advance past
/// every bit and reference it occupies. A successful call always consumes at least one
/// bit, which is what makes the disassembly loop terminate.
pub trait InstructionDecoder {
    /// The cursor type operands are handed out as.
    type Cursor: BitCursor;

    /// Decodes the instruction at the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidOpcode`] if no encoding matches and
    /// [`crate::Error::OutOfBounds`] if the instruction is truncated.
    fn decode_next(&self, cursor: &mut Self::Cursor) -> Result<RawInstruction<Self::Cursor>>;
}
