//! Instruction decoding for code page 0.
//!
//! This module turns the bits of a cell into raw instructions: a mnemonic, a category and
//! a set of named operands. It knows nothing about methods or nesting; the
//! [`crate::disassembler`] drives it and decides which operands to expand.
//!
//! # Architecture
//!
//! - `opcodes` - The static encoding table and its longest-prefix index
//! - `decoder` - Operand readers and the [`Codepage0`] decoder
//! - `instruction` - [`RawInstruction`], [`RawOperand`] and the [`InstructionDecoder`] trait
//!
//! # Key Components
//!
//! - [`InstructionDecoder`] - The capability consumed by the disassembler
//! - [`Codepage0`] - The table-driven implementation over [`crate::cell::Slice`]
//! - [`decode_instruction`] / [`decode_stream`] - Free-standing decoding helpers
//! - [`InstructionCategory`] - Coarse grouping of the instruction set
//!
//! # Examples
//!
//! ```rust
//! use cellscope::{CellBuilder, assembly::{decode_stream, InstructionCategory}};
//!
//! // PUSHINT_4 2; PUSHINT_4 3; ADD
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x7273_A0, 24)?;
//! let cell = builder.build()?;
//!
//! let instructions = decode_stream(&mut cell.slice())?;
//! assert_eq!(instructions[2].mnemonic, "ADD");
//! assert_eq!(instructions[2].category, InstructionCategory::Arithmetic);
//! # Ok::<(), cellscope::Error>(())
//! ```

mod decoder;
mod instruction;
pub(crate) mod opcodes;

pub use decoder::{decode_instruction, decode_stream, Codepage0};
pub use instruction::{InstructionCategory, InstructionDecoder, RawInstruction, RawOperand};

/// Returns every mnemonic of code page 0 in table order.
///
/// Alternate encodings of the same operation carry distinct names (for example `STI` and
/// `STI_ALT`), so the list has no duplicates.
pub fn mnemonics() -> impl Iterator<Item = &'static str> {
    opcodes::OPCODES.iter().map(|spec| spec.mnemonic)
}

/// Looks up the category of a mnemonic.
///
/// Returns `None` for names that are not part of code page 0.
#[must_use]
pub fn category_of(mnemonic: &str) -> Option<InstructionCategory> {
    opcodes::OPCODES
        .iter()
        .find(|spec| spec.mnemonic == mnemonic)
        .map(|spec| spec.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_listing() {
        let all: Vec<_> = mnemonics().collect();
        assert!(all.contains(&"PUSHCONT"));
        assert!(all.contains(&"DICTPUSHCONST"));
        assert_eq!(all.first(), Some(&"NOP"));
    }

    #[test]
    fn category_lookup() {
        assert_eq!(category_of("RET"), Some(InstructionCategory::Continuation));
        assert_eq!(category_of("THROW"), Some(InstructionCategory::Exception));
        assert_eq!(category_of("NOT_AN_OPCODE"), None);
    }
}
