//! # cellscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cellscope library. Import this module to get quick access to the essential
//! types for loading and disassembling contract code.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cellscope operations
pub use crate::Error;

/// The result type used throughout cellscope
pub use crate::Result;

// ================================================================================================
// Cells and Containers
// ================================================================================================

/// Bag-of-cells loading
pub use crate::cell::{Boc, BocFlags};

/// Cell model and cursors
pub use crate::cell::{bits_to_signed_integer, BitCursor, BitString, Cell, CellBuilder, Slice};

// ================================================================================================
// Decoding
// ================================================================================================

/// Instruction decoding capability and the code page 0 implementation
pub use crate::assembly::{
    Codepage0, InstructionCategory, InstructionDecoder, RawInstruction, RawOperand,
};

/// Dictionary decoding capability and the trie parser
pub use crate::dictionary::{DictEntry, DictionaryDecoder, HashmapDecoder};

// ================================================================================================
// Disassembly
// ================================================================================================

/// Disassembly entry points and configuration
pub use crate::disassembler::{
    disassemble, disassemble_with, CollisionPolicy, Disassembler, DisassemblerConfig,
};

/// Disassembly result types
pub use crate::disassembler::{
    Instruction, Location, Method, MethodId, Operand, Program, ENTRY_METHOD_ID,
};

/// Flattened view
pub use crate::disassembler::{flatten, flatten_program, FlatInstruction, FlatOperand, StackContext};
