//! Cell-tree disassembler and structural flattener.
//!
//! This module turns a cell tree into a [`Program`]: a set of methods keyed by identifier,
//! each an ordered list of [`Instruction`]s. Instructions whose operands carry nested code
//! are expanded recursively, so a pushed continuation or a conditional branch target shows
//! up as a nested block right inside the operand that referenced it.
//!
//! # Key Types
//! - [`Program`] / [`Method`] - The disassembly result
//! - [`Instruction`] / [`Operand`] / [`Location`] - Decoded, addressable instructions
//! - [`Disassembler`] - The recursive driver over pluggable decoders
//! - [`DisassemblerConfig`] / [`CollisionPolicy`] - Depth limit and collision handling
//! - [`Nesting`] - Which mnemonics carry nested code, and in which operands
//! - [`FlatInstruction`] / [`StackContext`] - The flattened view
//!
//! # Main Functions
//! - [`disassemble`] - Disassemble a root cell with the default collaborators
//! - [`disassemble_with`] - Disassemble with explicit decoders and configuration
//! - [`flatten`] / [`flatten_program`] - Produce the location-free view
//!
//! # Addressing
//!
//! Instructions in a method carry a [`Location::Method`] with the method identifier and
//! their index. Instructions in anonymous blocks carry a [`Location::Lambda`] with only
//! their index: lambda locations are local to their block.
//!
//! # Example
//! ```rust
//! use cellscope::{CellBuilder, disassembler::{disassemble, Operand, ENTRY_METHOD_ID}};
//!
//! let body = {
//!     let mut b = CellBuilder::new();
//!     b.store_uint(0xDB30, 16)?; // RET
//!     b.build()?
//! };
//! let mut b = CellBuilder::new();
//! b.store_uint(0xDB3C, 16)?.store_ref(body)?; // CALLREF
//! let root = b.build()?;
//!
//! let program = disassemble(&root)?;
//! let call = &program.method(ENTRY_METHOD_ID).unwrap().instructions[0];
//! let target = call.operand("c").and_then(Operand::as_block).unwrap();
//! assert_eq!(target[0].mnemonic, "RET");
//! # Ok::<(), cellscope::Error>(())
//! ```

mod config;
mod decoder;
mod flatten;
mod instruction;
mod nesting;
mod program;

pub use config::{CollisionPolicy, DisassemblerConfig, DEFAULT_MAX_DEPTH};
pub use decoder::{disassemble, disassemble_with, Disassembler};
pub use flatten::{flatten, flatten_program, FlatInstruction, FlatOperand, StackContext};
pub use instruction::{Instruction, Location, MethodId, Operand, ENTRY_METHOD_ID};
pub use nesting::Nesting;
pub use program::{Method, Program};
