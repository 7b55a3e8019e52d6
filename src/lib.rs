// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
// - 'cell/boc.rs' uses mmap to map a file into memory

//! # cellscope
//!
//! A cross-platform framework for disassembling TVM bytecode. Contract code for the TVM
//! is not a flat byte stream but a tree of cells connected by references; `cellscope`
//! walks that tree and produces a structured, addressable program in which every
//! continuation, branch target and method table is expanded in place.
//!
//! ## Features
//!
//! - **📦 Bag-of-cells loading** - Memory-mapped container parsing with CRC32-C verification
//! - **🔍 Complete code page 0 decoding** - Table-driven, longest-prefix instruction decoding
//! - **🌳 Recursive disassembly** - Continuations, reference branches and method dictionaries
//!   become nested blocks and methods
//! - **🧩 Pluggable collaborators** - Instruction and dictionary decoding behind traits
//! - **📊 Serializable output** - Programs and flattened views serialize to JSON
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use cellscope::prelude::*;
//!
//! let boc = Boc::from_file("contract.boc".as_ref())?;
//! let root = boc.root().ok_or(Error::Empty)?;
//! let program = disassemble(root)?;
//! println!("Found {} methods", program.len());
//! # Ok::<(), cellscope::Error>(())
//! ```
//!
//! ### Building Code by Hand
//!
//! ```rust
//! use cellscope::{CellBuilder, disassembler::{disassemble, ENTRY_METHOD_ID}};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x7A, 8)?.store_uint(0xDB30, 16)?; // PUSHINT_4 10; RET
//! let root = builder.build()?;
//!
//! let program = disassemble(&root)?;
//! let entry = program.method(ENTRY_METHOD_ID).unwrap();
//! assert_eq!(entry.instructions[1].mnemonic, "RET");
//! # Ok::<(), cellscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `cellscope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`cell`] - Cells, bit strings, cursors and bag-of-cells loading
//! - [`assembly`] - Instruction decoding for code page 0
//! - [`dictionary`] - Dictionary trie decoding
//! - [`disassembler`] - Recursive disassembly and structural flattening
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Every error is fatal to the
//! operation that raised it; the disassembler never resynchronizes after a bad
//! instruction:
//!
//! ```rust,no_run
//! use cellscope::{Boc, Error, disassembler::disassemble};
//!
//! let boc = Boc::from_file(std::path::Path::new("contract.boc"))?;
//! match boc.root().map(disassemble) {
//!     Some(Ok(program)) => println!("{} methods", program.len()),
//!     Some(Err(Error::InvalidOpcode(bits))) => println!("Unknown instruction at {}", bits),
//!     Some(Err(e)) => println!("Other error: {}", e),
//!     None => println!("No root cell"),
//! }
//! # Ok::<(), cellscope::Error>(())
//! ```
//!
//! ## Development and Testing
//!
//! ### Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run boc --release
//! ```
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use cellscope::prelude::*;
///
/// let boc = Boc::from_file("contract.boc".as_ref())?;
/// for root in boc.roots() {
///     let program = disassemble(root)?;
///     println!("{} instructions", program.instruction_count());
/// }
/// # Ok::<(), cellscope::Error>(())
/// ```
pub mod prelude;

/// Cells, bit strings, cursors and bag-of-cells containers
pub mod cell;

/// Instruction decoding for code page 0
pub mod assembly;

/// Dictionary (binary trie) decoding
pub mod dictionary;

/// Recursive cell-tree disassembly and structural flattening
///
/// # Key Types
///
/// - [`disassembler::Program`] - Methods keyed by identifier
/// - [`disassembler::Instruction`] - A decoded instruction with its location and operands
/// - [`disassembler::Operand`] - Integers, bit payloads or nested blocks
///
/// # Main Functions
///
/// - [`disassembler::disassemble`] - Disassemble a root cell
/// - [`disassembler::flatten_program`] - Produce the flattened view
pub mod disassembler;

/// `cellscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cellscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use cell::{bits_to_signed_integer, BitCursor, BitString, Boc, Cell, CellBuilder, Parser, Slice};
