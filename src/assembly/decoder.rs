//! Table-driven decoding of code page 0 instructions.
//!
//! The decoder reads one instruction at a time from a [`crate::cell::Slice`]. It looks up
//! the longest table prefix matching the bits at the cursor, then reads the operands the
//! entry lists, in order. Operands that stand for nested code (inline continuations,
//! referenced cells, dictionary roots) are handed out as fresh slices and left for the
//! disassembler to expand.
//!
//! # Key Components
//!
//! - [`crate::assembly::Codepage0`] - The [`crate::assembly::InstructionDecoder`] implementation
//! - [`crate::assembly::decode_instruction`] - Decode a single instruction
//! - [`crate::assembly::decode_stream`] - Decode a whole cell body without following nested code
//!
//! # Usage Examples
//!
//! ```rust
//! use cellscope::{CellBuilder, assembly::{decode_instruction, decode_stream, RawOperand}};
//!
//! // PUSHINT_8 -3; RET
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x80, 8)?.store_int(-3, 8)?.store_uint(0xDB30, 16)?;
//! let cell = builder.build()?;
//!
//! let mut slice = cell.slice();
//! let first = decode_instruction(&mut slice)?;
//! assert_eq!(first.mnemonic, "PUSHINT_8");
//! assert_eq!(first.operands["x"].as_int(), Some(-3));
//!
//! let all = decode_stream(&mut cell.slice())?;
//! assert_eq!(all.len(), 2);
//! assert_eq!(all[1].mnemonic, "RET");
//! # Ok::<(), cellscope::Error>(())
//! ```

use std::collections::BTreeMap;

use log::trace;

use crate::{
    assembly::{
        opcodes::{self, OpcodeSpec, OperandLayout},
        InstructionDecoder, RawInstruction, RawOperand,
    },
    cell::{BitCursor, Slice},
    Error, Result,
};

/// Number of bits shown in an invalid opcode report.
const OPCODE_PREVIEW_BITS: usize = 24;

/// Decoder for code page 0, the only code page in practical use.
///
/// The type is a zero-sized handle over a process-wide encoding index that is built on
/// first use.
///
/// # Examples
///
/// ```rust
/// use cellscope::{CellBuilder, assembly::{Codepage0, InstructionDecoder}};
///
/// let mut builder = CellBuilder::new();
/// builder.store_uint(0x00, 8)?;
/// let cell = builder.build()?;
///
/// let instruction = Codepage0.decode_next(&mut cell.slice())?;
/// assert_eq!(instruction.mnemonic, "NOP");
/// # Ok::<(), cellscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Codepage0;

impl InstructionDecoder for Codepage0 {
    type Cursor = Slice;

    fn decode_next(&self, cursor: &mut Slice) -> Result<RawInstruction<Slice>> {
        decode_instruction(cursor)
    }
}

/// Decodes every instruction in `slice` until it is exhausted.
///
/// Nested code is not followed: continuation and reference operands stay raw slices.
///
/// # Errors
///
/// Returns the first decoding error encountered. Decoding never resynchronizes.
pub fn decode_stream(slice: &mut Slice) -> Result<Vec<RawInstruction<Slice>>> {
    let mut instructions = Vec::new();

    while !slice.is_exhausted() {
        instructions.push(decode_instruction(slice)?);
    }

    Ok(instructions)
}

/// Decodes a single instruction at the cursor and advances past it.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidOpcode`] if no table entry matches the bits at the cursor,
/// [`crate::Error::OutOfBounds`] if the cursor is empty or the operands are truncated, and
/// [`crate::Error::InvalidDictionary`] for a dictionary constant without a root.
pub fn decode_instruction(slice: &mut Slice) -> Result<RawInstruction<Slice>> {
    let spec = match_opcode(slice)?;
    slice.skip_bits(usize::from(spec.prefix_bits))?;

    let mut operands = BTreeMap::new();
    for layout in spec.operands {
        let (name, value) = read_operand(slice, layout)?;
        operands.insert(name, value);
    }

    trace!(
        "{} ({} operands, {} bits left)",
        spec.mnemonic,
        operands.len(),
        slice.remaining_bits()
    );

    Ok(RawInstruction {
        mnemonic: spec.mnemonic,
        category: spec.category,
        operands,
    })
}

fn match_opcode(slice: &Slice) -> Result<&'static OpcodeSpec> {
    let available = slice.remaining_bits();
    if available == 0 {
        return Err(out_of_bounds_error!());
    }

    let index = opcodes::index();
    for &bits in index.lengths() {
        let width = usize::from(bits);
        if width > available {
            continue;
        }

        let prefix = slice.peek_uint(width)? as u32;
        if let Some(spec) = index.get(bits, prefix) {
            return Ok(spec);
        }
    }

    let mut probe = slice.clone();
    let preview = probe.load_bits(available.min(OPCODE_PREVIEW_BITS))?;
    Err(Error::InvalidOpcode(preview.to_string()))
}

fn read_operand(
    slice: &mut Slice,
    layout: &OperandLayout,
) -> Result<(&'static str, RawOperand<Slice>)> {
    match *layout {
        OperandLayout::Uint { name, bits, bias } => {
            let raw = slice.load_uint(usize::from(bits))?;
            Ok((name, RawOperand::Int(raw as i64 + bias)))
        }
        OperandLayout::Int { name, bits } => {
            Ok((name, RawOperand::Int(slice.load_int(usize::from(bits))?)))
        }
        OperandLayout::TinyInt { name } => {
            let raw = slice.load_uint(4)? as i64;
            let value = if raw > 10 { raw - 16 } else { raw };
            Ok((name, RawOperand::Int(value)))
        }
        OperandLayout::LongInt { name } => {
            let length = slice.load_uint(5)? as usize;
            let bits = 8 * length + 19;
            if bits <= 64 {
                Ok((name, RawOperand::Int(slice.load_int(bits)?)))
            } else {
                Ok((name, RawOperand::Bits(slice.load_bits(bits)?)))
            }
        }
        OperandLayout::Ref { name } => {
            let cell = slice.load_ref()?;
            Ok((name, RawOperand::Slice(cell.slice())))
        }
        OperandLayout::Continuation {
            name,
            refs_bits,
            bytes_bits,
        } => {
            let refs = slice.load_uint(usize::from(refs_bits))? as usize;
            let bytes = slice.load_uint(usize::from(bytes_bits))? as usize;
            Ok((name, RawOperand::Slice(slice.split(bytes * 8, refs)?)))
        }
        OperandLayout::SliceConst {
            name,
            refs_bits,
            refs_bias,
            length_bits,
            extra_bits,
        } => {
            let refs = slice.load_uint(usize::from(refs_bits))? as usize + usize::from(refs_bias);
            let length = slice.load_uint(usize::from(length_bits))? as usize;
            let data = slice.split(length * 8 + usize::from(extra_bits), refs)?;
            Ok((name, RawOperand::Bits(data.to_bit_string().without_completion_tag())))
        }
        OperandLayout::Dictionary { name } => {
            if !slice.load_bit()? {
                return Err(Error::InvalidDictionary(
                    "dictionary constant has no root".to_string(),
                ));
            }
            let root = slice.load_ref()?;
            Ok((name, RawOperand::Slice(root.slice())))
        }
        OperandLayout::DebugString { name, length_bits } => {
            let length = slice.load_uint(usize::from(length_bits))? as usize;
            Ok((name, RawOperand::Bits(slice.load_bits((length + 1) * 8)?)))
        }
    }
}
