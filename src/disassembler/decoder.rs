//! Recursive disassembly of cell trees.
//!
//! The [`Disassembler`] decodes a cursor one instruction at a time and expands operands
//! that hold nested code: inline continuations and referenced cells become anonymous
//! blocks inside the operand map, and constant dictionaries become methods registered on
//! the [`crate::disassembler::Program`].
//!
//! # Example: Disassembling a Cell
//!
//! ```rust
//! use cellscope::{CellBuilder, disassembler::{disassemble, ENTRY_METHOD_ID}};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x7A_A0, 16)?; // PUSHINT_4 10; ADD
//! let root = builder.build()?;
//!
//! let program = disassemble(&root)?;
//! let entry = program.method(ENTRY_METHOD_ID).unwrap();
//! assert_eq!(entry.instructions.len(), 2);
//! assert_eq!(entry.instructions[1].mnemonic, "ADD");
//! # Ok::<(), cellscope::Error>(())
//! ```
//!
//! # Example: Custom Configuration
//!
//! ```rust
//! use cellscope::{
//!     CellBuilder, Error,
//!     assembly::Codepage0,
//!     dictionary::HashmapDecoder,
//!     disassembler::{disassemble_with, DisassemblerConfig},
//! };
//!
//! let leaf = CellBuilder::new().build()?;
//! let mut builder = CellBuilder::new();
//! builder.store_uint(0x8A, 8)?.store_ref(leaf)?; // PUSHREFCONT
//! let root = builder.build()?;
//!
//! let config = DisassemblerConfig::strict().with_max_depth(1);
//! let result = disassemble_with(&Codepage0, &HashmapDecoder, config, root.slice());
//! assert!(matches!(result, Err(Error::RecursionLimit(1))));
//! # Ok::<(), cellscope::Error>(())
//! ```

use std::{collections::BTreeMap, sync::Arc};

use log::debug;

use crate::{
    assembly::{Codepage0, InstructionDecoder, RawOperand},
    cell::{bits_to_signed_integer, BitCursor, Cell},
    dictionary::{DictionaryDecoder, HashmapDecoder},
    disassembler::{
        DisassemblerConfig, Instruction, Location, MethodId, Nesting, Operand, Program,
        ENTRY_METHOD_ID,
    },
    Error, Result,
};

/// A stateful disassembler over an instruction decoder and a dictionary decoder.
///
/// The disassembler itself only tracks the current nesting depth. Everything it
/// discovers goes into the [`Program`] passed to [`Disassembler::disassemble_block`].
pub struct Disassembler<'a, D, T> {
    decoder: &'a D,
    dictionaries: &'a T,
    config: DisassemblerConfig,
    depth: usize,
}

impl<'a, D, T> Disassembler<'a, D, T>
where
    D: InstructionDecoder,
    T: DictionaryDecoder<D::Cursor>,
{
    /// Create a new Disassembler
    ///
    /// ## Arguments
    /// * 'decoder'      - Decodes one instruction at a cursor
    /// * 'dictionaries' - Splits dictionary constants into keys and value cursors
    /// * 'config'       - Collision policy and depth limit
    pub fn new(decoder: &'a D, dictionaries: &'a T, config: DisassemblerConfig) -> Self {
        Disassembler {
            decoder,
            dictionaries,
            config,
            depth: 0,
        }
    }

    /// Disassembles a whole program rooted at `cursor`.
    ///
    /// The root becomes the body of the synthetic method [`ENTRY_METHOD_ID`].
    ///
    /// # Errors
    /// Returns the first decoding, dictionary, collision or depth error encountered.
    pub fn disassemble_program(&mut self, cursor: D::Cursor) -> Result<Program> {
        let mut program = Program::new();
        self.expand_method(ENTRY_METHOD_ID, cursor, &mut program)?;
        Ok(program)
    }

    /// Disassembles every instruction at `cursor` into a block.
    ///
    /// Instructions get method locations if `method_id` is given and lambda locations
    /// otherwise. Methods found in constant dictionaries along the way are registered on
    /// `program`; nothing else is.
    ///
    /// # Errors
    /// Returns the first decoding, dictionary, collision or depth error encountered.
    pub fn disassemble_block(
        &mut self,
        mut cursor: D::Cursor,
        program: &mut Program,
        method_id: Option<MethodId>,
    ) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();

        while !cursor.is_exhausted() {
            let raw = self.decoder.decode_next(&mut cursor)?;
            let nesting = Nesting::of(raw.mnemonic);
            let dictionary_operands = nesting.dictionary_operands();

            let mut operands = BTreeMap::new();
            let mut dictionary = None;
            for (name, value) in raw.operands {
                let nested = match value {
                    RawOperand::Int(value) => {
                        operands.insert(name, Operand::Int(value));
                        continue;
                    }
                    RawOperand::Bits(bits) => {
                        operands.insert(name, Operand::Bits(bits));
                        continue;
                    }
                    RawOperand::Slice(nested) => nested,
                };

                let operand = match nesting {
                    Nesting::Continuation | Nesting::Reference | Nesting::DualReference
                        if nesting.block_operands().contains(&name) =>
                    {
                        Operand::Block(self.descend(nested, program, None)?)
                    }
                    Nesting::Dictionary
                        if dictionary_operands.is_some_and(|(dict, _)| dict == name) =>
                    {
                        dictionary = Some(nested);
                        continue;
                    }
                    Nesting::None
                    | Nesting::Continuation
                    | Nesting::Reference
                    | Nesting::DualReference
                    | Nesting::Dictionary => Operand::Bits(nested.to_bit_string()),
                };
                operands.insert(name, operand);
            }

            if let (Some(root), Some((_, width))) = (dictionary, dictionary_operands) {
                let key_bits = operands
                    .get(width)
                    .and_then(Operand::as_int)
                    .and_then(|bits| usize::try_from(bits).ok())
                    .ok_or_else(|| {
                        malformed_error!("{} without a key width", raw.mnemonic)
                    })?;
                self.expand_dictionary(key_bits, root, program)?;
            }

            instructions.push(Instruction {
                mnemonic: raw.mnemonic,
                location: Location::new(method_id, instructions.len()),
                operands,
            });
        }

        Ok(instructions)
    }

    /// Registers one method per dictionary entry and disassembles its body.
    fn expand_dictionary(
        &mut self,
        key_bits: usize,
        root: D::Cursor,
        program: &mut Program,
    ) -> Result<()> {
        let entries = self.dictionaries.parse_dictionary(key_bits, root)?;
        debug!(
            "Expanding dictionary of {} methods ({}-bit keys)",
            entries.len(),
            key_bits
        );

        for entry in entries {
            let id = bits_to_signed_integer(&entry.key)?;
            self.expand_method(id, entry.value, program)?;
        }

        Ok(())
    }

    fn expand_method(
        &mut self,
        id: MethodId,
        cursor: D::Cursor,
        program: &mut Program,
    ) -> Result<()> {
        let ticket = program.reserve(id, self.config.collision)?;
        debug!("Registered method {}", id);

        let body = self.descend(cursor, program, Some(id))?;
        program.fill(id, ticket, body);
        Ok(())
    }

    fn descend(
        &mut self,
        cursor: D::Cursor,
        program: &mut Program,
        method_id: Option<MethodId>,
    ) -> Result<Vec<Instruction>> {
        if self.depth >= self.config.max_depth {
            return Err(Error::RecursionLimit(self.config.max_depth));
        }

        self.depth += 1;
        let result = self.disassemble_block(cursor, program, method_id);
        self.depth -= 1;
        result
    }
}

/// Disassembles the program rooted at `root` with the default decoders and configuration.
///
/// # Arguments
/// * `root` - The code cell of the program's entry continuation
///
/// # Errors
/// Returns [`crate::Error::InvalidOpcode`] or [`crate::Error::OutOfBounds`] for
/// undecodable code, [`crate::Error::InvalidDictionary`] for malformed jump tables and
/// [`crate::Error::RecursionLimit`] for code nested deeper than the default limit.
///
/// # Examples
///
/// ```rust,no_run
/// use cellscope::{Boc, disassembler::disassemble};
/// use std::path::Path;
///
/// let boc = Boc::from_file(Path::new("contract.boc"))?;
/// if let Some(root) = boc.root() {
///     let program = disassemble(root)?;
///     println!("{}", program.to_json_pretty()?);
/// }
/// # Ok::<(), cellscope::Error>(())
/// ```
pub fn disassemble(root: &Arc<Cell>) -> Result<Program> {
    disassemble_with(
        &Codepage0,
        &HashmapDecoder,
        DisassemblerConfig::default(),
        root.slice(),
    )
}

/// Disassembles the program at `cursor` with explicit collaborators and configuration.
///
/// # Errors
/// See [`disassemble`]; additionally [`crate::Error::DuplicateMethod`] when the
/// configuration rejects method identifier collisions.
pub fn disassemble_with<D, T>(
    decoder: &D,
    dictionaries: &T,
    config: DisassemblerConfig,
    cursor: D::Cursor,
) -> Result<Program>
where
    D: InstructionDecoder,
    T: DictionaryDecoder<D::Cursor>,
{
    Disassembler::new(decoder, dictionaries, config).disassemble_program(cursor)
}
