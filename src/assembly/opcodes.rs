//! Code page 0 encoding table.
//!
//! Every entry is a bit prefix of fixed length followed by a list of operand layouts read
//! in order. Prefixes overlap on purpose (for example `NOP` is the `i = 0` case of
//! `XCHG_0I`), and the decoder resolves them by longest match, so specific forms listed
//! here shadow the generic ones they are a special case of.

use std::{collections::HashMap, sync::OnceLock};

use crate::assembly::InstructionCategory;

/// How one operand is laid out in the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperandLayout {
    /// `bits` unsigned bits, `bias` added to the raw value
    Uint {
        name: &'static str,
        bits: u8,
        bias: i64,
    },
    /// `bits` two's complement bits
    Int { name: &'static str, bits: u8 },
    /// 4-bit small integer in `-5..=10`, values above 10 wrap to negative
    TinyInt { name: &'static str },
    /// 5-bit length `l` followed by `8 * l + 19` signed value bits
    LongInt { name: &'static str },
    /// The next reference of the current cell
    Ref { name: &'static str },
    /// Inline continuation: reference count and byte length, then the body
    Continuation {
        name: &'static str,
        refs_bits: u8,
        bytes_bits: u8,
    },
    /// Inline slice constant padded with a completion tag
    SliceConst {
        name: &'static str,
        refs_bits: u8,
        refs_bias: u8,
        length_bits: u8,
        extra_bits: u8,
    },
    /// Non-empty dictionary root: a presence bit that must be set, then a reference
    Dictionary { name: &'static str },
    /// Length field then `(n + 1)` bytes of payload
    DebugString {
        name: &'static str,
        length_bits: u8,
    },
}

/// One row of the encoding table.
#[derive(Debug)]
pub(crate) struct OpcodeSpec {
    pub mnemonic: &'static str,
    pub prefix: u32,
    pub prefix_bits: u8,
    pub category: InstructionCategory,
    pub operands: &'static [OperandLayout],
}

const fn uint(name: &'static str, bits: u8) -> OperandLayout {
    OperandLayout::Uint {
        name,
        bits,
        bias: 0,
    }
}

const fn plus_one(name: &'static str, bits: u8) -> OperandLayout {
    OperandLayout::Uint { name, bits, bias: 1 }
}

const fn int(name: &'static str, bits: u8) -> OperandLayout {
    OperandLayout::Int { name, bits }
}

const fn reference(name: &'static str) -> OperandLayout {
    OperandLayout::Ref { name }
}

const fn slice_const(
    refs_bits: u8,
    refs_bias: u8,
    length_bits: u8,
    extra_bits: u8,
) -> OperandLayout {
    OperandLayout::SliceConst {
        name: "s",
        refs_bits,
        refs_bias,
        length_bits,
        extra_bits,
    }
}

const fn continuation(refs_bits: u8, bytes_bits: u8) -> OperandLayout {
    OperandLayout::Continuation {
        name: "s",
        refs_bits,
        bytes_bits,
    }
}

macro_rules! op {
    ($mnemonic:literal, $prefix:literal / $bits:literal, $category:ident $(, $layout:expr)* $(,)?) => {
        OpcodeSpec {
            mnemonic: $mnemonic,
            prefix: $prefix,
            prefix_bits: $bits,
            category: InstructionCategory::$category,
            operands: &[$($layout),*],
        }
    };
}

#[rustfmt::skip]
pub(crate) static OPCODES: &[OpcodeSpec] = &[
    // Stack
    op!("NOP", 0x00 / 8, Stack),
    op!("SWAP", 0x01 / 8, Stack),
    op!("XCHG_0I", 0x0 / 4, Stack, uint("i", 4)),
    op!("XCHG_IJ", 0x10 / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("XCHG_0I_LONG", 0x11 / 8, Stack, uint("i", 8)),
    op!("XCHG_1I", 0x1 / 4, Stack, uint("i", 4)),
    op!("DUP", 0x20 / 8, Stack),
    op!("OVER", 0x21 / 8, Stack),
    op!("PUSH", 0x2 / 4, Stack, uint("i", 4)),
    op!("DROP", 0x30 / 8, Stack),
    op!("NIP", 0x31 / 8, Stack),
    op!("POP", 0x3 / 4, Stack, uint("i", 4)),
    op!("XCHG3", 0x4 / 4, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("XCHG2", 0x50 / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("XCPU", 0x51 / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("PUXC", 0x52 / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("PUSH2", 0x53 / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("XCHG3_ALT", 0x540 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("XC2PU", 0x541 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("XCPUXC", 0x542 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("XCPU2", 0x543 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("PUXC2", 0x544 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("PUXCPU", 0x545 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("PU2XC", 0x546 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("PUSH3", 0x547 / 12, Stack, uint("i", 4), uint("j", 4), uint("k", 4)),
    op!("BLKSWAP", 0x55 / 8, Stack, plus_one("i", 4), plus_one("j", 4)),
    op!("PUSH_LONG", 0x56 / 8, Stack, uint("i", 8)),
    op!("POP_LONG", 0x57 / 8, Stack, uint("i", 8)),
    op!("ROT", 0x58 / 8, Stack),
    op!("ROTREV", 0x59 / 8, Stack),
    op!("SWAP2", 0x5A / 8, Stack),
    op!("DROP2", 0x5B / 8, Stack),
    op!("DUP2", 0x5C / 8, Stack),
    op!("OVER2", 0x5D / 8, Stack),
    op!("REVERSE", 0x5E / 8, Stack, OperandLayout::Uint { name: "i", bits: 4, bias: 2 }, uint("j", 4)),
    op!("BLKDROP", 0x5F0 / 12, Stack, uint("i", 4)),
    op!("BLKPUSH", 0x5F / 8, Stack, uint("i", 4), uint("j", 4)),
    op!("PICK", 0x60 / 8, Stack),
    op!("ROLLX", 0x61 / 8, Stack),
    op!("ROLLREVX", 0x62 / 8, Stack),
    op!("BLKSWX", 0x63 / 8, Stack),
    op!("REVX", 0x64 / 8, Stack),
    op!("DROPX", 0x65 / 8, Stack),
    op!("TUCK", 0x66 / 8, Stack),
    op!("XCHGX", 0x67 / 8, Stack),
    op!("DEPTH", 0x68 / 8, Stack),
    op!("CHKDEPTH", 0x69 / 8, Stack),
    op!("ONLYTOPX", 0x6A / 8, Stack),
    op!("ONLYX", 0x6B / 8, Stack),
    op!("BLKDROP2", 0x6C / 8, Stack, uint("i", 4), uint("j", 4)),

    // Tuples and null
    op!("NULL", 0x6D / 8, Tuple),
    op!("ISNULL", 0x6E / 8, Tuple),
    op!("TUPLE", 0x6F0 / 12, Tuple, uint("n", 4)),
    op!("INDEX", 0x6F1 / 12, Tuple, uint("k", 4)),
    op!("UNTUPLE", 0x6F2 / 12, Tuple, uint("n", 4)),
    op!("UNPACKFIRST", 0x6F3 / 12, Tuple, uint("k", 4)),
    op!("EXPLODE", 0x6F4 / 12, Tuple, uint("n", 4)),
    op!("SETINDEX", 0x6F5 / 12, Tuple, uint("k", 4)),
    op!("INDEXQ", 0x6F6 / 12, Tuple, uint("k", 4)),
    op!("SETINDEXQ", 0x6F7 / 12, Tuple, uint("k", 4)),
    op!("TUPLEVAR", 0x6F80 / 16, Tuple),
    op!("INDEXVAR", 0x6F81 / 16, Tuple),
    op!("UNTUPLEVAR", 0x6F82 / 16, Tuple),
    op!("UNPACKFIRSTVAR", 0x6F83 / 16, Tuple),
    op!("EXPLODEVAR", 0x6F84 / 16, Tuple),
    op!("SETINDEXVAR", 0x6F85 / 16, Tuple),
    op!("INDEXVARQ", 0x6F86 / 16, Tuple),
    op!("SETINDEXVARQ", 0x6F87 / 16, Tuple),
    op!("TLEN", 0x6F88 / 16, Tuple),
    op!("QTLEN", 0x6F89 / 16, Tuple),
    op!("ISTUPLE", 0x6F8A / 16, Tuple),
    op!("LAST", 0x6F8B / 16, Tuple),
    op!("TPUSH", 0x6F8C / 16, Tuple),
    op!("TPOP", 0x6F8D / 16, Tuple),
    op!("NULLSWAPIF", 0x6FA0 / 16, Tuple),
    op!("NULLSWAPIFNOT", 0x6FA1 / 16, Tuple),
    op!("NULLROTRIF", 0x6FA2 / 16, Tuple),
    op!("NULLROTRIFNOT", 0x6FA3 / 16, Tuple),
    op!("NULLSWAPIF2", 0x6FA4 / 16, Tuple),
    op!("NULLSWAPIFNOT2", 0x6FA5 / 16, Tuple),
    op!("NULLROTRIF2", 0x6FA6 / 16, Tuple),
    op!("NULLROTRIFNOT2", 0x6FA7 / 16, Tuple),
    op!("INDEX2", 0x6FB / 12, Tuple, uint("i", 2), uint("j", 2)),
    op!("INDEX3", 0x1BF / 10, Tuple, uint("i", 2), uint("j", 2), uint("k", 2)),

    // Constants
    op!("PUSHINT_4", 0x7 / 4, Constant, OperandLayout::TinyInt { name: "x" }),
    op!("PUSHINT_8", 0x80 / 8, Constant, int("x", 8)),
    op!("PUSHINT_16", 0x81 / 8, Constant, int("x", 16)),
    op!("PUSHINT_LONG", 0x82 / 8, Constant, OperandLayout::LongInt { name: "x" }),
    op!("PUSHPOW2", 0x83 / 8, Constant, plus_one("x", 8)),
    op!("PUSHNAN", 0x83FF / 16, Constant),
    op!("PUSHPOW2DEC", 0x84 / 8, Constant, plus_one("x", 8)),
    op!("PUSHNEGPOW2", 0x85 / 8, Constant, plus_one("x", 8)),
    op!("PUSHREF", 0x88 / 8, Constant, reference("c")),
    op!("PUSHREFSLICE", 0x89 / 8, Constant, reference("c")),
    op!("PUSHREFCONT", 0x8A / 8, Constant, reference("c")),
    op!("PUSHSLICE", 0x8B / 8, Constant, slice_const(0, 0, 4, 4)),
    op!("PUSHSLICE_REFS", 0x8C / 8, Constant, slice_const(2, 1, 5, 1)),
    op!("PUSHSLICE_LONG", 0x8D / 8, Constant, slice_const(3, 0, 7, 6)),
    op!("PUSHCONT", 0x47 / 7, Constant, continuation(2, 7)),
    op!("PUSHCONT_SHORT", 0x9 / 4, Constant, continuation(0, 4)),

    // Arithmetic
    op!("ADD", 0xA0 / 8, Arithmetic),
    op!("SUB", 0xA1 / 8, Arithmetic),
    op!("SUBR", 0xA2 / 8, Arithmetic),
    op!("NEGATE", 0xA3 / 8, Arithmetic),
    op!("INC", 0xA4 / 8, Arithmetic),
    op!("DEC", 0xA5 / 8, Arithmetic),
    op!("ADDCONST", 0xA6 / 8, Arithmetic, int("x", 8)),
    op!("MULCONST", 0xA7 / 8, Arithmetic, int("x", 8)),
    op!("MUL", 0xA8 / 8, Arithmetic),
    op!("ADDDIVMOD", 0xA900 / 16, Arithmetic),
    op!("ADDDIVMODR", 0xA901 / 16, Arithmetic),
    op!("ADDDIVMODC", 0xA902 / 16, Arithmetic),
    op!("DIV", 0xA904 / 16, Arithmetic),
    op!("DIVR", 0xA905 / 16, Arithmetic),
    op!("DIVC", 0xA906 / 16, Arithmetic),
    op!("MOD", 0xA908 / 16, Arithmetic),
    op!("MODR", 0xA909 / 16, Arithmetic),
    op!("MODC", 0xA90A / 16, Arithmetic),
    op!("DIVMOD", 0xA90C / 16, Arithmetic),
    op!("DIVMODR", 0xA90D / 16, Arithmetic),
    op!("DIVMODC", 0xA90E / 16, Arithmetic),
    op!("ADDRSHIFTMOD", 0xA920 / 16, Arithmetic),
    op!("ADDRSHIFTMODR", 0xA921 / 16, Arithmetic),
    op!("ADDRSHIFTMODC", 0xA922 / 16, Arithmetic),
    op!("RSHIFTR", 0xA925 / 16, Arithmetic),
    op!("RSHIFTC", 0xA926 / 16, Arithmetic),
    op!("MODPOW2", 0xA928 / 16, Arithmetic),
    op!("MODPOW2R", 0xA929 / 16, Arithmetic),
    op!("MODPOW2C", 0xA92A / 16, Arithmetic),
    op!("RSHIFTMOD", 0xA92C / 16, Arithmetic),
    op!("RSHIFTMODR", 0xA92D / 16, Arithmetic),
    op!("RSHIFTMODC", 0xA92E / 16, Arithmetic),
    op!("ADDRSHIFTMOD_CONST", 0xA930 / 16, Arithmetic, plus_one("t", 8)),
    op!("ADDRSHIFTMODR_CONST", 0xA931 / 16, Arithmetic, plus_one("t", 8)),
    op!("ADDRSHIFTMODC_CONST", 0xA932 / 16, Arithmetic, plus_one("t", 8)),
    op!("RSHIFTR_CONST", 0xA935 / 16, Arithmetic, plus_one("t", 8)),
    op!("RSHIFTC_CONST", 0xA936 / 16, Arithmetic, plus_one("t", 8)),
    op!("MODPOW2_CONST", 0xA938 / 16, Arithmetic, plus_one("t", 8)),
    op!("MODPOW2R_CONST", 0xA939 / 16, Arithmetic, plus_one("t", 8)),
    op!("MODPOW2C_CONST", 0xA93A / 16, Arithmetic, plus_one("t", 8)),
    op!("RSHIFTMOD_CONST", 0xA93C / 16, Arithmetic, plus_one("t", 8)),
    op!("RSHIFTRMOD_CONST", 0xA93D / 16, Arithmetic, plus_one("t", 8)),
    op!("RSHIFTCMOD_CONST", 0xA93E / 16, Arithmetic, plus_one("t", 8)),
    op!("MULADDDIVMOD", 0xA980 / 16, Arithmetic),
    op!("MULADDDIVMODR", 0xA981 / 16, Arithmetic),
    op!("MULADDDIVMODC", 0xA982 / 16, Arithmetic),
    op!("MULDIV", 0xA984 / 16, Arithmetic),
    op!("MULDIVR", 0xA985 / 16, Arithmetic),
    op!("MULDIVC", 0xA986 / 16, Arithmetic),
    op!("MULMOD", 0xA988 / 16, Arithmetic),
    op!("MULMODR", 0xA989 / 16, Arithmetic),
    op!("MULMODC", 0xA98A / 16, Arithmetic),
    op!("MULDIVMOD", 0xA98C / 16, Arithmetic),
    op!("MULDIVMODR", 0xA98D / 16, Arithmetic),
    op!("MULDIVMODC", 0xA98E / 16, Arithmetic),
    op!("MULADDRSHIFTMOD", 0xA9A0 / 16, Arithmetic),
    op!("MULADDRSHIFTRMOD", 0xA9A1 / 16, Arithmetic),
    op!("MULADDRSHIFTCMOD", 0xA9A2 / 16, Arithmetic),
    op!("MULRSHIFT", 0xA9A4 / 16, Arithmetic),
    op!("MULRSHIFTR", 0xA9A5 / 16, Arithmetic),
    op!("MULRSHIFTC", 0xA9A6 / 16, Arithmetic),
    op!("MULMODPOW2", 0xA9A8 / 16, Arithmetic),
    op!("MULMODPOW2R", 0xA9A9 / 16, Arithmetic),
    op!("MULMODPOW2C", 0xA9AA / 16, Arithmetic),
    op!("MULRSHIFTMOD", 0xA9AC / 16, Arithmetic),
    op!("MULRSHIFTRMOD", 0xA9AD / 16, Arithmetic),
    op!("MULRSHIFTCMOD", 0xA9AE / 16, Arithmetic),
    op!("MULADDRSHIFTMOD_CONST", 0xA9B0 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULADDRSHIFTRMOD_CONST", 0xA9B1 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULADDRSHIFTCMOD_CONST", 0xA9B2 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFT_CONST", 0xA9B4 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFTR_CONST", 0xA9B5 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFTC_CONST", 0xA9B6 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULMODPOW2_CONST", 0xA9B8 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULMODPOW2R_CONST", 0xA9B9 / 16, Arithmetic, plus_one("t", 8)),
    op!("MULMODPOW2C_CONST", 0xA9BA / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFTMOD_CONST", 0xA9BC / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFTRMOD_CONST", 0xA9BD / 16, Arithmetic, plus_one("t", 8)),
    op!("MULRSHIFTCMOD_CONST", 0xA9BE / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTADDDIVMOD", 0xA9C0 / 16, Arithmetic),
    op!("LSHIFTADDDIVMODR", 0xA9C1 / 16, Arithmetic),
    op!("LSHIFTADDDIVMODC", 0xA9C2 / 16, Arithmetic),
    op!("LSHIFTDIV", 0xA9C4 / 16, Arithmetic),
    op!("LSHIFTDIVR", 0xA9C5 / 16, Arithmetic),
    op!("LSHIFTDIVC", 0xA9C6 / 16, Arithmetic),
    op!("LSHIFTMOD", 0xA9C8 / 16, Arithmetic),
    op!("LSHIFTMODR", 0xA9C9 / 16, Arithmetic),
    op!("LSHIFTMODC", 0xA9CA / 16, Arithmetic),
    op!("LSHIFTDIVMOD", 0xA9CC / 16, Arithmetic),
    op!("LSHIFTDIVMODR", 0xA9CD / 16, Arithmetic),
    op!("LSHIFTDIVMODC", 0xA9CE / 16, Arithmetic),
    op!("LSHIFTADDDIVMOD_CONST", 0xA9D0 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTADDDIVMODR_CONST", 0xA9D1 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTADDDIVMODC_CONST", 0xA9D2 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIV_CONST", 0xA9D4 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIVR_CONST", 0xA9D5 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIVC_CONST", 0xA9D6 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTMOD_CONST", 0xA9D8 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTMODR_CONST", 0xA9D9 / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTMODC_CONST", 0xA9DA / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIVMOD_CONST", 0xA9DC / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIVMODR_CONST", 0xA9DD / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFTDIVMODC_CONST", 0xA9DE / 16, Arithmetic, plus_one("t", 8)),
    op!("LSHIFT_CONST", 0xAA / 8, Arithmetic, plus_one("x", 8)),
    op!("RSHIFT_CONST", 0xAB / 8, Arithmetic, plus_one("x", 8)),
    op!("LSHIFT", 0xAC / 8, Arithmetic),
    op!("RSHIFT", 0xAD / 8, Arithmetic),
    op!("POW2", 0xAE / 8, Arithmetic),
    op!("AND", 0xB0 / 8, Arithmetic),
    op!("OR", 0xB1 / 8, Arithmetic),
    op!("XOR", 0xB2 / 8, Arithmetic),
    op!("NOT", 0xB3 / 8, Arithmetic),
    op!("FITS", 0xB4 / 8, Arithmetic, plus_one("x", 8)),
    op!("UFITS", 0xB5 / 8, Arithmetic, plus_one("x", 8)),
    op!("FITSX", 0xB600 / 16, Arithmetic),
    op!("UFITSX", 0xB601 / 16, Arithmetic),
    op!("BITSIZE", 0xB602 / 16, Arithmetic),
    op!("UBITSIZE", 0xB603 / 16, Arithmetic),
    op!("MIN", 0xB608 / 16, Arithmetic),
    op!("MAX", 0xB609 / 16, Arithmetic),
    op!("MINMAX", 0xB60A / 16, Arithmetic),
    op!("ABS", 0xB60B / 16, Arithmetic),
    op!("QADD", 0xB7A0 / 16, Arithmetic),
    op!("QSUB", 0xB7A1 / 16, Arithmetic),
    op!("QSUBR", 0xB7A2 / 16, Arithmetic),
    op!("QNEGATE", 0xB7A3 / 16, Arithmetic),
    op!("QINC", 0xB7A4 / 16, Arithmetic),
    op!("QDEC", 0xB7A5 / 16, Arithmetic),
    op!("QADDCONST", 0xB7A6 / 16, Arithmetic, int("x", 8)),
    op!("QMULCONST", 0xB7A7 / 16, Arithmetic, int("x", 8)),
    op!("QMUL", 0xB7A8 / 16, Arithmetic),
    op!("QDIV", 0xB7A904 / 24, Arithmetic),
    op!("QDIVR", 0xB7A905 / 24, Arithmetic),
    op!("QDIVC", 0xB7A906 / 24, Arithmetic),
    op!("QMOD", 0xB7A908 / 24, Arithmetic),
    op!("QDIVMOD", 0xB7A90C / 24, Arithmetic),
    op!("QDIVMODR", 0xB7A90D / 24, Arithmetic),
    op!("QDIVMODC", 0xB7A90E / 24, Arithmetic),
    op!("QMULDIVR", 0xB7A985 / 24, Arithmetic),
    op!("QMULDIVMOD", 0xB7A98C / 24, Arithmetic),
    op!("QLSHIFT", 0xB7AC / 16, Arithmetic),
    op!("QRSHIFT", 0xB7AD / 16, Arithmetic),
    op!("QPOW2", 0xB7AE / 16, Arithmetic),
    op!("QAND", 0xB7B0 / 16, Arithmetic),
    op!("QOR", 0xB7B1 / 16, Arithmetic),
    op!("QXOR", 0xB7B2 / 16, Arithmetic),
    op!("QNOT", 0xB7B3 / 16, Arithmetic),
    op!("QFITS", 0xB7B4 / 16, Arithmetic, plus_one("x", 8)),
    op!("QUFITS", 0xB7B5 / 16, Arithmetic, plus_one("x", 8)),
    op!("QFITSX", 0xB7B600 / 24, Arithmetic),
    op!("QUFITSX", 0xB7B601 / 24, Arithmetic),

    // Comparison
    op!("SGN", 0xB8 / 8, Comparison),
    op!("LESS", 0xB9 / 8, Comparison),
    op!("EQUAL", 0xBA / 8, Comparison),
    op!("LEQ", 0xBB / 8, Comparison),
    op!("GREATER", 0xBC / 8, Comparison),
    op!("NEQ", 0xBD / 8, Comparison),
    op!("GEQ", 0xBE / 8, Comparison),
    op!("CMP", 0xBF / 8, Comparison),
    op!("EQINT", 0xC0 / 8, Comparison, int("x", 8)),
    op!("LESSINT", 0xC1 / 8, Comparison, int("x", 8)),
    op!("GTINT", 0xC2 / 8, Comparison, int("x", 8)),
    op!("NEQINT", 0xC3 / 8, Comparison, int("x", 8)),
    op!("ISNAN", 0xC4 / 8, Comparison),
    op!("CHKNAN", 0xC5 / 8, Comparison),
    op!("QSGN", 0xB7B8 / 16, Comparison),
    op!("QLESS", 0xB7B9 / 16, Comparison),
    op!("QEQUAL", 0xB7BA / 16, Comparison),
    op!("QLEQ", 0xB7BB / 16, Comparison),
    op!("QGREATER", 0xB7BC / 16, Comparison),
    op!("QNEQ", 0xB7BD / 16, Comparison),
    op!("QGEQ", 0xB7BE / 16, Comparison),
    op!("QCMP", 0xB7BF / 16, Comparison),
    op!("QEQINT", 0xB7C0 / 16, Comparison, int("x", 8)),
    op!("QLESSINT", 0xB7C1 / 16, Comparison, int("x", 8)),
    op!("QGTINT", 0xB7C2 / 16, Comparison, int("x", 8)),
    op!("QNEQINT", 0xB7C3 / 16, Comparison, int("x", 8)),
    op!("SEMPTY", 0xC700 / 16, Comparison),
    op!("SDEMPTY", 0xC701 / 16, Comparison),
    op!("SREMPTY", 0xC702 / 16, Comparison),
    op!("SDFIRST", 0xC703 / 16, Comparison),
    op!("SDLEXCMP", 0xC704 / 16, Comparison),
    op!("SDEQ", 0xC705 / 16, Comparison),
    op!("SDPFX", 0xC708 / 16, Comparison),
    op!("SDPFXREV", 0xC709 / 16, Comparison),
    op!("SDPPFX", 0xC70A / 16, Comparison),
    op!("SDPPFXREV", 0xC70B / 16, Comparison),
    op!("SDSFX", 0xC70C / 16, Comparison),
    op!("SDSFXREV", 0xC70D / 16, Comparison),
    op!("SDPSFX", 0xC70E / 16, Comparison),
    op!("SDPSFXREV", 0xC70F / 16, Comparison),
    op!("SDCNTLEAD0", 0xC710 / 16, Comparison),
    op!("SDCNTLEAD1", 0xC711 / 16, Comparison),
    op!("SDCNTTRAIL0", 0xC712 / 16, Comparison),
    op!("SDCNTTRAIL1", 0xC713 / 16, Comparison),

    // Cell building
    op!("NEWC", 0xC8 / 8, CellBuild),
    op!("ENDC", 0xC9 / 8, CellBuild),
    op!("STI", 0xCA / 8, CellBuild, plus_one("c", 8)),
    op!("STU", 0xCB / 8, CellBuild, plus_one("c", 8)),
    op!("STREF", 0xCC / 8, CellBuild),
    op!("STBREFR", 0xCD / 8, CellBuild),
    op!("STSLICE", 0xCE / 8, CellBuild),
    op!("STIX", 0xCF00 / 16, CellBuild),
    op!("STUX", 0xCF01 / 16, CellBuild),
    op!("STIXR", 0xCF02 / 16, CellBuild),
    op!("STUXR", 0xCF03 / 16, CellBuild),
    op!("STIXQ", 0xCF04 / 16, CellBuild),
    op!("STUXQ", 0xCF05 / 16, CellBuild),
    op!("STIXRQ", 0xCF06 / 16, CellBuild),
    op!("STUXRQ", 0xCF07 / 16, CellBuild),
    op!("STI_ALT", 0xCF08 / 16, CellBuild, plus_one("c", 8)),
    op!("STU_ALT", 0xCF09 / 16, CellBuild, plus_one("c", 8)),
    op!("STIR", 0xCF0A / 16, CellBuild, plus_one("c", 8)),
    op!("STUR", 0xCF0B / 16, CellBuild, plus_one("c", 8)),
    op!("STIQ", 0xCF0C / 16, CellBuild, plus_one("c", 8)),
    op!("STUQ", 0xCF0D / 16, CellBuild, plus_one("c", 8)),
    op!("STIRQ", 0xCF0E / 16, CellBuild, plus_one("c", 8)),
    op!("STURQ", 0xCF0F / 16, CellBuild, plus_one("c", 8)),
    op!("STREF_ALT", 0xCF10 / 16, CellBuild),
    op!("STBREF", 0xCF11 / 16, CellBuild),
    op!("STSLICE_ALT", 0xCF12 / 16, CellBuild),
    op!("STB", 0xCF13 / 16, CellBuild),
    op!("STREFR", 0xCF14 / 16, CellBuild),
    op!("STBREFR_ALT", 0xCF15 / 16, CellBuild),
    op!("STSLICER", 0xCF16 / 16, CellBuild),
    op!("STBR", 0xCF17 / 16, CellBuild),
    op!("STREFQ", 0xCF18 / 16, CellBuild),
    op!("STBREFQ", 0xCF19 / 16, CellBuild),
    op!("STSLICEQ", 0xCF1A / 16, CellBuild),
    op!("STBQ", 0xCF1B / 16, CellBuild),
    op!("STREFRQ", 0xCF1C / 16, CellBuild),
    op!("STBREFRQ", 0xCF1D / 16, CellBuild),
    op!("STSLICERQ", 0xCF1E / 16, CellBuild),
    op!("STBRQ", 0xCF1F / 16, CellBuild),
    op!("STREFCONST", 0xCF20 / 16, CellBuild, reference("c")),
    op!("STREF2CONST", 0xCF21 / 16, CellBuild, reference("c1"), reference("c2")),
    op!("ENDXC", 0xCF23 / 16, CellBuild),
    op!("STILE4", 0xCF28 / 16, CellBuild),
    op!("STULE4", 0xCF29 / 16, CellBuild),
    op!("STILE8", 0xCF2A / 16, CellBuild),
    op!("STULE8", 0xCF2B / 16, CellBuild),
    op!("BDEPTH", 0xCF30 / 16, CellBuild),
    op!("BBITS", 0xCF31 / 16, CellBuild),
    op!("BREFS", 0xCF32 / 16, CellBuild),
    op!("BBITREFS", 0xCF33 / 16, CellBuild),
    op!("BREMBITS", 0xCF35 / 16, CellBuild),
    op!("BREMREFS", 0xCF36 / 16, CellBuild),
    op!("BREMBITREFS", 0xCF37 / 16, CellBuild),
    op!("BCHKBITS_CONST", 0xCF38 / 16, CellBuild, plus_one("c", 8)),
    op!("BCHKBITS", 0xCF39 / 16, CellBuild),
    op!("BCHKREFS", 0xCF3A / 16, CellBuild),
    op!("BCHKBITREFS", 0xCF3B / 16, CellBuild),
    op!("BCHKBITSQ_CONST", 0xCF3C / 16, CellBuild, plus_one("c", 8)),
    op!("BCHKBITSQ", 0xCF3D / 16, CellBuild),
    op!("BCHKREFSQ", 0xCF3E / 16, CellBuild),
    op!("BCHKBITREFSQ", 0xCF3F / 16, CellBuild),
    op!("STZEROES", 0xCF40 / 16, CellBuild),
    op!("STONES", 0xCF41 / 16, CellBuild),
    op!("STSAME", 0xCF42 / 16, CellBuild),
    op!("STZERO", 0xCF81 / 16, CellBuild),
    op!("STONE", 0xCF83 / 16, CellBuild),
    op!("STSLICECONST", 0x19F / 9, CellBuild, slice_const(2, 0, 3, 2)),

    // Cell parsing
    op!("CTOS", 0xD0 / 8, CellParse),
    op!("ENDS", 0xD1 / 8, CellParse),
    op!("LDI", 0xD2 / 8, CellParse, plus_one("c", 8)),
    op!("LDU", 0xD3 / 8, CellParse, plus_one("c", 8)),
    op!("LDREF", 0xD4 / 8, CellParse),
    op!("LDREFRTOS", 0xD5 / 8, CellParse),
    op!("LDSLICE", 0xD6 / 8, CellParse, plus_one("c", 8)),
    op!("LDIX", 0xD700 / 16, CellParse),
    op!("LDUX", 0xD701 / 16, CellParse),
    op!("PLDIX", 0xD702 / 16, CellParse),
    op!("PLDUX", 0xD703 / 16, CellParse),
    op!("LDIXQ", 0xD704 / 16, CellParse),
    op!("LDUXQ", 0xD705 / 16, CellParse),
    op!("PLDIXQ", 0xD706 / 16, CellParse),
    op!("PLDUXQ", 0xD707 / 16, CellParse),
    op!("LDI_ALT", 0xD708 / 16, CellParse, plus_one("c", 8)),
    op!("LDU_ALT", 0xD709 / 16, CellParse, plus_one("c", 8)),
    op!("PLDI", 0xD70A / 16, CellParse, plus_one("c", 8)),
    op!("PLDU", 0xD70B / 16, CellParse, plus_one("c", 8)),
    op!("LDIQ", 0xD70C / 16, CellParse, plus_one("c", 8)),
    op!("LDUQ", 0xD70D / 16, CellParse, plus_one("c", 8)),
    op!("PLDIQ", 0xD70E / 16, CellParse, plus_one("c", 8)),
    op!("PLDUQ", 0xD70F / 16, CellParse, plus_one("c", 8)),
    op!("PLDUZ", 0x1AE2 / 13, CellParse, uint("c", 3)),
    op!("LDSLICEX", 0xD718 / 16, CellParse),
    op!("PLDSLICEX", 0xD719 / 16, CellParse),
    op!("LDSLICEXQ", 0xD71A / 16, CellParse),
    op!("PLDSLICEXQ", 0xD71B / 16, CellParse),
    op!("LDSLICE_ALT", 0xD71C / 16, CellParse, plus_one("c", 8)),
    op!("PLDSLICE", 0xD71D / 16, CellParse, plus_one("c", 8)),
    op!("LDSLICEQ", 0xD71E / 16, CellParse, plus_one("c", 8)),
    op!("PLDSLICEQ", 0xD71F / 16, CellParse, plus_one("c", 8)),
    op!("SDCUTFIRST", 0xD720 / 16, CellParse),
    op!("SDSKIPFIRST", 0xD721 / 16, CellParse),
    op!("SDCUTLAST", 0xD722 / 16, CellParse),
    op!("SDSKIPLAST", 0xD723 / 16, CellParse),
    op!("SDSUBSTR", 0xD724 / 16, CellParse),
    op!("SDBEGINSX", 0xD726 / 16, CellParse),
    op!("SDBEGINSXQ", 0xD727 / 16, CellParse),
    op!("SDBEGINS", 0x35CA / 14, CellParse, slice_const(0, 0, 7, 3)),
    op!("SDBEGINSQ", 0x35CB / 14, CellParse, slice_const(0, 0, 7, 3)),
    op!("SCUTFIRST", 0xD730 / 16, CellParse),
    op!("SSKIPFIRST", 0xD731 / 16, CellParse),
    op!("SCUTLAST", 0xD732 / 16, CellParse),
    op!("SSKIPLAST", 0xD733 / 16, CellParse),
    op!("SUBSLICE", 0xD734 / 16, CellParse),
    op!("SPLIT", 0xD736 / 16, CellParse),
    op!("SPLITQ", 0xD737 / 16, CellParse),
    op!("XCTOS", 0xD739 / 16, CellParse),
    op!("XLOAD", 0xD73A / 16, CellParse),
    op!("XLOADQ", 0xD73B / 16, CellParse),
    op!("SCHKBITS", 0xD741 / 16, CellParse),
    op!("SCHKREFS", 0xD742 / 16, CellParse),
    op!("SCHKBITREFS", 0xD743 / 16, CellParse),
    op!("SCHKBITSQ", 0xD745 / 16, CellParse),
    op!("SCHKREFSQ", 0xD746 / 16, CellParse),
    op!("SCHKBITREFSQ", 0xD747 / 16, CellParse),
    op!("PLDREFVAR", 0xD748 / 16, CellParse),
    op!("SBITS", 0xD749 / 16, CellParse),
    op!("SREFS", 0xD74A / 16, CellParse),
    op!("SBITREFS", 0xD74B / 16, CellParse),
    op!("PLDREF", 0xD74C / 16, CellParse),
    op!("PLDREFIDX", 0x35D3 / 14, CellParse, uint("n", 2)),
    op!("LDILE4", 0xD750 / 16, CellParse),
    op!("LDULE4", 0xD751 / 16, CellParse),
    op!("LDILE8", 0xD752 / 16, CellParse),
    op!("LDULE8", 0xD753 / 16, CellParse),
    op!("PLDILE4", 0xD754 / 16, CellParse),
    op!("PLDULE4", 0xD755 / 16, CellParse),
    op!("PLDILE8", 0xD756 / 16, CellParse),
    op!("PLDULE8", 0xD757 / 16, CellParse),
    op!("LDILE4Q", 0xD758 / 16, CellParse),
    op!("LDULE4Q", 0xD759 / 16, CellParse),
    op!("LDILE8Q", 0xD75A / 16, CellParse),
    op!("LDULE8Q", 0xD75B / 16, CellParse),
    op!("PLDILE4Q", 0xD75C / 16, CellParse),
    op!("PLDULE4Q", 0xD75D / 16, CellParse),
    op!("PLDILE8Q", 0xD75E / 16, CellParse),
    op!("PLDULE8Q", 0xD75F / 16, CellParse),
    op!("LDZEROES", 0xD760 / 16, CellParse),
    op!("LDONES", 0xD761 / 16, CellParse),
    op!("LDSAME", 0xD762 / 16, CellParse),
    op!("SDEPTH", 0xD764 / 16, CellParse),
    op!("CDEPTH", 0xD765 / 16, CellParse),

    // Continuations and control flow
    op!("EXECUTE", 0xD8 / 8, Continuation),
    op!("JMPX", 0xD9 / 8, Continuation),
    op!("CALLXARGS", 0xDA / 8, Continuation, uint("p", 4), uint("r", 4)),
    op!("CALLXARGS_VAR", 0xDB0 / 12, Continuation, uint("p", 4)),
    op!("JMPXARGS", 0xDB1 / 12, Continuation, uint("p", 4)),
    op!("RETARGS", 0xDB2 / 12, Continuation, uint("r", 4)),
    op!("RET", 0xDB30 / 16, Continuation),
    op!("RETALT", 0xDB31 / 16, Continuation),
    op!("BRANCH", 0xDB32 / 16, Continuation),
    op!("CALLCC", 0xDB34 / 16, Continuation),
    op!("JMPXDATA", 0xDB35 / 16, Continuation),
    op!("CALLCCARGS", 0xDB36 / 16, Continuation, uint("p", 4), uint("r", 4)),
    op!("CALLXVARARGS", 0xDB38 / 16, Continuation),
    op!("RETVARARGS", 0xDB39 / 16, Continuation),
    op!("JMPXVARARGS", 0xDB3A / 16, Continuation),
    op!("CALLCCVARARGS", 0xDB3B / 16, Continuation),
    op!("CALLREF", 0xDB3C / 16, Continuation, reference("c")),
    op!("JMPREF", 0xDB3D / 16, Continuation, reference("c")),
    op!("JMPREFDATA", 0xDB3E / 16, Continuation, reference("c")),
    op!("RETDATA", 0xDB3F / 16, Continuation),
    op!("RUNVM", 0xDB4 / 12, Continuation, uint("flags", 12)),
    op!("RUNVMX", 0xDB50 / 16, Continuation),
    op!("IFRET", 0xDC / 8, Continuation),
    op!("IFNOTRET", 0xDD / 8, Continuation),
    op!("IF", 0xDE / 8, Continuation),
    op!("IFNOT", 0xDF / 8, Continuation),
    op!("IFJMP", 0xE0 / 8, Continuation),
    op!("IFNOTJMP", 0xE1 / 8, Continuation),
    op!("IFELSE", 0xE2 / 8, Continuation),
    op!("IFREF", 0xE300 / 16, Continuation, reference("c")),
    op!("IFNOTREF", 0xE301 / 16, Continuation, reference("c")),
    op!("IFJMPREF", 0xE302 / 16, Continuation, reference("c")),
    op!("IFNOTJMPREF", 0xE303 / 16, Continuation, reference("c")),
    op!("CONDSEL", 0xE304 / 16, Continuation),
    op!("CONDSELCHK", 0xE305 / 16, Continuation),
    op!("IFRETALT", 0xE308 / 16, Continuation),
    op!("IFNOTRETALT", 0xE309 / 16, Continuation),
    op!("IFREFELSE", 0xE30D / 16, Continuation, reference("c")),
    op!("IFELSEREF", 0xE30E / 16, Continuation, reference("c")),
    op!("IFREFELSEREF", 0xE30F / 16, Continuation, reference("c1"), reference("c2")),
    op!("REPEATBRK", 0xE314 / 16, Continuation),
    op!("REPEATENDBRK", 0xE315 / 16, Continuation),
    op!("UNTILBRK", 0xE316 / 16, Continuation),
    op!("UNTILENDBRK", 0xE317 / 16, Continuation),
    op!("WHILEBRK", 0xE318 / 16, Continuation),
    op!("WHILEENDBRK", 0xE319 / 16, Continuation),
    op!("AGAINBRK", 0xE31A / 16, Continuation),
    op!("AGAINENDBRK", 0xE31B / 16, Continuation),
    op!("IFBITJMP", 0x71C / 11, Continuation, uint("n", 5)),
    op!("IFNBITJMP", 0x71D / 11, Continuation, uint("n", 5)),
    op!("IFBITJMPREF", 0x71E / 11, Continuation, uint("n", 5), reference("c")),
    op!("IFNBITJMPREF", 0x71F / 11, Continuation, uint("n", 5), reference("c")),
    op!("REPEAT", 0xE4 / 8, Continuation),
    op!("REPEATEND", 0xE5 / 8, Continuation),
    op!("UNTIL", 0xE6 / 8, Continuation),
    op!("UNTILEND", 0xE7 / 8, Continuation),
    op!("WHILE", 0xE8 / 8, Continuation),
    op!("WHILEEND", 0xE9 / 8, Continuation),
    op!("AGAIN", 0xEA / 8, Continuation),
    op!("AGAINEND", 0xEB / 8, Continuation),
    op!("SETCONTARGS", 0xEC / 8, Continuation, uint("r", 4), uint("n", 4)),
    op!("RETURNARGS", 0xED0 / 12, Continuation, uint("p", 4)),
    op!("RETURNVARARGS", 0xED10 / 16, Continuation),
    op!("SETCONTVARARGS", 0xED11 / 16, Continuation),
    op!("SETNUMVARARGS", 0xED12 / 16, Continuation),
    op!("BLESS", 0xED1E / 16, Continuation),
    op!("BLESSVARARGS", 0xED1F / 16, Continuation),
    op!("PUSHCTR", 0xED4 / 12, Continuation, uint("i", 4)),
    op!("POPCTR", 0xED5 / 12, Continuation, uint("i", 4)),
    op!("SETCONTCTR", 0xED6 / 12, Continuation, uint("i", 4)),
    op!("SETRETCTR", 0xED7 / 12, Continuation, uint("i", 4)),
    op!("SETALTCTR", 0xED8 / 12, Continuation, uint("i", 4)),
    op!("POPSAVE", 0xED9 / 12, Continuation, uint("i", 4)),
    op!("SAVECTR", 0xEDA / 12, Continuation, uint("i", 4)),
    op!("SAVEALTCTR", 0xEDB / 12, Continuation, uint("i", 4)),
    op!("SAVEBOTHCTR", 0xEDC / 12, Continuation, uint("i", 4)),
    op!("PUSHCTRX", 0xEDE0 / 16, Continuation),
    op!("POPCTRX", 0xEDE1 / 16, Continuation),
    op!("SETCONTCTRX", 0xEDE2 / 16, Continuation),
    op!("SETCONTCTRMANY", 0xEDE3 / 16, Continuation, uint("x", 8)),
    op!("SETCONTCTRMANYX", 0xEDE4 / 16, Continuation),
    op!("COMPOS", 0xEDF0 / 16, Continuation),
    op!("COMPOSALT", 0xEDF1 / 16, Continuation),
    op!("COMPOSBOTH", 0xEDF2 / 16, Continuation),
    op!("ATEXIT", 0xEDF3 / 16, Continuation),
    op!("ATEXITALT", 0xEDF4 / 16, Continuation),
    op!("SETEXITALT", 0xEDF5 / 16, Continuation),
    op!("THENRET", 0xEDF6 / 16, Continuation),
    op!("THENRETALT", 0xEDF7 / 16, Continuation),
    op!("INVERT", 0xEDF8 / 16, Continuation),
    op!("BOOLEVAL", 0xEDF9 / 16, Continuation),
    op!("SAMEALT", 0xEDFA / 16, Continuation),
    op!("SAMEALTSAVE", 0xEDFB / 16, Continuation),
    op!("BLESSARGS", 0xEE / 8, Continuation, uint("r", 4), uint("n", 4)),
    op!("CALLDICT", 0xF0 / 8, Continuation, uint("n", 8)),
    op!("CALLDICT_LONG", 0x3C4 / 10, Continuation, uint("n", 14)),
    op!("JMPDICT", 0x3C5 / 10, Continuation, uint("n", 14)),
    op!("PREPAREDICT", 0x3C6 / 10, Continuation, uint("n", 14)),

    // Exceptions
    op!("THROW_SHORT", 0x3C8 / 10, Exception, uint("n", 6)),
    op!("THROWIF_SHORT", 0x3C9 / 10, Exception, uint("n", 6)),
    op!("THROWIFNOT_SHORT", 0x3CA / 10, Exception, uint("n", 6)),
    op!("THROW", 0x1E58 / 13, Exception, uint("n", 11)),
    op!("THROWARG", 0x1E59 / 13, Exception, uint("n", 11)),
    op!("THROWIF", 0x1E5A / 13, Exception, uint("n", 11)),
    op!("THROWARGIF", 0x1E5B / 13, Exception, uint("n", 11)),
    op!("THROWIFNOT", 0x1E5C / 13, Exception, uint("n", 11)),
    op!("THROWARGIFNOT", 0x1E5D / 13, Exception, uint("n", 11)),
    op!("THROWANY", 0xF2F0 / 16, Exception),
    op!("THROWARGANY", 0xF2F1 / 16, Exception),
    op!("THROWANYIF", 0xF2F2 / 16, Exception),
    op!("THROWARGANYIF", 0xF2F3 / 16, Exception),
    op!("THROWANYIFNOT", 0xF2F4 / 16, Exception),
    op!("THROWARGANYIFNOT", 0xF2F5 / 16, Exception),
    op!("TRY", 0xF2FF / 16, Exception),
    op!("TRYARGS", 0xF3 / 8, Exception, uint("p", 4), uint("r", 4)),

    // Dictionaries
    op!("STDICT", 0xF400 / 16, Dictionary),
    op!("SKIPDICT", 0xF401 / 16, Dictionary),
    op!("LDDICTS", 0xF402 / 16, Dictionary),
    op!("PLDDICTS", 0xF403 / 16, Dictionary),
    op!("LDDICT", 0xF404 / 16, Dictionary),
    op!("PLDDICT", 0xF405 / 16, Dictionary),
    op!("LDDICTQ", 0xF406 / 16, Dictionary),
    op!("PLDDICTQ", 0xF407 / 16, Dictionary),
    op!("DICTGET", 0xF40A / 16, Dictionary),
    op!("DICTGETREF", 0xF40B / 16, Dictionary),
    op!("DICTIGET", 0xF40C / 16, Dictionary),
    op!("DICTIGETREF", 0xF40D / 16, Dictionary),
    op!("DICTUGET", 0xF40E / 16, Dictionary),
    op!("DICTUGETREF", 0xF40F / 16, Dictionary),
    op!("DICTSET", 0xF412 / 16, Dictionary),
    op!("DICTSETREF", 0xF413 / 16, Dictionary),
    op!("DICTISET", 0xF414 / 16, Dictionary),
    op!("DICTISETREF", 0xF415 / 16, Dictionary),
    op!("DICTUSET", 0xF416 / 16, Dictionary),
    op!("DICTUSETREF", 0xF417 / 16, Dictionary),
    op!("DICTSETGET", 0xF41A / 16, Dictionary),
    op!("DICTSETGETREF", 0xF41B / 16, Dictionary),
    op!("DICTISETGET", 0xF41C / 16, Dictionary),
    op!("DICTISETGETREF", 0xF41D / 16, Dictionary),
    op!("DICTUSETGET", 0xF41E / 16, Dictionary),
    op!("DICTUSETGETREF", 0xF41F / 16, Dictionary),
    op!("DICTREPLACE", 0xF422 / 16, Dictionary),
    op!("DICTREPLACEREF", 0xF423 / 16, Dictionary),
    op!("DICTIREPLACE", 0xF424 / 16, Dictionary),
    op!("DICTIREPLACEREF", 0xF425 / 16, Dictionary),
    op!("DICTUREPLACE", 0xF426 / 16, Dictionary),
    op!("DICTUREPLACEREF", 0xF427 / 16, Dictionary),
    op!("DICTREPLACEGET", 0xF42A / 16, Dictionary),
    op!("DICTREPLACEGETREF", 0xF42B / 16, Dictionary),
    op!("DICTIREPLACEGET", 0xF42C / 16, Dictionary),
    op!("DICTIREPLACEGETREF", 0xF42D / 16, Dictionary),
    op!("DICTUREPLACEGET", 0xF42E / 16, Dictionary),
    op!("DICTUREPLACEGETREF", 0xF42F / 16, Dictionary),
    op!("DICTADD", 0xF432 / 16, Dictionary),
    op!("DICTADDREF", 0xF433 / 16, Dictionary),
    op!("DICTIADD", 0xF434 / 16, Dictionary),
    op!("DICTIADDREF", 0xF435 / 16, Dictionary),
    op!("DICTUADD", 0xF436 / 16, Dictionary),
    op!("DICTUADDREF", 0xF437 / 16, Dictionary),
    op!("DICTADDGET", 0xF43A / 16, Dictionary),
    op!("DICTADDGETREF", 0xF43B / 16, Dictionary),
    op!("DICTIADDGET", 0xF43C / 16, Dictionary),
    op!("DICTIADDGETREF", 0xF43D / 16, Dictionary),
    op!("DICTUADDGET", 0xF43E / 16, Dictionary),
    op!("DICTUADDGETREF", 0xF43F / 16, Dictionary),
    op!("DICTSETB", 0xF441 / 16, Dictionary),
    op!("DICTISETB", 0xF442 / 16, Dictionary),
    op!("DICTUSETB", 0xF443 / 16, Dictionary),
    op!("DICTSETGETB", 0xF445 / 16, Dictionary),
    op!("DICTISETGETB", 0xF446 / 16, Dictionary),
    op!("DICTUSETGETB", 0xF447 / 16, Dictionary),
    op!("DICTREPLACEB", 0xF449 / 16, Dictionary),
    op!("DICTIREPLACEB", 0xF44A / 16, Dictionary),
    op!("DICTUREPLACEB", 0xF44B / 16, Dictionary),
    op!("DICTREPLACEGETB", 0xF44D / 16, Dictionary),
    op!("DICTIREPLACEGETB", 0xF44E / 16, Dictionary),
    op!("DICTUREPLACEGETB", 0xF44F / 16, Dictionary),
    op!("DICTADDB", 0xF451 / 16, Dictionary),
    op!("DICTIADDB", 0xF452 / 16, Dictionary),
    op!("DICTUADDB", 0xF453 / 16, Dictionary),
    op!("DICTADDGETB", 0xF455 / 16, Dictionary),
    op!("DICTIADDGETB", 0xF456 / 16, Dictionary),
    op!("DICTUADDGETB", 0xF457 / 16, Dictionary),
    op!("DICTDEL", 0xF459 / 16, Dictionary),
    op!("DICTIDEL", 0xF45A / 16, Dictionary),
    op!("DICTUDEL", 0xF45B / 16, Dictionary),
    op!("DICTDELGET", 0xF462 / 16, Dictionary),
    op!("DICTDELGETREF", 0xF463 / 16, Dictionary),
    op!("DICTIDELGET", 0xF464 / 16, Dictionary),
    op!("DICTIDELGETREF", 0xF465 / 16, Dictionary),
    op!("DICTUDELGET", 0xF466 / 16, Dictionary),
    op!("DICTUDELGETREF", 0xF467 / 16, Dictionary),
    op!("DICTGETOPTREF", 0xF469 / 16, Dictionary),
    op!("DICTIGETOPTREF", 0xF46A / 16, Dictionary),
    op!("DICTUGETOPTREF", 0xF46B / 16, Dictionary),
    op!("DICTSETGETOPTREF", 0xF46D / 16, Dictionary),
    op!("DICTISETGETOPTREF", 0xF46E / 16, Dictionary),
    op!("DICTUSETGETOPTREF", 0xF46F / 16, Dictionary),
    op!("PFXDICTSET", 0xF470 / 16, Dictionary),
    op!("PFXDICTREPLACE", 0xF471 / 16, Dictionary),
    op!("PFXDICTADD", 0xF472 / 16, Dictionary),
    op!("PFXDICTDEL", 0xF473 / 16, Dictionary),
    op!("DICTGETNEXT", 0xF474 / 16, Dictionary),
    op!("DICTGETNEXTEQ", 0xF475 / 16, Dictionary),
    op!("DICTGETPREV", 0xF476 / 16, Dictionary),
    op!("DICTGETPREVEQ", 0xF477 / 16, Dictionary),
    op!("DICTIGETNEXT", 0xF478 / 16, Dictionary),
    op!("DICTIGETNEXTEQ", 0xF479 / 16, Dictionary),
    op!("DICTIGETPREV", 0xF47A / 16, Dictionary),
    op!("DICTIGETPREVEQ", 0xF47B / 16, Dictionary),
    op!("DICTUGETNEXT", 0xF47C / 16, Dictionary),
    op!("DICTUGETNEXTEQ", 0xF47D / 16, Dictionary),
    op!("DICTUGETPREV", 0xF47E / 16, Dictionary),
    op!("DICTUGETPREVEQ", 0xF47F / 16, Dictionary),
    op!("DICTMIN", 0xF482 / 16, Dictionary),
    op!("DICTMINREF", 0xF483 / 16, Dictionary),
    op!("DICTIMIN", 0xF484 / 16, Dictionary),
    op!("DICTIMINREF", 0xF485 / 16, Dictionary),
    op!("DICTUMIN", 0xF486 / 16, Dictionary),
    op!("DICTUMINREF", 0xF487 / 16, Dictionary),
    op!("DICTMAX", 0xF48A / 16, Dictionary),
    op!("DICTMAXREF", 0xF48B / 16, Dictionary),
    op!("DICTIMAX", 0xF48C / 16, Dictionary),
    op!("DICTIMAXREF", 0xF48D / 16, Dictionary),
    op!("DICTUMAX", 0xF48E / 16, Dictionary),
    op!("DICTUMAXREF", 0xF48F / 16, Dictionary),
    op!("DICTREMMIN", 0xF492 / 16, Dictionary),
    op!("DICTREMMINREF", 0xF493 / 16, Dictionary),
    op!("DICTIREMMIN", 0xF494 / 16, Dictionary),
    op!("DICTIREMMINREF", 0xF495 / 16, Dictionary),
    op!("DICTUREMMIN", 0xF496 / 16, Dictionary),
    op!("DICTUREMMINREF", 0xF497 / 16, Dictionary),
    op!("DICTREMMAX", 0xF49A / 16, Dictionary),
    op!("DICTREMMAXREF", 0xF49B / 16, Dictionary),
    op!("DICTIREMMAX", 0xF49C / 16, Dictionary),
    op!("DICTIREMMAXREF", 0xF49D / 16, Dictionary),
    op!("DICTUREMMAX", 0xF49E / 16, Dictionary),
    op!("DICTUREMMAXREF", 0xF49F / 16, Dictionary),
    op!("DICTIGETJMP", 0xF4A0 / 16, Dictionary),
    op!("DICTUGETJMP", 0xF4A1 / 16, Dictionary),
    op!("DICTIGETEXEC", 0xF4A2 / 16, Dictionary),
    op!("DICTUGETEXEC", 0xF4A3 / 16, Dictionary),
    op!("DICTPUSHCONST", 0x1E94 / 13, Dictionary, OperandLayout::Dictionary { name: "d" }, uint("n", 10)),
    op!("PFXDICTGETQ", 0xF4A8 / 16, Dictionary),
    op!("PFXDICTGET", 0xF4A9 / 16, Dictionary),
    op!("PFXDICTGETJMP", 0xF4AA / 16, Dictionary),
    op!("PFXDICTGETEXEC", 0xF4AB / 16, Dictionary),
    op!("PFXDICTSWITCH", 0x1E95 / 13, Dictionary, OperandLayout::Dictionary { name: "d" }, uint("n", 10)),
    op!("SUBDICTGET", 0xF4B1 / 16, Dictionary),
    op!("SUBDICTIGET", 0xF4B2 / 16, Dictionary),
    op!("SUBDICTUGET", 0xF4B3 / 16, Dictionary),
    op!("SUBDICTRPGET", 0xF4B5 / 16, Dictionary),
    op!("SUBDICTIRPGET", 0xF4B6 / 16, Dictionary),
    op!("SUBDICTURPGET", 0xF4B7 / 16, Dictionary),
    op!("DICTIGETJMPZ", 0xF4BC / 16, Dictionary),
    op!("DICTUGETJMPZ", 0xF4BD / 16, Dictionary),
    op!("DICTIGETEXECZ", 0xF4BE / 16, Dictionary),
    op!("DICTUGETEXECZ", 0xF4BF / 16, Dictionary),

    // Gas, blockchain, hashing and messages
    op!("ACCEPT", 0xF800 / 16, Blockchain),
    op!("SETGASLIMIT", 0xF801 / 16, Blockchain),
    op!("BUYGAS", 0xF802 / 16, Blockchain),
    op!("GRAMTOGAS", 0xF804 / 16, Blockchain),
    op!("GASTOGRAM", 0xF805 / 16, Blockchain),
    op!("GASREMAINING", 0xF806 / 16, Blockchain),
    op!("GASCONSUMED", 0xF807 / 16, Blockchain),
    op!("COMMIT", 0xF80F / 16, Blockchain),
    op!("RANDU256", 0xF810 / 16, Blockchain),
    op!("RAND", 0xF811 / 16, Blockchain),
    op!("SETRAND", 0xF814 / 16, Blockchain),
    op!("ADDRAND", 0xF815 / 16, Blockchain),
    op!("GETPARAM", 0xF82 / 12, Blockchain, uint("i", 4)),
    op!("NOW", 0xF823 / 16, Blockchain),
    op!("BLOCKLT", 0xF824 / 16, Blockchain),
    op!("LTIME", 0xF825 / 16, Blockchain),
    op!("RANDSEED", 0xF826 / 16, Blockchain),
    op!("BALANCE", 0xF827 / 16, Blockchain),
    op!("MYADDR", 0xF828 / 16, Blockchain),
    op!("CONFIGROOT", 0xF829 / 16, Blockchain),
    op!("MYCODE", 0xF82A / 16, Blockchain),
    op!("INITCODEHASH", 0xF82B / 16, Blockchain),
    op!("STORAGEFEE", 0xF82C / 16, Blockchain),
    op!("SEQNO", 0xF82D / 16, Blockchain),
    op!("CONFIGDICT", 0xF830 / 16, Blockchain),
    op!("CONFIGPARAM", 0xF832 / 16, Blockchain),
    op!("CONFIGOPTPARAM", 0xF833 / 16, Blockchain),
    op!("GETGLOBVAR", 0xF840 / 16, Blockchain),
    op!("GETGLOB", 0x7C2 / 11, Blockchain, uint("k", 5)),
    op!("SETGLOBVAR", 0xF860 / 16, Blockchain),
    op!("SETGLOB", 0x7C3 / 11, Blockchain, uint("k", 5)),
    op!("GETEXTRABALANCE", 0xF880 / 16, Blockchain),
    op!("GETPARAMLONG", 0xF881 / 16, Blockchain, uint("i", 8)),
    op!("INMSGPARAM", 0xF89 / 12, Blockchain, uint("i", 4)),
    op!("HASHCU", 0xF900 / 16, Blockchain),
    op!("HASHSU", 0xF901 / 16, Blockchain),
    op!("SHA256U", 0xF902 / 16, Blockchain),
    op!("HASHEXT", 0xF904 / 16, Blockchain, uint("h", 8)),
    op!("HASHEXTR", 0xF905 / 16, Blockchain, uint("h", 8)),
    op!("HASHEXTA", 0xF906 / 16, Blockchain, uint("h", 8)),
    op!("HASHEXTAR", 0xF907 / 16, Blockchain, uint("h", 8)),
    op!("CHKSIGNU", 0xF910 / 16, Blockchain),
    op!("CHKSIGNS", 0xF911 / 16, Blockchain),
    op!("ECRECOVER", 0xF912 / 16, Blockchain),
    op!("P256_CHKSIGNU", 0xF914 / 16, Blockchain),
    op!("P256_CHKSIGNS", 0xF915 / 16, Blockchain),
    op!("CDATASIZEQ", 0xF940 / 16, Blockchain),
    op!("CDATASIZE", 0xF941 / 16, Blockchain),
    op!("SDATASIZEQ", 0xF942 / 16, Blockchain),
    op!("SDATASIZE", 0xF943 / 16, Blockchain),
    op!("LDGRAMS", 0xFA00 / 16, Blockchain),
    op!("LDVARINT16", 0xFA01 / 16, Blockchain),
    op!("STGRAMS", 0xFA02 / 16, Blockchain),
    op!("STVARINT16", 0xFA03 / 16, Blockchain),
    op!("LDVARUINT32", 0xFA04 / 16, Blockchain),
    op!("LDVARINT32", 0xFA05 / 16, Blockchain),
    op!("STVARUINT32", 0xFA06 / 16, Blockchain),
    op!("STVARINT32", 0xFA07 / 16, Blockchain),
    op!("LDMSGADDR", 0xFA40 / 16, Blockchain),
    op!("LDMSGADDRQ", 0xFA41 / 16, Blockchain),
    op!("PARSEMSGADDR", 0xFA42 / 16, Blockchain),
    op!("PARSEMSGADDRQ", 0xFA43 / 16, Blockchain),
    op!("REWRITESTDADDR", 0xFA44 / 16, Blockchain),
    op!("REWRITESTDADDRQ", 0xFA45 / 16, Blockchain),
    op!("REWRITEVARADDR", 0xFA46 / 16, Blockchain),
    op!("REWRITEVARADDRQ", 0xFA47 / 16, Blockchain),
    op!("SENDRAWMSG", 0xFB00 / 16, Blockchain),
    op!("RAWRESERVE", 0xFB02 / 16, Blockchain),
    op!("RAWRESERVEX", 0xFB03 / 16, Blockchain),
    op!("SETCODE", 0xFB04 / 16, Blockchain),
    op!("SETLIBCODE", 0xFB06 / 16, Blockchain),
    op!("CHANGELIB", 0xFB07 / 16, Blockchain),
    op!("SENDMSG", 0xFB08 / 16, Blockchain),

    // Debug
    op!("DEBUG", 0xFE / 8, Debug, uint("i", 8)),
    op!("DUMPSTK", 0xFE00 / 16, Debug),
    op!("DUMPSTKTOP", 0xFE0 / 12, Debug, uint("i", 4)),
    op!("HEXDUMP", 0xFE10 / 16, Debug),
    op!("HEXPRINT", 0xFE11 / 16, Debug),
    op!("BINDUMP", 0xFE12 / 16, Debug),
    op!("BINPRINT", 0xFE13 / 16, Debug),
    op!("STRDUMP", 0xFE14 / 16, Debug),
    op!("STRPRINT", 0xFE15 / 16, Debug),
    op!("DEBUGOFF", 0xFE1E / 16, Debug),
    op!("DEBUGON", 0xFE1F / 16, Debug),
    op!("DUMP", 0xFE2 / 12, Debug, uint("i", 4)),
    op!("PRINT", 0xFE3 / 12, Debug, uint("i", 4)),
    op!("DEBUGSTR", 0xFEF / 12, Debug, OperandLayout::DebugString { name: "s", length_bits: 4 }),
    op!("LOGFLUSH", 0xFEF000 / 24, Debug),

    // Code page selection
    op!("SETCP0", 0xFF00 / 16, Codepage),
    op!("SETCPX", 0xFFF0 / 16, Codepage),
    op!("SETCP", 0xFF / 8, Codepage, uint("n", 8)),
];

/// Prefix index over [`OPCODES`] plus the distinct prefix lengths, longest first.
pub(crate) struct OpcodeIndex {
    by_prefix: HashMap<(u8, u32), &'static OpcodeSpec>,
    lengths: Vec<u8>,
}

impl OpcodeIndex {
    fn build() -> Self {
        let mut by_prefix = HashMap::with_capacity(OPCODES.len());
        let mut lengths = Vec::new();

        for spec in OPCODES {
            by_prefix.insert((spec.prefix_bits, spec.prefix), spec);
            if !lengths.contains(&spec.prefix_bits) {
                lengths.push(spec.prefix_bits);
            }
        }
        lengths.sort_unstable_by(|a, b| b.cmp(a));

        OpcodeIndex { by_prefix, lengths }
    }

    /// Prefix lengths present in the table, longest first.
    pub(crate) fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// The entry for a `bits`-long `prefix`, if any.
    pub(crate) fn get(&self, bits: u8, prefix: u32) -> Option<&'static OpcodeSpec> {
        self.by_prefix.get(&(bits, prefix)).copied()
    }

    /// Longest prefix length in the table.
    pub(crate) fn max_length(&self) -> u8 {
        self.lengths.first().copied().unwrap_or(0)
    }
}

/// The lazily built, process-wide index.
pub(crate) fn index() -> &'static OpcodeIndex {
    static INDEX: OnceLock<OpcodeIndex> = OnceLock::new();
    INDEX.get_or_init(OpcodeIndex::build)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_prefixes_fit_their_width() {
        for spec in OPCODES {
            assert!(
                spec.prefix_bits > 0 && spec.prefix_bits <= 24,
                "{} has an unsupported prefix width",
                spec.mnemonic
            );
            assert!(
                spec.prefix < (1u32 << spec.prefix_bits),
                "{} prefix {:#X} exceeds {} bits",
                spec.mnemonic,
                spec.prefix,
                spec.prefix_bits
            );
        }
    }

    #[test]
    fn test_no_duplicate_encodings() {
        let mut seen = HashSet::new();
        for spec in OPCODES {
            assert!(
                seen.insert((spec.prefix_bits, spec.prefix)),
                "duplicate encoding for {}",
                spec.mnemonic
            );
        }
    }

    #[test]
    fn test_no_duplicate_mnemonics() {
        let mut seen = HashSet::new();
        for spec in OPCODES {
            assert!(seen.insert(spec.mnemonic), "{} listed twice", spec.mnemonic);
        }
    }

    #[test]
    fn test_index_lengths_sorted() {
        let index = index();
        assert_eq!(index.max_length(), 24);
        assert!(index.lengths().windows(2).all(|w| w[0] > w[1]));
        assert_eq!(index.get(8, 0x00).map(|s| s.mnemonic), Some("NOP"));
        assert_eq!(index.get(13, 0x1E94).map(|s| s.mnemonic), Some("DICTPUSHCONST"));
        assert!(index.get(8, 0x8E).is_none());
    }
}
