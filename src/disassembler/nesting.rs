//! Classification of instructions that carry nested code.
//!
//! Only a small, closed set of mnemonics hand out cursors that hold code: pushed
//! continuations, the reference-based branch and call forms, the two-armed conditional and
//! the constant dictionary push. Every other cursor operand is data.

/// How an instruction's operands nest further code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nesting {
    /// No operand holds code
    #[default]
    None,
    /// An inline continuation in operand `s`
    Continuation,
    /// A referenced cell in operand `c`
    Reference,
    /// Two referenced cells in operands `c1` and `c2`
    DualReference,
    /// A dictionary of method bodies in operand `d`, keyed by `n`-bit identifiers
    Dictionary,
}

const CONTINUATION_MNEMONICS: &[&str] = &["PUSHCONT", "PUSHCONT_SHORT"];

const REFERENCE_MNEMONICS: &[&str] = &[
    "PUSHREFCONT",
    "IFREF",
    "IFNOTREF",
    "IFJMPREF",
    "IFNOTJMPREF",
    "IFREFELSE",
    "IFELSEREF",
    "IFBITJMPREF",
    "IFNBITJMPREF",
    "CALLREF",
    "JMPREF",
    "JMPREFDATA",
    "PUSHREF",
];

impl Nesting {
    /// Classifies `mnemonic`.
    #[must_use]
    pub fn of(mnemonic: &str) -> Nesting {
        match mnemonic {
            "IFREFELSEREF" => Nesting::DualReference,
            "DICTPUSHCONST" => Nesting::Dictionary,
            _ if CONTINUATION_MNEMONICS.contains(&mnemonic) => Nesting::Continuation,
            _ if REFERENCE_MNEMONICS.contains(&mnemonic) => Nesting::Reference,
            _ => Nesting::None,
        }
    }

    /// Names of the operands expanded into anonymous blocks.
    #[must_use]
    pub fn block_operands(self) -> &'static [&'static str] {
        match self {
            Nesting::Continuation => &["s"],
            Nesting::Reference => &["c"],
            Nesting::DualReference => &["c1", "c2"],
            Nesting::Dictionary | Nesting::None => &[],
        }
    }

    /// Name of the operand holding a method dictionary, and of its key width operand.
    #[must_use]
    pub fn dictionary_operands(self) -> Option<(&'static str, &'static str)> {
        match self {
            Nesting::Dictionary => Some(("d", "n")),
            Nesting::None
            | Nesting::Continuation
            | Nesting::Reference
            | Nesting::DualReference => None,
        }
    }
}
