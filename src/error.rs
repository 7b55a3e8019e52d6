use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers every failure that can occur while loading a bag-of-cells, decoding
/// instructions, expanding dictionaries and disassembling a cell tree. All failures are
/// fatal to the operation that raised them: the disassembler never resynchronizes after a
/// bad instruction and never produces a partial program.
///
/// # Error Categories
///
/// ## Container Errors
/// - [`Error::Malformed`] - Corrupted or invalid bag-of-cells structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond a buffer or cell boundary
/// - [`Error::NotSupported`] - Unsupported container magic or feature
/// - [`Error::Empty`] - Empty input provided
///
/// ## Decoding Errors
/// - [`Error::InvalidOpcode`] - Bits do not match any known instruction encoding
/// - [`Error::InvalidDictionary`] - Dictionary trie could not be partitioned into keys and values
///
/// ## Disassembly Errors
/// - [`Error::DuplicateMethod`] - Method identifier collision under a rejecting policy
/// - [`Error::RecursionLimit`] - Maximum nesting depth exceeded
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Serialization`] - JSON emission errors
///
/// # Examples
///
/// ```rust,no_run
/// use cellscope::{Boc, Error};
/// use std::path::Path;
///
/// match Boc::from_file(Path::new("contract.boc")) {
///     Ok(boc) => println!("Loaded {} cells", boc.cell_count()),
///     Err(Error::NotSupported) => eprintln!("Not a bag-of-cells"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The container is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted.
    ///
    /// Raised when a byte reader runs past its buffer, or when a cell cursor is asked
    /// for more bits or references than remain in its window. For instruction streams
    /// this means the last instruction was truncated.
    #[error("Out of Bound read would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// This file type is not supported.
    ///
    /// The input does not start with a known bag-of-cells magic.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// No instruction encoding matches the bits at the cursor.
    ///
    /// The associated value is the inspected bit prefix in hex notation.
    #[error("Invalid opcode - {0}")]
    InvalidOpcode(String),

    /// The dictionary decoder could not produce a valid key/value partition.
    #[error("Invalid dictionary - {0}")]
    InvalidDictionary(String),

    /// A dictionary key targeted a method identifier that is already registered,
    /// and the active collision policy rejects overwrites.
    #[error("Method identifier {0} was registered twice")]
    DuplicateMethod(i64),

    /// Recursion limit reached.
    ///
    /// Each nested continuation, referenced cell or dictionary body adds one level.
    /// The associated value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Serializing a program or flattened view failed.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}
