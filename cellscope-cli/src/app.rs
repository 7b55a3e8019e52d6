use std::path::PathBuf;

use cellscope::disassembler::{CollisionPolicy, DEFAULT_MAX_DEPTH};
use clap::{Parser, Subcommand};

/// cellscope - TVM bag-of-cells inspection and disassembly
#[derive(Debug, Parser)]
#[command(name = "cellscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Disassemble a root cell into methods and nested blocks, printed as JSON.
    Disasm {
        /// Path to the bag-of-cells file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Print the flattened opcode/operand view instead of the located program.
        #[arg(long)]
        flatten: bool,

        /// What to do when two dictionaries define the same method: overwrite or reject.
        #[arg(long, value_name = "POLICY", default_value_t = CollisionPolicy::Overwrite)]
        on_collision: CollisionPolicy,

        /// Maximum number of nested blocks.
        #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Index of the root cell holding the code.
        #[arg(long, value_name = "INDEX", default_value_t = 0)]
        root: usize,
    },

    /// List methods with their instruction counts.
    Methods {
        /// Path to the bag-of-cells file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Index of the root cell holding the code.
        #[arg(long, value_name = "INDEX", default_value_t = 0)]
        root: usize,
    },

    /// Dump the cell tree below a root: bit length, references and data.
    Cells {
        /// Path to the bag-of-cells file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Index of the root cell to dump.
        #[arg(long, value_name = "INDEX", default_value_t = 0)]
        root: usize,

        /// Stop descending below this depth.
        #[arg(long, value_name = "N")]
        depth: Option<usize>,
    },
}
