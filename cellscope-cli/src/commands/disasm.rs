use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use cellscope::{
    assembly::Codepage0,
    dictionary::HashmapDecoder,
    disassembler::{
        disassemble_with, flatten_program, CollisionPolicy, DisassemblerConfig, FlatInstruction,
        MethodId, StackContext,
    },
};
use serde::Serialize;

use crate::{
    commands::common::{file_display_name, load_boc, root_cell},
    output::print_json,
};

/// Flags of the `disasm` subcommand.
pub struct DisasmOptions {
    pub flatten: bool,
    pub collision: CollisionPolicy,
    pub max_depth: usize,
    pub root: usize,
}

#[derive(Debug, Serialize)]
struct FlatProgram {
    methods: BTreeMap<MethodId, Vec<FlatInstruction>>,
}

pub fn run(path: &Path, options: &DisasmOptions) -> anyhow::Result<()> {
    let boc = load_boc(path)?;
    let root = root_cell(&boc, options.root)?;

    let config = DisassemblerConfig::default()
        .with_collision(options.collision)
        .with_max_depth(options.max_depth);
    let program = disassemble_with(&Codepage0, &HashmapDecoder, config, root.slice())
        .with_context(|| format!("failed to disassemble {}", file_display_name(path)))?;

    log::info!(
        "{}: {} method(s), {} instruction(s)",
        file_display_name(path),
        program.len(),
        program.instruction_count()
    );

    if options.flatten {
        print_json(&FlatProgram {
            methods: flatten_program(&program, &StackContext::entry()),
        })
    } else {
        print_json(&program)
    }
}
