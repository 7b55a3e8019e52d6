use std::path::Path;

use anyhow::Context;
use cellscope::disassembler::{disassemble, MethodId, ENTRY_METHOD_ID};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_boc, root_cell},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct MethodEntry {
    id: MethodId,
    entry: bool,
    instructions: usize,
    total: usize,
}

#[derive(Debug, Serialize)]
struct MethodsOutput {
    methods: Vec<MethodEntry>,
    count: usize,
}

pub fn run(path: &Path, root: usize, opts: &GlobalOptions) -> anyhow::Result<()> {
    let boc = load_boc(path)?;
    let root = root_cell(&boc, root)?;
    let program = disassemble(&root).context("failed to disassemble")?;

    let methods: Vec<MethodEntry> = program
        .methods()
        .map(|method| MethodEntry {
            id: method.id,
            entry: method.id == ENTRY_METHOD_ID,
            instructions: method.instructions.len(),
            total: method.instruction_count(),
        })
        .collect();

    let output = MethodsOutput {
        count: methods.len(),
        methods,
    };

    print_output(&output, opts, |out| {
        let mut table = TabWriter::new(&[
            ("Method", Align::Right),
            ("Instructions", Align::Right),
            ("Nested total", Align::Right),
            ("", Align::Left),
        ]);
        for method in &out.methods {
            table.row(vec![
                method.id.to_string(),
                method.instructions.to_string(),
                method.total.to_string(),
                if method.entry {
                    "entry".to_string()
                } else {
                    String::new()
                },
            ]);
        }
        table.print();
        println!("\n{} method(s)", out.count);
    })
}
