use std::path::Path;

use cellscope::Cell;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_boc, root_cell},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct CellNode {
    bits: usize,
    data: String,
    exotic: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    references: Vec<CellNode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    truncated: bool,
}

impl CellNode {
    fn build(cell: &Cell, depth: usize, limit: Option<usize>) -> Self {
        let truncated = limit.is_some_and(|limit| depth >= limit) && !cell.references().is_empty();
        let references = if truncated {
            Vec::new()
        } else {
            cell.references()
                .iter()
                .map(|child| CellNode::build(child, depth + 1, limit))
                .collect()
        };

        CellNode {
            bits: cell.bit_len(),
            data: cell.data().to_string(),
            exotic: cell.is_exotic(),
            references,
            truncated,
        }
    }

    fn print(&self, prefix: &str, index: usize) {
        println!(
            "{}[{}] {} bits{} {}",
            prefix,
            index,
            self.bits,
            if self.exotic { " (exotic)" } else { "" },
            self.data
        );
        if self.truncated {
            println!("{}  ...", prefix);
        }
        let nested = format!("{}  ", prefix);
        for (i, child) in self.references.iter().enumerate() {
            child.print(&nested, i);
        }
    }
}

pub fn run(
    path: &Path,
    root: usize,
    depth: Option<usize>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let boc = load_boc(path)?;
    let root_index = root;
    let root = root_cell(&boc, root_index)?;

    let tree = CellNode::build(&root, 0, depth);
    print_output(&tree, opts, |tree| {
        println!("{} cell(s), {} root(s)\n", boc.cell_count(), boc.roots().len());
        tree.print("", root_index);
    })
}
