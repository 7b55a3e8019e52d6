use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Context};
use cellscope::{Boc, Cell};

/// Load a bag of cells from disk.
pub fn load_boc(path: &Path) -> anyhow::Result<Boc> {
    Boc::from_file(path).with_context(|| format!("failed to load bag of cells: {}", path.display()))
}

/// Pick root cell `index` of `boc`.
pub fn root_cell(boc: &Boc, index: usize) -> anyhow::Result<Arc<Cell>> {
    boc.roots().get(index).cloned().ok_or_else(|| {
        anyhow!(
            "root index {} out of range, the container has {} root(s)",
            index,
            boc.roots().len()
        )
    })
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
