mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // cellscope info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("cellscope", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match &cli.command {
        Command::Disasm {
            path,
            flatten,
            on_collision,
            max_depth,
            root,
        } => commands::disasm::run(
            path,
            &commands::disasm::DisasmOptions {
                flatten: *flatten,
                collision: *on_collision,
                max_depth: *max_depth,
                root: *root,
            },
        ),
        Command::Methods { path, root } => commands::methods::run(path, *root, &cli.global),
        Command::Cells { path, root, depth } => {
            commands::cells::run(path, *root, *depth, &cli.global)
        }
    }
}
