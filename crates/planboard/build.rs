//! Generates man pages and shell completions for packaging.
//!
//! Output lands in `$OUT_DIR/man` and `$OUT_DIR/completions`.

use std::io;
use std::path::Path;

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;

// cli.rs only depends on clap + clap_complete, both build-dependencies.
#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR not set by Cargo");
    };

    if let Err(e) = write_assets(Path::new(&out_dir)) {
        panic!("failed to generate planboard docs: {e}");
    }
}

fn write_assets(out_dir: &Path) -> io::Result<()> {
    let mut cmd = cli::Cli::command();

    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir)?;
    // One page for the root plus one per visible subcommand, named `planboard-<sub>.1`.
    clap_mangen::generate_to(cmd.clone(), &man_dir)?;

    let completion_dir = out_dir.join("completions");
    std::fs::create_dir_all(&completion_dir)?;
    for shell in Shell::value_variants() {
        clap_complete::generate_to(*shell, &mut cmd, "planboard", &completion_dir)?;
    }

    Ok(())
}
