//! Spritemill - command-line tool for rendering indexed pixel art definitions

use std::process::ExitCode;

use spritemill::cli;

fn main() -> ExitCode {
    cli::run()
}
