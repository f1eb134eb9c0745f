#![forbid(unsafe_code)]

//! Entry point for the `fq` binary.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("fq: {e}");
        std::process::exit(1);
    }
}
