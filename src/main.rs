//! minisql CLI entry point
//!
//! All logic is delegated to the CLI module. Errors are printed to stderr
//! as `CODE: message` and the process exits with status 1.

use minisql::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
