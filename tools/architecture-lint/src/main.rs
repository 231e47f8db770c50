//! `cargo run -p architecture-lint [BACKEND_DIR]`
//!
//! Defaults to the `backend/` crate next to this tool in the workspace.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;

fn default_backend_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../backend")
}

fn main() -> ExitCode {
    let backend_dir = std::env::args()
        .nth(1)
        .map_or_else(default_backend_dir, Utf8PathBuf::from);

    match architecture_lint::lint_backend_sources(&backend_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            ExitCode::FAILURE
        }
    }
}
