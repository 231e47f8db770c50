//! Hexagonal boundary lint for the circle backend.
//!
//! `backend/src` is split into `domain`, `inbound` and `outbound`. The lint
//! parses every file under those directories with `syn` and reports:
//!
//! - `domain` reaching for either adapter layer, or for the web, storage or
//!   hashing crates;
//! - `inbound` reaching for `outbound`, Diesel or argon2;
//! - `outbound` reaching for `inbound` or the web stack.
//!
//! Run it with `cargo run -p architecture-lint`.

mod imports;
mod layer;

use std::fmt;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub use imports::Dependency;
pub use layer::Layer;

/// A file reaching across a boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    pub layer: Layer,
    pub dependency: Dependency,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dependency {
            Dependency::Module(root) => write!(
                f,
                "{}: {} module must not depend on crate::{root}",
                self.file, self.layer
            ),
            Dependency::Crate(root) => write!(
                f,
                "{}: {} module must not depend on external crate `{root}`",
                self.file, self.layer
            ),
        }
    }
}

/// Failure modes of a lint run.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    #[error("{file}: not valid UTF-8 path")]
    NonUtf8Path { file: String },
    #[error("{file}: outside the domain, inbound and outbound layers")]
    UnknownLayer { file: Utf8PathBuf },
    #[error("{file}: failed to parse: {message}")]
    Parse { file: Utf8PathBuf, message: String },
    #[error("architecture boundary violations:\n{}", render(.0))]
    Violations(Vec<Violation>),
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect()
}

/// A Rust source file and its path relative to `backend/src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    pub file: Utf8PathBuf,
    pub contents: String,
}

impl LintSource {
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Lint `backend/src` beneath `backend_dir`.
pub fn lint_backend_sources(backend_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = backend_dir.join("src");
    let mut sources = Vec::new();
    for root in layer::LINTED_ROOTS {
        let dir = src.join(root);
        if dir.is_dir() {
            collect(&src, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint in-memory sources. Every violation across all files is reported.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::UnknownLayer {
            file: source.file.clone(),
        })?;
        let parsed = syn::parse_file(&source.contents).map_err(|err| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            }
        })?;
        violations.extend(
            imports::dependencies(&parsed)
                .into_iter()
                .filter(|dependency| crosses_boundary(layer, dependency))
                .map(|dependency| Violation {
                    file: source.file.clone(),
                    layer,
                    dependency,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn crosses_boundary(layer: Layer, dependency: &Dependency) -> bool {
    match dependency {
        Dependency::Module(root) => layer.forbidden_modules().contains(&root.as_str()),
        Dependency::Crate(root) => layer.forbids_crate(root),
    }
}

fn collect(
    src: &Utf8Path,
    dir: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let path = Utf8PathBuf::from_path_buf(path).map_err(|path| {
            ArchitectureLintError::NonUtf8Path {
                file: path.display().to_string(),
            }
        })?;
        if path.is_dir() {
            collect(src, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let relative = path.strip_prefix(src).unwrap_or(path.as_path()).to_owned();
            sources.push(LintSource::new(relative, fs::read_to_string(&path)?));
        }
    }
    Ok(())
}
