use std::path::PathBuf;

use miette::Diagnostic;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Failed to read '{}'", path.display())]
    #[diagnostic(code(idxmeta::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}'", path.display())]
    #[diagnostic(code(idxmeta::write))]
    Write {
        path: PathBuf,
        #[source]
        source: index_meta::Error,
    },

    #[error("Invalid index metadata in '{}'", path.display())]
    #[diagnostic(code(idxmeta::metadata))]
    Metadata {
        path: PathBuf,
        #[source]
        source: index_meta::Error,
    },

    #[error("Invalid default settings in '{}'", path.display())]
    #[diagnostic(
        code(idxmeta::defaults),
        help("defaults must be a JSON object of setting keys to values")
    )]
    Defaults {
        path: PathBuf,
        #[source]
        source: index_meta::Error,
    },

    #[error("{failed} of {total} files failed validation")]
    #[diagnostic(code(idxmeta::validate))]
    ValidationFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
