use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::parser::ParseError;

/// Anything that aborts a replay run. Parse and I/O failures carry the file
/// they happened in; parse failures also carry the 1-based line number.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("{}:{line}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad file pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
