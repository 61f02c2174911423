//! Error types for the two subsystem boundaries (build and query), per the
//! error-kind/policy table of §7. No `thiserror`: the teacher's own core
//! package carries no error-derive crate, so these are hand-rolled enums
//! with a manual `Display` impl, matching `verify::types::InvariantError`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors surfaced by the index builder (§4.3, §4.4).
#[derive(Debug)]
pub enum BuildError {
    /// `open()` called while the builder was already open.
    AlreadyOpen,
    /// `index_document` or `close` called while the builder was not open.
    NotOpen,
    Io(io::Error),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::AlreadyOpen => write!(f, "index builder is already open"),
            BuildError::NotOpen => write!(f, "index builder is not open"),
            BuildError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io(err) => Some(err),
            BuildError::AlreadyOpen | BuildError::NotOpen => None,
        }
    }
}

impl From<io::Error> for BuildError {
    fn from(err: io::Error) -> Self {
        BuildError::Io(err)
    }
}

/// Errors surfaced by the query engine (§4.7, §7).
#[derive(Debug)]
pub enum QueryError {
    /// One of `.dict` / `.vs` / `.corpus` / `.postings` was missing at startup.
    MissingArtifact { path: PathBuf, hint: &'static str },
    Io(io::Error),
    Decode(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MissingArtifact { path, hint } => {
                write!(f, "missing index artifact {}: {hint}", path.display())
            }
            QueryError::Io(err) => write!(f, "I/O error: {err}"),
            QueryError::Decode(msg) => write!(f, "failed to decode index artifact: {msg}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Io(err) => Some(err),
            QueryError::MissingArtifact { .. } | QueryError::Decode(_) => None,
        }
    }
}

impl From<io::Error> for QueryError {
    fn from(err: io::Error) -> Self {
        QueryError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_message_names_the_path() {
        let err = QueryError::MissingArtifact {
            path: PathBuf::from("ifile.dict"),
            hint: "run `ifile index` to build one",
        };
        let msg = err.to_string();
        assert!(msg.contains("ifile.dict"));
        assert!(msg.contains("re-index") || msg.contains("index"));
    }
}
