//! Binary-encode + deflate-compress artifacts to disk, and the matching
//! decode path. Shared by the `.dict`, `.vs`, and `.corpus` files (§6).
//!
//! Writes go through a temp file in the destination directory followed by
//! a rename, so a build that dies mid-write never leaves a half-written
//! artifact visible under the real name (§3's "written atomically-per-file").

use crate::error::QueryError;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Serialize `value` with `bincode`, deflate-compress it, and write it to
/// `path` atomically.
pub fn write_compressed<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let encoded = bincode::serialize(value)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut encoder = DeflateEncoder::new(&mut tmp, Compression::default());
        encoder.write_all(&encoded)?;
        encoder.finish()?;
    }
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Inflate and deserialize a value previously written by [`write_compressed`].
/// Returns `QueryError::MissingArtifact` if `path` does not exist, with
/// `hint` carried through verbatim for the caller's fail-hard message (§7).
pub fn read_compressed<T: DeserializeOwned>(
    path: &Path,
    hint: &'static str,
) -> Result<T, QueryError> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            QueryError::MissingArtifact { path: path.to_path_buf(), hint }
        } else {
            QueryError::Io(err)
        }
    })?;
    let mut decoder = DeflateDecoder::new(file);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    bincode::deserialize(&raw).map_err(|err| QueryError::Decode(err.to_string()))
}
