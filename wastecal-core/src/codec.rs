//! JSON encoding of a year's calendar file.

use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::year::YearData;

/// Decode a year document. `origin` is only used for error reporting.
pub fn decode(bytes: &[u8], origin: &Path) -> StoreResult<YearData> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::MalformedDocument {
        path: origin.to_path_buf(),
        source,
    })
}

/// Encode a year as indented JSON with stable key order and a trailing newline.
pub fn encode(year: &YearData) -> StoreResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(year)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Read and decode a year file from disk.
pub fn read_file(path: &Path) -> StoreResult<YearData> {
    let bytes = std::fs::read(path)?;
    decode(&bytes, path)
}
