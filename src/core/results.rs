use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

/// One timing observation: how long the benchmark command took for a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub version: String,
    /// Wall-clock seconds of the timed command only.
    pub duration: f64,
}

/// Serialize records as a JSON array (4-space indent).
pub fn to_json(records: &[ResultRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize results".to_string())))?;
    String::from_utf8(buf)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize results".to_string())))
}

/// Write the complete record set in a single atomic write.
pub fn write_results(path: &Path, records: &[ResultRecord]) -> Result<()> {
    tracing::info!("Writing data to {}", path.display());
    let json = to_json(records)?;
    io::write_file_atomic(path, &json, "write results")
}
