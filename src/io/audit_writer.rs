//! Newline-delimited JSON audit log writer (§4.J, §6).

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{error::{EngineResult, IoError}, output::OutputRecord};

/// Writes one JSON object per line, in the order the records were produced.
/// Parent directories are created if missing.
pub fn write_audit_log(path: &Path, records: &[OutputRecord]) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(IoError::from)?;
    }
    let file = File::create(path).map_err(IoError::from)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(IoError::from)?;
        writer.write_all(b"\n").map_err(IoError::from)?;
    }
    writer.flush().map_err(IoError::from)?;
    Ok(())
}
