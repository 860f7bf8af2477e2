//! Final-state JSON document writer (§4.J, §6).

use std::{fs::File, io::BufWriter, path::Path};

use crate::{error::{EngineResult, IoError}, state::EngineState};

/// Writes the stable-sorted [`EngineState::to_dict`] form as a single
/// pretty-printed JSON document.
pub fn write_final_state(path: &Path, state: &EngineState) -> EngineResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(IoError::from)?;
    }
    let file = File::create(path).map_err(IoError::from)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &state.to_dict()).map_err(IoError::from)?;
    Ok(())
}
