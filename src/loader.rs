use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{IncludeError, Result};

/// Reads the whole input file into memory.
pub fn load_input(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)
        .map_err(|e| IncludeError::io(format!("could not read file {}", path.display()), e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded input");
    Ok(bytes)
}
