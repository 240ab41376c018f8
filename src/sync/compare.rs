//! Content comparison

use std::fs;
use std::path::Path;

use crate::error::{Result, fs::read_error};

/// Whether two files have exactly the same bytes.
///
/// Both files are read fully; the trees hold hand-written text and config.
pub fn files_equal(left: &Path, right: &Path) -> Result<bool> {
    let left_bytes = fs::read(left).map_err(|e| read_error(left, &e))?;
    let right_bytes = fs::read(right).map_err(|e| read_error(right, &e))?;
    Ok(left_bytes == right_bytes)
}
