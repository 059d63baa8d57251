//! Order file loading.
//!
//! The order file is a newline-separated list of entry identifiers (with the
//! catalog's file suffix included) defining the default "run everything"
//! order. Blank lines and `#` comments are ignored.

use crate::error::{FreshenError, Result};
use std::path::Path;

/// Load the ordered entry id list from an order file.
///
/// A missing file is [`FreshenError::OrderFileMissing`] — fatal on an `all`
/// invocation.
pub fn load_order(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|_| FreshenError::OrderFileMissing {
        path: path.to_path_buf(),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
