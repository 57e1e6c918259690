//! Recursive expansion of command-line inputs.
//!
//! Directories are walked with [`walkdir`] without following symlinks, so
//! symlinked entries inside a tree are skipped and cycles cannot occur.
//! Inputs that are not directories (including the `-` stdin sentinel) pass
//! through untouched.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Expand `inputs` into a flat list of files, in walk order.
pub fn create_file_list(inputs: &[&Path]) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            result.push(input.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let msg = e.to_string();
                e.into_io_error().unwrap_or_else(|| io::Error::other(msg))
            })?;
            if entry.file_type().is_file() {
                result.push(entry.into_path());
            }
        }
    }
    Ok(result)
}
