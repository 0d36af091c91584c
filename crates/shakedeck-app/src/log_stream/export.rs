//! Writing exported live logs to disk

use std::path::{Path, PathBuf};

use shakedeck_core::prelude::*;

use super::session::LogExport;

/// Write `export` into `directory`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn write_export(directory: &Path, export: &LogExport) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .context(format!("Failed to create export directory {}", directory.display()))?;
    let path = directory.join(&export.file_name);
    let mut contents = export.contents.clone();
    contents.push('\n');
    std::fs::write(&path, contents).context(format!("Failed to write {}", path.display()))?;
    info!(
        "Exported {} log lines to {}",
        export.line_count,
        path.display()
    );
    Ok(path)
}
