use std::io;
use std::path::PathBuf;

/// Create every directory in `paths`, parents included.
///
/// Idempotent: already-existing directories are not an error. Never removes
/// anything.
pub fn ensure_directories(paths: &[PathBuf]) -> io::Result<()> {
    for path in paths {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
