use std::path::{Path, PathBuf};

pub fn absolute_path(path: PathBuf) -> crate::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Writes `content` into `path`, creating missing parent directories.
pub fn write_file(path: &Path, content: &[u8]) -> crate::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
