use std::fs;
use std::path::Path;

use crate::GeneratedFile;
use crate::error::GenerateError;

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every file under `dir`, one after another. Not transactional: a
/// failure leaves earlier files in place.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<(), GenerateError> {
    for file in files {
        let path = dir.join(&file.path);
        log::debug!("writing {}", path.display());
        write_file(&path, &file.content)?;
    }
    Ok(())
}
