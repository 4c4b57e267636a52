// File Operations for Key Blobs
// Reads and writes raw key blobs and message files

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::crypto::KeyMaterial;

/// File name of the private half written by [`write_key_material`]
pub const PRIVATE_KEY_FILE: &str = "private.der";
/// File name of the public half written by [`write_key_material`]
pub const PUBLIC_KEY_FILE: &str = "public.der";

/// Errors that can occur during file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} is empty")]
    Empty(PathBuf),
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> FileError + '_ {
    move |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> FileResult<Vec<u8>> {
    let mut file = File::open(path).map_err(io_error(path))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(io_error(path))?;
    Ok(data)
}

/// Read a key blob; an empty file is reported here rather than as a parse failure
pub fn read_key_file(path: &Path) -> FileResult<Vec<u8>> {
    let data = read_file(path)?;
    if data.is_empty() {
        return Err(FileError::Empty(path.to_path_buf()));
    }
    Ok(data)
}

/// Write data to file
pub fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    let mut file = File::create(path).map_err(io_error(path))?;
    file.write_all(data).map_err(io_error(path))?;
    Ok(())
}

/// Write data readable by the owner only (0600 on unix)
pub fn write_private_file(path: &Path, data: &[u8]) -> FileResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(io_error(path))?;
    file.write_all(data).map_err(io_error(path))?;
    Ok(())
}

/// Write both halves of `material` into `dir`, creating it if needed.
/// Returns the (private, public) paths.
pub fn write_key_material(dir: &Path, material: &KeyMaterial) -> FileResult<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    let private_path = dir.join(PRIVATE_KEY_FILE);
    let public_path = dir.join(PUBLIC_KEY_FILE);
    write_private_file(&private_path, material.private_key())?;
    write_file(&public_path, material.public_key())?;

    Ok((private_path, public_path))
}

/// Load both halves written by [`write_key_material`]
pub fn read_key_material(dir: &Path) -> FileResult<KeyMaterial> {
    let private_key = read_key_file(&dir.join(PRIVATE_KEY_FILE))?;
    let public_key = read_key_file(&dir.join(PUBLIC_KEY_FILE))?;
    Ok(KeyMaterial::new(private_key, public_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_material_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let material = KeyMaterial::new(vec![1, 2, 3], vec![4, 5, 6]);

        let (private_path, public_path) = write_key_material(dir.path(), &material).unwrap();
        assert_eq!(read_file(&private_path).unwrap(), vec![1, 2, 3]);
        assert_eq!(read_file(&public_path).unwrap(), vec![4, 5, 6]);
        let loaded = read_key_material(dir.path()).unwrap();
        assert_eq!(loaded.private_key(), material.private_key());
        assert_eq!(loaded.public_key(), material.public_key());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret");
        write_private_file(&path, b"secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_empty_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.der");
        write_file(&path, b"").unwrap();

        assert!(matches!(read_key_file(&path), Err(FileError::Empty(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(&dir.path().join("missing"));
        assert!(matches!(result, Err(FileError::Io { .. })));
    }
}
