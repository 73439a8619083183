//! Atomic output writes:
//! - create parent directories (if needed)
//! - write to a temp file in the same directory (avoids cross-device renames)
//! - flush + `sync_all`
//! - rename into place with replace semantics

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` returns `Some("")` for bare relative file names like `out.xlsx`.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Atomically replace `dest` with `bytes`.
///
/// If anything fails before the rename, `dest` is left untouched and the temp
/// file is removed when it goes out of scope.
pub(crate) fn atomic_write_bytes(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.as_file_mut().write_all(bytes)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(dest).map_err(|err| err.error)?;

    // Best-effort: the file is already in place.
    let _ = sync_parent_dir(dest);
    Ok(())
}

fn sync_parent_dir(path: &Path) -> io::Result<()> {
    // Opening a directory as a file works on most Unix platforms; elsewhere this
    // fails and callers ignore it.
    let dir = File::open(parent_dir_or_dot(path))?;
    dir.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dest = tmp.path().join("nested/dir/out.bin");

        atomic_write_bytes(&dest, b"hello").expect("atomic write");
        assert_eq!(std::fs::read(&dest).expect("read file"), b"hello");
    }

    #[test]
    fn replaces_existing_file_without_leaving_temp_files() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dest = tmp.path().join("existing.bin");
        std::fs::write(&dest, b"old-bytes").expect("seed existing file");

        atomic_write_bytes(&dest, b"new-bytes").expect("atomic write");
        assert_eq!(std::fs::read(&dest).expect("read file"), b"new-bytes");

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .expect("read_dir")
            .collect::<Result<Vec<_>, _>>()
            .expect("list dir")
            .into_iter()
            .map(|e| e.path())
            .collect();
        assert_eq!(names, vec![dest]);
    }
}
