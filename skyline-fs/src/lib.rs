//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Every helper resolves an ambient directory handle for the supplied path
//! and performs the operation through it, keeping the data pipelines free of
//! raw `std::fs` calls.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Resolve an ambient directory for the given path and return the directory
/// with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_string();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Return the exact byte length of the file at `path`.
pub fn file_size(path: &Utf8Path) -> io::Result<u64> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.len())
}

/// Read the whole file at `path` into a string.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Create or truncate the file at `path` with the supplied contents.
///
/// The parent directory must already exist; pair with [`ensure_parent_dir`]
/// when the destination tree may be absent.
pub fn write_file(path: &Utf8Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

/// Ensure the parent directory for `path` exists, creating it and any
/// missing ancestors when absent.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        (
            Utf8Path::new("/"),
            parent.strip_prefix("/").unwrap_or(parent),
        )
    } else {
        (Utf8Path::new("."), parent)
    };
    if relative.as_str().is_empty() {
        return Ok(());
    }
    let dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority())?;
    dir.create_dir_all(relative)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 path")
    }

    #[rstest]
    fn writes_and_reads_back(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "manifest.json");
        write_file(&path, "{}\n").expect("write file");
        assert_eq!(read_to_string(&path).expect("read file"), "{}\n");
    }

    #[rstest]
    fn reports_exact_file_size(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "region.db");
        write_file(&path, vec![0u8; 1000]).expect("write file");
        assert_eq!(file_size(&path).expect("file size"), 1000);
    }

    #[rstest]
    fn distinguishes_files_from_directories(temp_dir: TempDir) {
        let file = utf8_path(&temp_dir, "present.txt");
        write_file(&file, "x").expect("write file");
        assert!(file_is_file(&file).expect("metadata"));

        let dir = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("utf-8 path");
        assert!(!file_is_file(&dir).expect("metadata"));
    }

    #[rstest]
    fn missing_files_surface_not_found(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "absent.txt");
        let err = file_size(&path).expect_err("missing file should error");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[rstest]
    fn creates_nested_parent_directories(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "a/b/c/manifest.json");
        ensure_parent_dir(&path).expect("create parents");
        write_file(&path, "{}\n").expect("write into created tree");
        assert!(file_is_file(&path).expect("metadata"));
    }

    #[rstest]
    fn parent_creation_is_idempotent(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "a/manifest.json");
        ensure_parent_dir(&path).expect("create parents");
        ensure_parent_dir(&path).expect("create parents again");
    }
}
