//! Filesystem storage for uploaded bytes (covers, avatars, editor
//! images). Paths are always relative to the upload root; the HTTP
//! layer serves the root as static files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write seam for uploaded files. Tests substitute recording or
/// failing stores to drive the lifecycle paths.
pub trait CoverStore: Send + Sync {
    fn save(&self, rel_path: &str, data: &[u8]) -> io::Result<()>;
}

/// Filesystem store rooted at the upload directory.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CoverStore for Storage {
    fn save(&self, rel_path: &str, data: &[u8]) -> io::Result<()> {
        let path = self.root.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }
}

/// Extension of an uploaded filename, dot included. Empty when the
/// name has none.
pub fn file_ext(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = Storage::new(dir.path().join("uploads")).unwrap();

        store.save("users/u1/covers/a1.png", b"bytes").unwrap();

        let on_disk = fs::read(dir.path().join("uploads/users/u1/covers/a1.png")).unwrap();
        assert_eq!(on_disk, b"bytes");
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Storage::new(dir.path()).unwrap();

        store.save("a.txt", b"one").unwrap();
        store.save("a.txt", b"two").unwrap();

        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"two");
    }

    #[test]
    fn file_ext_keeps_dot_and_case() {
        assert_eq!(file_ext("photo.PNG"), ".PNG");
        assert_eq!(file_ext("archive.tar.gz"), ".gz");
        assert_eq!(file_ext("noext"), "");
        assert_eq!(file_ext(".bashrc"), "");
    }
}
