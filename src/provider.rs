//! File-system collaborators consumed by the tree: directory listing and stat.
//!
//! The tree never touches `std::fs` directly; it asks a [`FileSystem`] so the
//! sync engine can be driven against an in-memory file system in tests.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::warn;

use crate::entry::{EntryRef, FileData};

/// Lists the immediate children of a directory.
pub trait ListingProvider {
    /// Return every child of `path` in listing order. Nothing is filtered:
    /// hidden entries, files, and pseudo entries are the caller's concern.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryRef>>;
}

/// Point queries about a single path.
pub trait StatProvider {
    fn is_directory(&self, path: &Path) -> bool;
    fn modification_time(&self, path: &Path) -> Option<SystemTime>;
    fn exists(&self, path: &Path) -> bool;
    /// Whether entries may be created inside `path` (write and search access).
    fn is_writable(&self, path: &Path) -> bool;
    /// Build an entry for `path`, or `None` when it cannot be stat-ed.
    fn stat(&self, path: &Path) -> Option<EntryRef>;
}

/// Combined provider handed to the tree.
pub trait FileSystem: ListingProvider + StatProvider {}

impl<T: ListingProvider + StatProvider> FileSystem for T {}

/// Provider backed by the local file system through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ListingProvider for LocalFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryRef>> {
        let mut entries = Vec::new();
        for entry_result in fs::read_dir(path)? {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        dir = %path.display(),
                        error = %err,
                        "Failed to read directory entry"
                    );
                    continue;
                }
            };
            let child = entry.path();
            // Follow symlinks so linked directories are browsable.
            let meta = match fs::metadata(&child) {
                Ok(meta) => meta,
                Err(_) => match entry.metadata() {
                    Ok(meta) => meta,
                    Err(_) => continue,
                },
            };
            entries.push(FileData::new(
                child,
                meta.is_dir(),
                meta.len(),
                meta.modified().ok(),
            ));
        }
        Ok(entries)
    }
}

impl StatProvider for LocalFs {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|meta| meta.modified()).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_writable(&self, path: &Path) -> bool {
        access_write(path)
    }

    fn stat(&self, path: &Path) -> Option<EntryRef> {
        let meta = fs::metadata(path).ok()?;
        Some(FileData::new(
            PathBuf::from(path),
            meta.is_dir(),
            meta.len(),
            meta.modified().ok(),
        ))
    }
}

#[cfg(not(target_os = "windows"))]
fn access_write(path: &Path) -> bool {
    use std::{ffi::CString, os::unix::ffi::OsStrExt};

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) == 0 }
}

#[cfg(target_os = "windows")]
fn access_write(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}
