//! Directory entry model shared between the file-system providers and the tree.

use std::{
    cell::Cell,
    path::{Path, PathBuf},
    rc::Rc,
    time::SystemTime,
};

/// Counted handle to a [`FileData`]. Identity comparisons use [`Rc::ptr_eq`].
pub type EntryRef = Rc<FileData>;

/// A file-system object as last seen by a listing or stat call.
///
/// Size and modification time are the recorded values; they are refreshed in
/// place by the sync engine when a newer listing reports different facts.
#[derive(Debug)]
pub struct FileData {
    path: PathBuf,
    name: String,
    is_dir: bool,
    size: Cell<u64>,
    modified: Cell<Option<SystemTime>>,
}

impl FileData {
    /// Create a counted entry for `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        is_dir: bool,
        size: u64,
        modified: Option<SystemTime>,
    ) -> EntryRef {
        let path = path.into();
        let name = display_name(&path);
        Rc::new(Self {
            path,
            name,
            is_dir,
            size: Cell::new(size),
            modified: Cell::new(modified),
        })
    }

    /// Entry backing the expander placeholder row. It has no path and no name.
    pub(crate) fn placeholder() -> EntryRef {
        Rc::new(Self {
            path: PathBuf::new(),
            name: String::new(),
            is_dir: false,
            size: Cell::new(0),
            modified: Cell::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name; `/` for the file-system root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn size(&self) -> u64 {
        self.size.get()
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified.get()
    }

    pub(crate) fn record(&self, size: u64, modified: Option<SystemTime>) {
        self.size.set(size);
        self.modified.set(modified);
    }

    pub(crate) fn record_modified(&self, modified: Option<SystemTime>) {
        self.modified.set(modified);
    }

    /// True for `.` and `..`, which listings may report but the tree never shows.
    pub fn is_pseudo(&self) -> bool {
        self.name == "." || self.name == ".."
    }

    pub fn is_hidden(&self) -> bool {
        is_hidden_name(&self.name)
    }
}

pub(crate) fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

// Last separator-delimited segment, so `.` and `..` survive as names.
fn display_name(path: &Path) -> String {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if path.has_root() => "/".to_string(),
        _ => String::new(),
    }
}
