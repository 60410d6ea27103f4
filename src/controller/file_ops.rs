use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use super::DirTreeController;
use crate::{provider::StatProvider, tree::NodeId};

const NEW_FOLDER_NAME: &str = "new_folder";

/// On-disk directory operations triggered from the tree.
pub trait FileOps {
    fn rename_dir(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    /// Remove `path` and everything below it.
    fn delete_dir(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileOps;

impl FileOps for LocalFileOps {
    fn rename_dir(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn delete_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// Errors returned by folder operations started from the tree.
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("No directory is targeted")]
    NoTarget,
    #[error("Invalid folder name: {0}")]
    InvalidName(String),
    #[error("Folder already exists: {path}")]
    AlreadyExists { path: PathBuf },
    #[error("Folder is not writable: {path}")]
    NotWritable { path: PathBuf },
    #[error("Folder not found after {action}: {path}")]
    Missing { action: &'static str, path: PathBuf },
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

fn normalize_folder_name(name: &str) -> Result<String, FileOpError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FileOpError::InvalidName("name cannot be empty".into()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(FileOpError::InvalidName(trimmed.into()));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(FileOpError::InvalidName(format!(
            "{trimmed} contains a path separator"
        )));
    }
    Ok(trimmed.to_string())
}

/// First free `new_folder`, `new_folder.1`, `new_folder.2`, ... inside `dir`.
pub fn unique_folder_path<S: StatProvider + ?Sized>(fs: &S, dir: &Path) -> PathBuf {
    let first = dir.join(NEW_FOLDER_NAME);
    if !fs.exists(&first) {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("{NEW_FOLDER_NAME}.{n}")))
        .find(|candidate| !fs.exists(candidate))
        .unwrap_or(first)
}

impl DirTreeController {
    /// Row waiting for its inline rename to be committed.
    pub fn pending_rename(&self) -> Option<NodeId> {
        self.pending_rename
    }

    pub fn begin_rename(&mut self, node: NodeId) -> Result<(), FileOpError> {
        if node == self.tree.root() || self.tree.path_of(node).is_none() {
            return Err(FileOpError::NoTarget);
        }
        self.pending_rename = Some(node);
        Ok(())
    }

    pub fn cancel_rename(&mut self) {
        self.pending_rename = None;
    }

    /// Finish the rename started by [`begin_rename`](Self::begin_rename).
    pub fn commit_rename(&mut self, new_name: &str) -> Result<PathBuf, FileOpError> {
        let node = self.pending_rename.take().ok_or(FileOpError::NoTarget)?;
        self.rename_folder(node, new_name)
    }

    /// Rename `node` on disk and move the tree (and the current path) along.
    pub fn rename_folder(&mut self, node: NodeId, new_name: &str) -> Result<PathBuf, FileOpError> {
        if node == self.tree.root() {
            return Err(FileOpError::NoTarget);
        }
        let old_path = self.tree.path_of(node).ok_or(FileOpError::NoTarget)?;
        let name = normalize_folder_name(new_name)?;
        let new_path = old_path.with_file_name(&name);
        if new_path == old_path {
            return Ok(new_path);
        }
        if self.tree.fs().exists(&new_path) {
            return Err(FileOpError::AlreadyExists { path: new_path });
        }
        self.file_ops
            .rename_dir(&old_path, &new_path)
            .map_err(|source| FileOpError::Io {
                action: "rename",
                path: old_path.clone(),
                source,
            })?;
        info!(from = %old_path.display(), to = %new_path.display(), "Renamed folder");

        self.tree.materialize(&new_path, true, true);
        if self.current_path.as_deref() == Some(old_path.as_path()) {
            self.set_path(&new_path);
        }
        Ok(new_path)
    }

    /// Create a uniquely named folder inside `parent` and queue it for renaming.
    pub fn create_folder(&mut self, parent: NodeId) -> Result<NodeId, FileOpError> {
        let dir = self.tree.path_of(parent).ok_or(FileOpError::NoTarget)?;
        if !self.tree.fs().is_writable(&dir) {
            return Err(FileOpError::NotWritable { path: dir });
        }
        let path = unique_folder_path(self.tree.fs(), &dir);
        self.file_ops
            .create_dir(&path)
            .map_err(|source| FileOpError::Io {
                action: "create",
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "Created folder");
        let node = self
            .tree
            .materialize(&path, true, true)
            .ok_or(FileOpError::Missing {
                action: "create",
                path,
            })?;
        self.pending_rename = Some(node);
        Ok(node)
    }

    /// Delete `node` from disk and prune it from the tree.
    pub fn delete_folder(&mut self, node: NodeId) -> Result<(), FileOpError> {
        let path = self.tree.path_of(node).ok_or(FileOpError::NoTarget)?;
        let parent = self.tree.parent(node).ok_or(FileOpError::NoTarget)?;
        self.file_ops
            .delete_dir(&path)
            .map_err(|source| FileOpError::Io {
                action: "delete",
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "Deleted folder");
        if self.pending_rename == Some(node) {
            self.pending_rename = None;
        }
        self.tree.sync(parent, true, None);
        Ok(())
    }
}
