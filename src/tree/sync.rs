use std::{
    collections::{HashMap, HashSet},
    path::{Component, Path, PathBuf},
    rc::Rc,
    time::Instant,
};

use indextree::NodeId;
use tracing::{debug, warn};

use super::DirTree;
use crate::entry::{EntryRef, FileData, is_hidden_name};

/// What a sync pass did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    /// The directory is gone (or the node was invalid) and the node was pruned.
    Removed,
    /// The children are considered current; nothing was read.
    Skipped,
    /// The directory was listed and merged into the children.
    Refreshed,
}

impl SyncOutcome {
    fn is_valid(self) -> bool {
        !matches!(self, SyncOutcome::Removed)
    }
}

impl DirTree {
    /// Bring the children of `id` in line with the directory on disk.
    ///
    /// Returns `false` when the node no longer exists afterwards (it was
    /// pruned, or `id` was a placeholder or stale id). `hint` is the path
    /// being navigated to; it lets a hidden directory on that path appear
    /// even when hidden entries are not shown.
    pub fn sync(&mut self, id: NodeId, force: bool, hint: Option<&Path>) -> bool {
        self.sync_node(id, force, hint).is_valid()
    }

    pub(crate) fn sync_node(&mut self, id: NodeId, force: bool, hint: Option<&Path>) -> SyncOutcome {
        let Some(node) = self.node(id) else {
            return SyncOutcome::Removed;
        };
        if node.placeholder {
            return SyncOutcome::Removed;
        }
        let entry = Rc::clone(&node.entry);
        let populated = node.populated;
        let last_sync = node.last_sync;
        let path = entry.path();
        let now = Instant::now();

        let lazy = populated && !force;
        if lazy && now.saturating_duration_since(last_sync) < self.options.rescan_interval() {
            return SyncOutcome::Skipped;
        }
        if (populated || force) && id != self.root && !self.fs.is_directory(path) {
            debug!(dir = %path.display(), "Directory vanished; pruning node");
            self.remove(id);
            return SyncOutcome::Removed;
        }
        if lazy && self.fs.modification_time(path) == entry.modified() {
            return SyncOutcome::Skipped;
        }

        self.busy_push();
        let modified = self.fs.modification_time(path);
        let fresh = self.read_listing(&entry, hint);
        debug!(dir = %path.display(), entries = fresh.len(), force, "Read directory");
        self.merge(id, fresh, hint);
        self.busy_pop();

        entry.record_modified(modified);
        if let Some(node) = self.node_mut(id) {
            node.populated = true;
            node.last_sync = now;
        }
        SyncOutcome::Refreshed
    }

    fn read_listing(&self, entry: &FileData, hint: Option<&Path>) -> Vec<EntryRef> {
        let dir = entry.path();
        let listed = match self.fs.list_directory(dir) {
            Ok(listed) => listed,
            Err(err) => {
                warn!(
                    dir = %dir.display(),
                    error = %err,
                    "Failed to list directory; treating as empty"
                );
                Vec::new()
            }
        };
        let show_hidden = self.options.show_hidden_files;
        let mut fresh: Vec<EntryRef> = listed
            .into_iter()
            .filter(|child| !child.is_pseudo() && child.is_dir())
            .filter(|child| show_hidden || !child.is_hidden())
            .collect();

        if !show_hidden
            && let Some(hidden) = hint.and_then(|target| hidden_child_on_path(dir, target))
            && !fresh.iter().any(|child| child.path() == hidden)
            && let Some(found) = self.fs.stat(&hidden)
            && found.is_dir()
        {
            fresh.insert(0, found);
        }
        fresh
    }

    fn merge(&mut self, id: NodeId, fresh: Vec<EntryRef>, hint: Option<&Path>) {
        let mut existing: HashMap<String, NodeId> = HashMap::new();
        let mut stale: HashSet<NodeId> = HashSet::new();
        for child in id.children(&self.arena) {
            let node = self.arena[child].get();
            if !node.placeholder {
                existing.insert(node.entry.name().to_string(), child);
            }
            stale.insert(child);
        }

        let mut listed: HashSet<String> = HashSet::new();
        for entry in fresh {
            if !listed.insert(entry.name().to_string()) {
                continue;
            }
            let Some(child) = existing.remove(entry.name()) else {
                self.insert_listed(id, entry, hint);
                continue;
            };
            stale.remove(&child);
            let Some(node) = self.node(child) else {
                continue;
            };
            let recorded = Rc::clone(&node.entry);
            if node.populated
                && recorded.modified() != entry.modified()
                && self.sync_node(child, false, hint) == SyncOutcome::Refreshed
            {
                recorded.record(entry.size(), entry.modified());
            }
        }

        for child in stale {
            if !self.contains(child) {
                continue;
            }
            if self.arena[child].get().placeholder {
                child.remove_subtree(&mut self.arena);
            } else {
                self.remove(child);
            }
        }
    }

    fn insert_listed(&mut self, parent: NodeId, entry: EntryRef, hint: Option<&Path>) {
        let Some(child) = self.insert(parent, entry) else {
            return;
        };
        let descend = self.options.descend_subdirs
            && self.node(parent).is_some_and(|node| node.view_expanded);
        if descend {
            self.sync_node(child, false, hint);
        }
    }
}

// `dir/<hidden>` when `target` lies strictly below `dir` and its next
// component is a hidden name.
fn hidden_child_on_path(dir: &Path, target: &Path) -> Option<PathBuf> {
    let rest = target.strip_prefix(dir).ok()?;
    let Some(Component::Normal(next)) = rest.components().next() else {
        return None;
    };
    is_hidden_name(&next.to_string_lossy()).then(|| dir.join(next))
}
