//! Lazily populated mirror of the file-system directory hierarchy.
//!
//! Nodes live in an [`indextree`] arena rooted at `/`. A node's children are
//! read from disk only when something needs them (expansion, navigation,
//! drag hover) and later listings are merged into the existing children so
//! unrelated expanded subtrees survive a refresh.

mod materialize;
mod rows;
mod store;
mod sync;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    rc::Rc,
    time::Instant,
};

use indextree::Arena;
pub use indextree::NodeId;
use tracing::debug;

pub use materialize::PathPart;
pub use rows::TreeRow;

use crate::{
    config::TreeOptions,
    entry::{EntryRef, FileData},
    provider::FileSystem,
    view::TreeView,
};

const ROOT_PATH: &str = "/";

/// One directory (or the expander placeholder) in the tree.
#[derive(Debug)]
pub struct DirNode {
    entry: EntryRef,
    populated: bool,
    last_sync: Instant,
    placeholder: bool,
    view_expanded: bool,
    highlighted: bool,
}

impl DirNode {
    fn new(entry: EntryRef) -> Self {
        Self {
            entry,
            populated: false,
            last_sync: Instant::now(),
            placeholder: false,
            view_expanded: false,
            highlighted: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            entry: FileData::placeholder(),
            populated: true,
            last_sync: Instant::now(),
            placeholder: true,
            view_expanded: false,
            highlighted: false,
        }
    }

    pub fn entry(&self) -> &EntryRef {
        &self.entry
    }

    /// True once the children have been read from disk at least once.
    pub fn is_expanded(&self) -> bool {
        self.populated
    }

    pub fn last_sync_time(&self) -> Instant {
        self.last_sync
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Expanded state as last pushed to the view.
    pub fn is_view_expanded(&self) -> bool {
        self.view_expanded
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// Nodes that components outside the tree keep pointing at.
///
/// Whenever a node is destroyed every slot referring to it, or to any node
/// in its subtree, is reset to `None` before the node leaves the arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetRefs {
    /// Row under the last button press, used by menus and drags.
    pub click: Option<NodeId>,
    /// Row currently hovered by an incoming drag.
    pub drop: Option<NodeId>,
    /// Row most recently selected.
    pub selected: Option<NodeId>,
}

impl TargetRefs {
    fn release(&mut self, doomed: &HashSet<NodeId>) {
        for slot in [&mut self.click, &mut self.drop, &mut self.selected] {
            if slot.is_some_and(|id| doomed.contains(&id)) {
                *slot = None;
            }
        }
    }
}

/// Owner of the arena, the file-system provider and the view adapter.
pub struct DirTree {
    arena: Arena<DirNode>,
    root: NodeId,
    fs: Box<dyn FileSystem>,
    view: Box<dyn TreeView>,
    options: TreeOptions,
    targets: TargetRefs,
    busy_ref: usize,
}

impl DirTree {
    /// Build a tree with the root node expanded and populated once.
    pub fn new(
        fs: impl FileSystem + 'static,
        view: impl TreeView + 'static,
        options: TreeOptions,
    ) -> Self {
        let root_path = Path::new(ROOT_PATH);
        let root_entry = fs
            .stat(root_path)
            .unwrap_or_else(|| FileData::new(root_path, true, 0, None));
        let mut arena = Arena::new();
        let root = arena.new_node(DirNode::new(root_entry));
        let placeholder = arena.new_node(DirNode::placeholder());
        root.append(placeholder, &mut arena);
        let mut tree = Self {
            arena,
            root,
            fs: Box::new(fs),
            view: Box::new(view),
            options,
            targets: TargetRefs::default(),
            busy_ref: 0,
        };
        tree.set_view_expanded(root, true);
        tree.materialize(root_path, false, false);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node payload, or `None` for ids whose node has been destroyed.
    pub fn node(&self, id: NodeId) -> Option<&DirNode> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id).map(|node| node.get())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DirNode> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some() && !id.is_removed(&self.arena)
    }

    pub fn entry(&self, id: NodeId) -> Option<&EntryRef> {
        self.node(id).map(DirNode::entry)
    }

    pub fn path_of(&self, id: NodeId) -> Option<PathBuf> {
        self.node(id)
            .filter(|node| !node.placeholder)
            .map(|node| node.entry.path().to_path_buf())
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TreeOptions {
        &mut self.options
    }

    pub fn targets(&self) -> &TargetRefs {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetRefs {
        &mut self.targets
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn TreeView {
        self.view.as_mut()
    }

    /// Number of real (non-placeholder) nodes, root included.
    pub fn len(&self) -> usize {
        self.root
            .descendants(&self.arena)
            .filter(|id| !self.arena[*id].get().placeholder)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand or collapse a node in the view and remember the state for rows.
    pub fn set_view_expanded(&mut self, id: NodeId, expanded: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.placeholder {
            return;
        }
        node.view_expanded = expanded;
        let entry = Rc::clone(&node.entry);
        self.view.set_expanded(id, entry.path(), expanded);
    }

    /// Note an expansion the view performed itself, without echoing it back.
    pub fn record_view_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.node_mut(id)
            && !node.placeholder
        {
            node.view_expanded = expanded;
        }
    }

    pub fn set_highlight(&mut self, id: NodeId, highlighted: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.highlighted = highlighted;
        self.view.set_highlight(id, highlighted);
    }

    /// Release every node below the root and forget all external targets.
    /// The root goes back to its never-read state.
    pub fn clear(&mut self) {
        let children: Vec<NodeId> = self.root.children(&self.arena).collect();
        for child in children {
            child.remove_subtree(&mut self.arena);
        }
        self.targets = TargetRefs::default();
        let placeholder = self.arena.new_node(DirNode::placeholder());
        self.root.append(placeholder, &mut self.arena);
        let root = self.arena[self.root].get_mut();
        root.populated = false;
        root.highlighted = false;
        debug!("Directory tree cleared");
    }

    pub(crate) fn busy_push(&mut self) {
        if self.busy_ref == 0 {
            self.view.set_busy(true);
        }
        self.busy_ref += 1;
    }

    pub(crate) fn busy_pop(&mut self) {
        if self.busy_ref == 1 {
            self.view.set_busy(false);
        }
        self.busy_ref = self.busy_ref.saturating_sub(1);
    }
}

impl std::fmt::Debug for DirTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirTree")
            .field("root", &self.root)
            .field("nodes", &self.len())
            .field("targets", &self.targets)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryFs, RecordingView, ViewEvent};

    #[test]
    fn new_tree_populates_root_once() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/home/user");
        fs.mkdir_p("/etc");
        let tree = DirTree::new(fs.clone(), RecordingView::default(), TreeOptions::default());

        let root = tree.node(tree.root()).unwrap();
        assert!(root.is_expanded());
        assert!(root.is_view_expanded());
        assert_eq!(fs.reads("/"), 1);
        let names: Vec<&str> = tree
            .children(tree.root())
            .into_iter()
            .map(|id| tree.entry(id).unwrap().name())
            .collect();
        assert_eq!(names, vec!["etc", "home"]);
    }

    #[test]
    fn busy_indicator_coalesces_nested_pushes() {
        let view = RecordingView::default();
        let log = view.log();
        let mut tree = DirTree::new(MemoryFs::new(), view, TreeOptions::default());
        log.clear();

        tree.busy_push();
        tree.busy_push();
        tree.busy_pop();
        tree.busy_pop();
        tree.busy_pop();

        assert_eq!(
            log.events(),
            vec![ViewEvent::Busy(true), ViewEvent::Busy(false)]
        );
    }

    #[test]
    fn clear_releases_everything_but_root() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/a/b");
        let mut tree = DirTree::new(fs.clone(), RecordingView::default(), TreeOptions::default());
        let a = tree.materialize(Path::new("/a/b"), true, false).unwrap();
        tree.targets_mut().click = Some(a);

        tree.clear();

        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(a));
        assert_eq!(*tree.targets(), TargetRefs::default());
        assert!(!tree.node(tree.root()).unwrap().is_expanded());
        assert_eq!(tree.child_ids(tree.root()).len(), 1);
    }
}
