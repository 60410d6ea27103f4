//! Navigation, input and menu handling on top of a [`DirTree`].
//!
//! [`DirTreeController`] owns the tree, the single "current path" value and
//! the drop coordinator. Programmatic navigation and user clicks both end up
//! in [`DirTreeController::select`].

mod file_ops;
mod input;
mod menu;
mod navigation;

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::debug;

pub use file_ops::{FileOpError, FileOps, LocalFileOps, unique_folder_path};
pub use input::{PointerButton, RowHit, TreeKey};
pub use menu::{AppActions, ContextMenu, MenuAction, MenuItem, MenuOutcome, NoActions};

use crate::{
    drop::DropCoordinator,
    tree::{DirTree, NodeId},
};

/// Called with the selected directory whenever a selection completes.
pub type SelectCallback = Box<dyn FnMut(&Path)>;

pub struct DirTreeController {
    tree: DirTree,
    current_path: Option<PathBuf>,
    on_select: Option<SelectCallback>,
    selection_gate: bool,
    drop: DropCoordinator,
    actions: Box<dyn AppActions>,
    file_ops: Box<dyn FileOps>,
    pending_rename: Option<NodeId>,
}

impl DirTreeController {
    /// Wrap `tree` with local file operations and no application actions.
    pub fn new(tree: DirTree) -> Self {
        let drop = DropCoordinator::new(tree.options());
        Self {
            tree,
            current_path: None,
            on_select: None,
            selection_gate: false,
            drop,
            actions: Box::new(NoActions),
            file_ops: Box::new(LocalFileOps),
            pending_rename: None,
        }
    }

    pub fn with_actions(mut self, actions: impl AppActions + 'static) -> Self {
        self.actions = Box::new(actions);
        self
    }

    pub fn with_file_ops(mut self, file_ops: impl FileOps + 'static) -> Self {
        self.file_ops = Box::new(file_ops);
        self
    }

    pub fn set_select_callback(&mut self, callback: impl FnMut(&Path) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn tree(&self) -> &DirTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DirTree {
        &mut self.tree
    }

    pub fn drop_coordinator(&self) -> &DropCoordinator {
        &self.drop
    }

    /// Split borrow used to drive drag and drop against the owned tree.
    pub fn drop_parts(&mut self) -> (&mut DropCoordinator, &mut DirTree) {
        (&mut self.drop, &mut self.tree)
    }

    /// Run due drag-and-drop timers. Returns whether the tree changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let hint = self.current_path.clone();
        self.drop.tick(&mut self.tree, now, hint.as_deref())
    }

    /// Whether a native selection event arriving right now came from the controller.
    ///
    /// View adapters call this from their native selection handler and
    /// ignore selections made while it returns `false`.
    pub fn allow_native_selection(&self) -> bool {
        self.selection_gate
    }

    /// Cancel scheduled work and release every node. The controller is
    /// unusable for navigation until [`set_path`](Self::set_path) runs again.
    pub fn shutdown(&mut self) {
        self.drop.cancel_all(&mut self.tree);
        self.tree.clear();
        self.current_path = None;
        self.pending_rename = None;
        debug!("Directory tree controller shut down");
    }

    fn set_click_target(&mut self, node: Option<NodeId>) {
        if let Some(previous) = self.tree.targets().click {
            self.tree.set_highlight(previous, false);
        }
        let node = node.filter(|id| self.tree.contains(*id));
        self.tree.targets_mut().click = node;
        if let Some(id) = node {
            self.tree.set_highlight(id, true);
        }
    }
}

impl std::fmt::Debug for DirTreeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirTreeController")
            .field("tree", &self.tree)
            .field("current_path", &self.current_path)
            .field("pending_rename", &self.pending_rename)
            .field("drop", &self.drop)
            .finish()
    }
}
