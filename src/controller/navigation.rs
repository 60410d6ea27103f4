use std::path::Path;

use tracing::{info, warn};

use super::DirTreeController;
use crate::{entry::EntryRef, tree::NodeId};

impl DirTreeController {
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Navigate to `path`, materializing and expanding every directory on the way.
    ///
    /// Returns `true` when `path` is already current or was selected, and
    /// `false` when it could not be resolved. The current path is updated
    /// either way.
    pub fn set_path(&mut self, path: &Path) -> bool {
        if self.current_path.as_deref() == Some(path) {
            return true;
        }
        self.current_path = Some(path.to_path_buf());
        let Some(node) = self.tree.materialize(path, true, false) else {
            warn!(path = %path.display(), "Unable to navigate to directory");
            return false;
        };
        self.tree.view_mut().reveal(node);
        self.select(node)
    }

    /// Select `node` exactly as a user click would.
    ///
    /// The node is re-synced lazily, expanded, recorded as the current
    /// path, and reported to the selection callback. Returns `false` when
    /// the node vanished in the meantime.
    pub fn select(&mut self, node: NodeId) -> bool {
        if !self.tree.contains(node) {
            return false;
        }
        self.selection_gate = true;
        self.tree.view_mut().select_row(node);
        self.selection_gate = false;

        let hint = self.current_path.clone();
        if !self.tree.sync(node, false, hint.as_deref()) {
            return false;
        }
        self.tree.set_view_expanded(node, true);
        self.tree.targets_mut().selected = Some(node);
        let Some(path) = self.tree.path_of(node) else {
            return false;
        };
        info!(path = %path.display(), "Directory selected");
        self.current_path = Some(path.clone());
        if let Some(callback) = self.on_select.as_mut() {
            callback(&path);
        }
        true
    }

    /// Select the node holding `entry`, if it is in the tree.
    pub fn select_entry(&mut self, entry: &EntryRef) -> bool {
        match self.tree.find(entry) {
            Some(node) => self.select(node),
            None => false,
        }
    }

    /// Re-read every directory on the current path without changing the selection.
    pub fn refresh(&mut self) -> bool {
        let Some(path) = self.current_path.clone() else {
            return false;
        };
        self.tree.materialize(&path, false, true).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::TreeOptions,
        test_support::{MemoryFs, RecordingView, ViewEvent},
        tree::DirTree,
    };
    use std::{cell::RefCell, path::PathBuf, rc::Rc};

    fn controller_over(fs: &MemoryFs, view: RecordingView) -> DirTreeController {
        let tree = DirTree::new(fs.clone(), view, TreeOptions::default());
        DirTreeController::new(tree).with_file_ops(fs.clone())
    }

    fn record_selections(controller: &mut DirTreeController) -> Rc<RefCell<Vec<PathBuf>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.set_select_callback(move |path| sink.borrow_mut().push(path.to_path_buf()));
        seen
    }

    #[test]
    fn set_path_expands_and_selects_once() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/home/user");
        let view = RecordingView::default();
        let log = view.log();
        let mut controller = controller_over(&fs, view);
        let seen = record_selections(&mut controller);

        assert!(controller.set_path(Path::new("/home/user")));

        let tree = controller.tree();
        let home = tree.find_child_by_name(tree.root(), "home").unwrap();
        let user = tree.find_child_by_name(home, "user").unwrap();
        assert!(tree.node(home).unwrap().is_view_expanded());
        assert!(tree.node(user).unwrap().is_view_expanded());
        assert!(tree.node(user).unwrap().is_expanded());
        assert_eq!(*seen.borrow(), vec![PathBuf::from("/home/user")]);
        assert_eq!(tree.targets().selected, Some(user));
        assert!(log.events().contains(&ViewEvent::Reveal(user)));
        assert!(log.events().contains(&ViewEvent::Select(user)));
    }

    #[test]
    fn set_path_to_current_path_is_a_no_op() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/pics");
        let mut controller = controller_over(&fs, RecordingView::default());
        let seen = record_selections(&mut controller);

        assert!(controller.set_path(Path::new("/pics")));
        assert!(controller.set_path(Path::new("/pics")));

        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn unresolvable_path_updates_current_path_without_selecting() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/pics");
        let mut controller = controller_over(&fs, RecordingView::default());
        let seen = record_selections(&mut controller);

        assert!(!controller.set_path(Path::new("/pics/missing")));

        assert_eq!(controller.current_path(), Some(Path::new("/pics/missing")));
        assert!(seen.borrow().is_empty());
        assert_eq!(controller.tree().targets().selected, None);
    }

    #[test]
    fn selection_gate_is_open_only_during_native_select() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/pics");
        let mut controller = controller_over(&fs, RecordingView::default());
        assert!(!controller.allow_native_selection());
        controller.set_path(Path::new("/pics"));
        assert!(!controller.allow_native_selection());
    }

    #[test]
    fn refresh_picks_up_new_directories() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/pics/a");
        let mut controller = controller_over(&fs, RecordingView::default());
        controller.set_path(Path::new("/pics"));
        let pics = controller.tree().find_by_path(Path::new("/pics")).unwrap();

        fs.mkdir_p("/pics/b");
        assert!(controller.refresh());

        assert_eq!(controller.tree().children(pics).len(), 2);
        assert_eq!(controller.tree().targets().selected, Some(pics));
    }

    #[test]
    fn select_entry_uses_tree_identity() {
        let fs = MemoryFs::new();
        fs.mkdir_p("/pics/a");
        let mut controller = controller_over(&fs, RecordingView::default());
        controller.set_path(Path::new("/pics"));
        let a = controller.tree().find_by_path(Path::new("/pics/a")).unwrap();
        let entry = controller.tree().entry(a).unwrap().clone();

        assert!(controller.select_entry(&entry));
        assert_eq!(controller.current_path(), Some(Path::new("/pics/a")));
    }
}
