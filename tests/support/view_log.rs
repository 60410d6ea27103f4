use std::{cell::RefCell, path::PathBuf, rc::Rc};

use dirpane::{NodeId, TreeView};

/// View that remembers which rows were selected and expanded.
#[derive(Debug, Default, Clone)]
pub struct SharedView {
    inner: Rc<RefCell<ViewState>>,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub selected: Vec<NodeId>,
    pub expanded: Vec<PathBuf>,
    pub busy_changes: usize,
}

impl SharedView {
    pub fn selected(&self) -> Vec<NodeId> {
        self.inner.borrow().selected.clone()
    }

    pub fn expanded(&self) -> Vec<PathBuf> {
        self.inner.borrow().expanded.clone()
    }

    pub fn busy_changes(&self) -> usize {
        self.inner.borrow().busy_changes
    }
}

impl TreeView for SharedView {
    fn set_expanded(&mut self, _node: NodeId, path: &std::path::Path, expanded: bool) {
        if expanded {
            self.inner.borrow_mut().expanded.push(path.to_path_buf());
        }
    }

    fn set_busy(&mut self, _busy: bool) {
        self.inner.borrow_mut().busy_changes += 1;
    }

    fn select_row(&mut self, node: NodeId) {
        self.inner.borrow_mut().selected.push(node);
    }
}
