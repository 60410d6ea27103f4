//! Seam between the tree core and whatever widget renders it.
//!
//! The core pushes state changes through [`TreeView`]; the widget pulls the
//! rows to draw from [`DirTree::rows`](crate::tree::DirTree::rows). Every
//! method has a no-op default so adapters only implement what they render.

use std::path::Path;

use indextree::NodeId;

/// Direction of an automatic scroll step during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

pub trait TreeView {
    /// Reflect a node's expanded/collapsed state into the widget.
    fn set_expanded(&mut self, _node: NodeId, _path: &Path, _expanded: bool) {}

    /// Busy cursor on/off. Called only on transitions.
    fn set_busy(&mut self, _busy: bool) {}

    /// Row highlight used for click, drag-source and drop-hover feedback.
    fn set_highlight(&mut self, _node: NodeId, _highlighted: bool) {}

    /// Swap between the open and closed folder icon.
    fn set_folder_open(&mut self, _node: NodeId, _open: bool) {}

    /// Scroll the row into view and put the cursor on it.
    fn reveal(&mut self, _node: NodeId) {}

    /// Apply the native selection. Only called while the selection gate is open.
    fn select_row(&mut self, _node: NodeId) {}

    /// Accept or refuse drops onto the widget.
    fn set_drop_enabled(&mut self, _enabled: bool) {}

    fn auto_scroll(&mut self, _direction: ScrollDirection) {}
}

/// View that renders nothing. Used headless and by the inspection binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl TreeView for NullView {}
