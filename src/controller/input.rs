use tracing::trace;

use super::{ContextMenu, DirTreeController};
use crate::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Part of a row a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHit {
    Label,
    Expander,
}

/// Keys the tree reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKey {
    /// Plus or right arrow on the cursor row.
    Expand,
    /// Context-menu key on the cursor row.
    Menu,
}

impl DirTreeController {
    /// Pointer pressed over `node` (or empty space).
    ///
    /// A primary press on the expander of a collapsed row only makes sure the
    /// row's children are loaded. Any other press records the click target;
    /// a secondary press returns the context menu to show for it.
    pub fn press(
        &mut self,
        node: Option<NodeId>,
        hit: RowHit,
        button: PointerButton,
    ) -> Option<ContextMenu> {
        if button == PointerButton::Primary
            && hit == RowHit::Expander
            && let Some(id) = node
            && self.tree.node(id).is_some_and(|n| !n.is_view_expanded())
        {
            trace!("Expander pressed; loading children");
            self.tree.sync(id, false, None);
            return None;
        }
        self.set_click_target(node);
        (button == PointerButton::Secondary).then(|| self.context_menu())
    }

    /// Pointer released over `node`. A primary release on the pressed row selects it.
    pub fn release(&mut self, node: Option<NodeId>, button: PointerButton) -> bool {
        let click = self.tree.targets().click;
        if let Some(id) = click {
            self.tree.set_highlight(id, false);
        }
        if button != PointerButton::Primary {
            return false;
        }
        match (node, click) {
            (Some(node), Some(click)) if node == click => self.select(click),
            _ => false,
        }
    }

    /// Key pressed while `cursor` has keyboard focus.
    pub fn key_press(&mut self, cursor: Option<NodeId>, key: TreeKey) -> Option<ContextMenu> {
        match key {
            TreeKey::Expand => {
                if let Some(id) = cursor {
                    let hint = self.current_path.clone();
                    self.tree.sync(id, false, hint.as_deref());
                }
                None
            }
            TreeKey::Menu => {
                self.set_click_target(cursor);
                Some(self.context_menu())
            }
        }
    }

    /// Row activated (double click or enter).
    pub fn activate(&mut self, node: NodeId) -> bool {
        self.select(node)
    }

    /// The view expanded `node` on its own (expander click, keyboard).
    pub fn row_expanded(&mut self, node: NodeId) {
        self.tree.record_view_expanded(node, true);
        self.tree.sync(node, false, None);
        self.tree.view_mut().set_folder_open(node, true);
    }

    pub fn row_collapsed(&mut self, node: NodeId) {
        self.tree.record_view_expanded(node, false);
        self.tree.view_mut().set_folder_open(node, false);
    }

    /// The context menu was dismissed.
    pub fn menu_closed(&mut self) {
        self.set_click_target(None);
        if self.drop.pending_drop().is_none() {
            self.tree.targets_mut().drop = None;
        }
    }
}
