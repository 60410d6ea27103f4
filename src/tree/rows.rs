use std::path::PathBuf;

use indextree::NodeId;

use super::DirTree;

/// Render-friendly directory row.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRow {
    /// Node backing the row.
    pub node: NodeId,
    /// Full path of the directory.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    /// Depth below the root row.
    pub depth: usize,
    /// Whether an expander is shown (real children or the placeholder).
    pub has_children: bool,
    /// Whether the row is expanded in the view.
    pub expanded: bool,
    /// Whether the row carries click/drag/drop highlight.
    pub highlighted: bool,
    /// Whether the row is the current selection.
    pub selected: bool,
    /// Whether this row represents the root.
    pub is_root: bool,
}

impl DirTree {
    /// Visible rows in display order. Collapsed subtrees and placeholders are skipped.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.flatten_rows(self.root, 0, &mut rows);
        rows
    }

    fn flatten_rows(&self, id: NodeId, depth: usize, rows: &mut Vec<TreeRow>) {
        let Some(node) = self.node(id) else {
            return;
        };
        rows.push(TreeRow {
            node: id,
            path: node.entry.path().to_path_buf(),
            name: node.entry.name().to_string(),
            depth,
            has_children: id.children(&self.arena).next().is_some(),
            expanded: node.view_expanded,
            highlighted: node.highlighted,
            selected: self.targets.selected == Some(id),
            is_root: id == self.root,
        });
        if node.view_expanded {
            for child in self.children(id) {
                self.flatten_rows(child, depth + 1, rows);
            }
        }
    }
}
