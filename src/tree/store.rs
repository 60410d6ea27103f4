use std::{cmp::Ordering, collections::HashSet, path::Path, rc::Rc};

use indextree::NodeId;
use tracing::trace;

use super::{DirNode, DirTree};
use crate::{
    entry::EntryRef,
    path_parts::{self, Segment},
};

impl DirTree {
    /// Depth-first search for the node whose entry is `entry` (by identity).
    pub fn find(&self, entry: &EntryRef) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|id| Rc::ptr_eq(&self.arena[*id].get().entry, entry))
    }

    /// Child of `parent` whose short name equals `name`. Placeholders never match.
    pub fn find_child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)?;
        parent.children(&self.arena).find(|id| {
            let node = self.arena[*id].get();
            !node.placeholder && node.entry.name() == name
        })
    }

    /// Node already present for an absolute path, without touching the disk.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        let mut current = None;
        for segment in path_parts::decompose(path) {
            current = match (segment, current) {
                (Segment::Root, None) => Some(self.root),
                (Segment::Named(name), Some(parent)) => {
                    Some(self.find_child_by_name(parent, &name)?)
                }
                _ => return None,
            };
        }
        current
    }

    /// Real children in display order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        if !self.contains(parent) {
            return Vec::new();
        }
        parent
            .children(&self.arena)
            .filter(|id| !self.arena[*id].get().placeholder)
            .collect()
    }

    /// Every child, placeholder included.
    pub(crate) fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        if !self.contains(parent) {
            return Vec::new();
        }
        parent.children(&self.arena).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id)?.parent()
    }

    /// Attach a node for `entry` under `parent`, keeping siblings sorted by
    /// name. The new node starts unpopulated with a placeholder child, and the
    /// parent's own placeholder is dropped.
    pub fn insert(&mut self, parent: NodeId, entry: EntryRef) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let placeholders: Vec<NodeId> = parent
            .children(&self.arena)
            .filter(|id| self.arena[*id].get().placeholder)
            .collect();
        for placeholder in placeholders {
            placeholder.remove_subtree(&mut self.arena);
        }

        let case_sensitive = self.options.case_sensitive_sort;
        let next_sibling = parent.children(&self.arena).find(|id| {
            compare_names(self.arena[*id].get().entry.name(), entry.name(), case_sensitive)
                == Ordering::Greater
        });
        trace!(path = %entry.path().display(), "Inserting directory node");
        let node = self.arena.new_node(DirNode::new(entry));
        let placeholder = self.arena.new_node(DirNode::placeholder());
        node.append(placeholder, &mut self.arena);
        match next_sibling {
            Some(sibling) => sibling.insert_before(node, &mut self.arena),
            None => parent.append(node, &mut self.arena),
        }
        Some(node)
    }

    /// Destroy `id` and its subtree. External targets pointing into the
    /// subtree are released first. The root is never removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        let doomed: HashSet<NodeId> = id.descendants(&self.arena).collect();
        self.targets.release(&doomed);
        if let Some(path) = self.path_of(id) {
            trace!(path = %path.display(), nodes = doomed.len(), "Removing directory node");
        }
        id.remove_subtree(&mut self.arena);
        true
    }
}

fn compare_names(left: &str, right: &str, case_sensitive: bool) -> Ordering {
    if case_sensitive {
        return left.cmp(right);
    }
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
