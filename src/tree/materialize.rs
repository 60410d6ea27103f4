use std::path::Path;

use indextree::NodeId;
use tracing::{error, warn};

use super::DirTree;
use crate::{
    entry::is_hidden_name,
    path_parts::{self, Segment},
};

/// One segment of a path being materialized and the node it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPart {
    pub segment: Segment,
    pub node: Option<NodeId>,
}

impl DirTree {
    /// Make sure a node exists for every segment of `path`, reading
    /// directories from disk as needed, and return the node of the last one.
    ///
    /// With `auto_expand` each resolved node (and the parent it was found
    /// under) is expanded in the view. `force` re-reads every directory on
    /// the way. Returns `None` when a segment does not exist on disk.
    pub fn materialize(&mut self, path: &Path, auto_expand: bool, force: bool) -> Option<NodeId> {
        self.busy_push();
        let found = self.walk_path(path, auto_expand, force);
        self.busy_pop();
        found
    }

    /// Decompose `path` and resolve the leading segments that already have nodes.
    pub fn path_parts(&self, path: &Path) -> Vec<PathPart> {
        let mut parent: Option<NodeId> = None;
        let mut resolving = true;
        path_parts::decompose(path)
            .into_iter()
            .map(|segment| {
                let node = if !resolving {
                    None
                } else {
                    match (&segment, parent) {
                        (Segment::Root, None) => Some(self.root).filter(|id| self.contains(*id)),
                        (Segment::Named(name), Some(parent)) => self.find_child_by_name(parent, name),
                        _ => None,
                    }
                };
                resolving = node.is_some();
                parent = node;
                PathPart { segment, node }
            })
            .collect()
    }

    fn walk_path(&mut self, path: &Path, auto_expand: bool, force: bool) -> Option<NodeId> {
        let mut parts = self.path_parts(path);
        if parts.is_empty() {
            warn!(path = %path.display(), "Cannot materialize a relative path");
            return None;
        }

        for index in 0..parts.len() {
            let known = parts[index].node.filter(|id| self.contains(*id));
            let node = match known {
                Some(id) => {
                    if auto_expand {
                        self.set_view_expanded(id, true);
                    }
                    if !self.sync(id, force, Some(path)) {
                        warn!(
                            path = %path.display(),
                            segment = parts[index].segment.name(),
                            "Directory vanished while materializing"
                        );
                        return None;
                    }
                    id
                }
                None if index == 0 => {
                    error!(path = %path.display(), "Root node missing from directory tree");
                    return None;
                }
                None => {
                    let parent = parts[index - 1].node?;
                    let name = parts[index].segment.name().to_string();
                    let mut found = self.find_child_by_name(parent, &name);
                    // A populated parent never listed the hidden child, so re-read it.
                    let reread = force || (!self.options.show_hidden_files && is_hidden_name(&name));
                    if found.is_none() && self.sync(parent, reread, Some(path)) {
                        found = self.find_child_by_name(parent, &name);
                    }
                    let Some(found) = found else {
                        warn!(
                            path = %path.display(),
                            segment = %name,
                            "Path segment not found; materialize aborted"
                        );
                        return None;
                    };
                    if auto_expand {
                        self.set_view_expanded(parent, true);
                        self.set_view_expanded(found, true);
                    }
                    self.sync(found, force, Some(path));
                    found
                }
            };
            parts[index].node = Some(node);
        }
        parts.last().and_then(|part| part.node)
    }
}
