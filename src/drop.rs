//! Drag-and-drop state for the tree.
//!
//! Tracks the row hovered by an incoming drag, expands it after a dwell
//! delay, scrolls the view while the pointer sits near an edge, and holds the
//! path list of a completed drop until the host's drop menu is dismissed.
//! Timers are plain deadlines; the host calls [`DropCoordinator::tick`] with
//! the current time and every fired task re-checks its target first.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tracing::{debug, trace};

use crate::{
    config::TreeOptions,
    tree::{DirTree, NodeId},
    view::ScrollDirection,
};

/// Interval between auto-scroll steps while the pointer stays in an edge zone.
pub const AUTO_SCROLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledExpand {
    due: Instant,
    target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledScroll {
    due: Instant,
    direction: ScrollDirection,
}

/// Pointer sample delivered while an external drag hovers the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMotion {
    /// Row under the pointer, if any.
    pub target: Option<NodeId>,
    /// Pointer offset from the top of the view.
    pub y: f32,
    pub view_height: f32,
    /// The drag started in this same tree.
    pub from_self: bool,
}

/// A completed drop waiting for the user to pick copy or move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDrop {
    pub target: NodeId,
    pub target_path: PathBuf,
    pub paths: Vec<PathBuf>,
    /// Copy and move are only offered when the target accepts new entries.
    pub writable: bool,
}

#[derive(Debug)]
pub struct DropCoordinator {
    expand_delay: Duration,
    scroll_edge: f32,
    expand_task: Option<ScheduledExpand>,
    scroll_task: Option<ScheduledScroll>,
    pending_drop: Option<PendingDrop>,
    drop_enabled: bool,
}

impl DropCoordinator {
    pub fn new(options: &TreeOptions) -> Self {
        Self {
            expand_delay: options.drop_expand_delay(),
            scroll_edge: options.auto_scroll_edge,
            expand_task: None,
            scroll_task: None,
            pending_drop: None,
            drop_enabled: true,
        }
    }

    pub fn pending_drop(&self) -> Option<&PendingDrop> {
        self.pending_drop.as_ref()
    }

    /// Row scheduled for auto-expansion, if the timer is armed.
    pub fn scheduled_expand(&self) -> Option<NodeId> {
        self.expand_task.map(|task| task.target)
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.scroll_task.is_some()
    }

    pub fn accepts_drops(&self) -> bool {
        self.drop_enabled
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let expand = self.expand_task.map(|task| task.due);
        let scroll = self.scroll_task.map(|task| task.due);
        match (expand, scroll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Pointer moved during an incoming drag. Returns whether the drop is accepted.
    pub fn drag_motion(&mut self, tree: &mut DirTree, motion: DragMotion, now: Instant) -> bool {
        if motion.from_self || !self.drop_enabled {
            return false;
        }
        if let Some(click) = tree.targets_mut().click.take()
            && tree.targets().drop != Some(click)
        {
            tree.set_highlight(click, false);
        }
        let target = motion.target.filter(|id| tree.contains(*id));
        let previous = tree.targets().drop;
        if target != previous {
            if let Some(previous) = previous {
                tree.set_highlight(previous, false);
            }
            self.expand_task = None;
            tree.targets_mut().drop = target;
            if let Some(id) = target {
                tree.set_highlight(id, true);
                if tree.node(id).is_some_and(|node| !node.is_view_expanded()) {
                    trace!(delay_ms = self.expand_delay.as_millis() as u64, "Arming drop auto-expand");
                    self.expand_task = Some(ScheduledExpand {
                        due: now + self.expand_delay,
                        target: id,
                    });
                }
            }
        }
        self.update_scroll(target.is_some(), motion, now);
        true
    }

    fn update_scroll(&mut self, has_target: bool, motion: DragMotion, now: Instant) {
        let direction = if !has_target || self.pending_drop.is_some() {
            None
        } else if motion.y < self.scroll_edge {
            Some(ScrollDirection::Up)
        } else if motion.y > motion.view_height - self.scroll_edge {
            Some(ScrollDirection::Down)
        } else {
            None
        };
        self.scroll_task = match (direction, self.scroll_task) {
            (None, _) => None,
            (Some(direction), Some(task)) => Some(ScheduledScroll { direction, ..task }),
            (Some(direction), None) => Some(ScheduledScroll { due: now, direction }),
        };
    }

    /// The drag left the view.
    pub fn drag_leave(&mut self, tree: &mut DirTree) {
        let targets = *tree.targets();
        if let Some(previous) = targets.drop
            && targets.click != Some(previous)
            && self.pending_drop.as_ref().is_none_or(|drop| drop.target != previous)
        {
            tree.set_highlight(previous, false);
        }
        if self.pending_drop.is_none() {
            tree.targets_mut().drop = None;
        }
        self.expand_task = None;
        self.scroll_task = None;
    }

    /// Paths were dropped onto `target`. Returns the drop awaiting a copy/move choice.
    pub fn drop_received(
        &mut self,
        tree: &mut DirTree,
        target: Option<NodeId>,
        paths: Vec<PathBuf>,
    ) -> Option<&PendingDrop> {
        let target = target.filter(|id| tree.contains(*id))?;
        if paths.is_empty() {
            return None;
        }
        let target_path = tree.path_of(target)?;
        let writable = tree.fs().is_writable(&target_path);
        debug!(
            target = %target_path.display(),
            count = paths.len(),
            writable,
            "Drop received"
        );
        tree.set_highlight(target, true);
        tree.targets_mut().drop = Some(target);
        self.expand_task = None;
        self.scroll_task = None;
        self.pending_drop = Some(PendingDrop {
            target,
            target_path,
            paths,
            writable,
        });
        self.pending_drop.as_ref()
    }

    /// The drop menu closed; hand the drop to the caller and clear hover state.
    pub fn finish_drop(&mut self, tree: &mut DirTree) -> Option<PendingDrop> {
        let pending = self.pending_drop.take()?;
        tree.set_highlight(pending.target, false);
        if tree.targets().drop == Some(pending.target) {
            tree.targets_mut().drop = None;
        }
        Some(pending)
    }

    /// Run due timers. Returns whether the tree changed.
    pub fn tick(&mut self, tree: &mut DirTree, now: Instant, hint: Option<&Path>) -> bool {
        let mut changed = false;
        if let Some(task) = self.expand_task
            && now >= task.due
        {
            self.expand_task = None;
            if tree.targets().drop == Some(task.target) && tree.contains(task.target) {
                debug!("Auto-expanding drop target");
                tree.sync(task.target, false, hint);
                tree.set_view_expanded(task.target, true);
                changed = true;
            }
        }
        if let Some(task) = self.scroll_task
            && now >= task.due
        {
            if tree.targets().drop.is_some() && self.pending_drop.is_none() {
                tree.view_mut().auto_scroll(task.direction);
                self.scroll_task = Some(ScheduledScroll {
                    due: now + AUTO_SCROLL_INTERVAL,
                    ..task
                });
            } else {
                self.scroll_task = None;
            }
        }
        changed
    }

    /// An outgoing drag of the click target started.
    pub fn drag_begin(&mut self, tree: &mut DirTree) {
        if let Some(click) = tree.targets().click {
            tree.set_highlight(click, true);
        }
        self.set_drop_enabled(tree, false);
    }

    pub fn drag_end(&mut self, tree: &mut DirTree) {
        if let Some(click) = tree.targets().click {
            tree.set_highlight(click, false);
        }
        self.set_drop_enabled(tree, true);
    }

    /// Paths carried by an outgoing drag: the click target, if any.
    pub fn drag_payload(&self, tree: &DirTree) -> Vec<PathBuf> {
        tree.targets()
            .click
            .and_then(|id| tree.path_of(id))
            .into_iter()
            .collect()
    }

    /// Drop every timer and pending drop and release the drop target.
    pub fn cancel_all(&mut self, tree: &mut DirTree) {
        self.expand_task = None;
        self.scroll_task = None;
        if let Some(pending) = self.pending_drop.take() {
            tree.set_highlight(pending.target, false);
        }
        if let Some(target) = tree.targets_mut().drop.take() {
            tree.set_highlight(target, false);
        }
    }

    fn set_drop_enabled(&mut self, tree: &mut DirTree, enabled: bool) {
        self.drop_enabled = enabled;
        tree.view_mut().set_drop_enabled(enabled);
    }
}
