use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DirTreeController, FileOpError};
use crate::tree::NodeId;

/// Entries of the directory context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    UpToParent,
    Slideshow,
    SlideshowRecursive,
    FindDuplicates,
    FindDuplicatesRecursive,
    NewFolder,
    Rename,
    Delete,
    ToggleHidden,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub enabled: bool,
    /// Check state for toggle entries.
    pub checked: Option<bool>,
}

/// Menu model built for the click target at the time the menu opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub target: Option<NodeId>,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    pub fn item(&self, action: MenuAction) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.action == action)
    }

    pub fn is_enabled(&self, action: MenuAction) -> bool {
        self.item(action).is_some_and(|item| item.enabled)
    }
}

/// What the host has to do after a menu action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Handled,
    /// The action is disabled for the current target.
    Ignored,
    /// Start inline editing of this row's name, then call `commit_rename`.
    RenameRequested(NodeId),
}

/// Application features the menu hands work to.
pub trait AppActions {
    fn start_slideshow(&mut self, _path: &Path, _recursive: bool) {}

    fn find_duplicates(&mut self, _path: &Path, _recursive: bool) {}

    /// Ask the user before `path` is deleted recursively.
    fn confirm_delete(&mut self, _path: &Path) -> bool {
        false
    }

    /// Whole-layout refresh after options changed.
    fn refresh_layout(&mut self) {}
}

/// Host without slideshow, duplicate finder or delete confirmation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActions;

impl AppActions for NoActions {}

impl DirTreeController {
    /// Menu model for the current click target.
    pub fn context_menu(&self) -> ContextMenu {
        let target = self.tree.targets().click;
        let target_path = target.and_then(|id| self.tree.path_of(id));
        let active = target_path.is_some();
        let fs = self.tree.fs();
        let writable = target_path.as_deref().is_some_and(|path| fs.is_writable(path));
        let parent_writable = target
            .and_then(|id| self.tree.parent(id))
            .and_then(|parent| self.tree.path_of(parent))
            .is_some_and(|parent| fs.is_writable(&parent));
        let can_go_up = self
            .current_path
            .as_deref()
            .is_some_and(|path| path.parent().is_some());

        let item = |action, enabled| MenuItem {
            action,
            enabled,
            checked: None,
        };
        let items = vec![
            item(MenuAction::UpToParent, can_go_up),
            item(MenuAction::Slideshow, active),
            item(MenuAction::SlideshowRecursive, active),
            item(MenuAction::FindDuplicates, active),
            item(MenuAction::FindDuplicatesRecursive, active),
            item(MenuAction::NewFolder, writable),
            item(MenuAction::Rename, parent_writable),
            item(MenuAction::Delete, parent_writable),
            MenuItem {
                action: MenuAction::ToggleHidden,
                enabled: true,
                checked: Some(self.tree.options().show_hidden_files),
            },
            item(MenuAction::Refresh, true),
        ];
        ContextMenu { target, items }
    }

    /// Run a menu action against the current click target.
    pub fn dispatch_menu(&mut self, action: MenuAction) -> Result<MenuOutcome, FileOpError> {
        if !self.context_menu().is_enabled(action) {
            debug!(?action, "Menu action disabled for target");
            return Ok(MenuOutcome::Ignored);
        }
        let target = self.tree.targets().click;
        let target_path = target.and_then(|id| self.tree.path_of(id));
        let outcome = match (action, target, target_path) {
            (MenuAction::UpToParent, ..) => {
                let parent = self
                    .current_path
                    .as_deref()
                    .and_then(Path::parent)
                    .map(PathBuf::from);
                if let Some(parent) = parent {
                    self.set_path(&parent);
                }
                MenuOutcome::Handled
            }
            (MenuAction::Slideshow, _, Some(path)) => {
                self.actions.start_slideshow(&path, false);
                MenuOutcome::Handled
            }
            (MenuAction::SlideshowRecursive, _, Some(path)) => {
                self.actions.start_slideshow(&path, true);
                MenuOutcome::Handled
            }
            (MenuAction::FindDuplicates, _, Some(path)) => {
                self.actions.find_duplicates(&path, false);
                MenuOutcome::Handled
            }
            (MenuAction::FindDuplicatesRecursive, _, Some(path)) => {
                self.actions.find_duplicates(&path, true);
                MenuOutcome::Handled
            }
            (MenuAction::NewFolder, Some(node), _) => {
                MenuOutcome::RenameRequested(self.create_folder(node)?)
            }
            (MenuAction::Rename, Some(node), _) => {
                self.begin_rename(node)?;
                MenuOutcome::RenameRequested(node)
            }
            (MenuAction::Delete, Some(node), Some(path)) => {
                if self.actions.confirm_delete(&path) {
                    self.delete_folder(node)?;
                    MenuOutcome::Handled
                } else {
                    MenuOutcome::Ignored
                }
            }
            (MenuAction::ToggleHidden, ..) => {
                let options = self.tree.options_mut();
                options.show_hidden_files = !options.show_hidden_files;
                info!(show_hidden = options.show_hidden_files, "Toggled hidden files");
                self.refresh();
                self.actions.refresh_layout();
                MenuOutcome::Handled
            }
            (MenuAction::Refresh, ..) => {
                self.refresh();
                self.actions.refresh_layout();
                MenuOutcome::Handled
            }
            _ => MenuOutcome::Ignored,
        };
        Ok(outcome)
    }
}
