//! Lazily populated directory tree for an image viewer's folder pane.
/// Application directory resolution.
pub mod app_dirs;
/// Persisted tree options.
pub mod config;
/// Navigation, input, context menu and folder operations.
pub mod controller;
/// Drag-and-drop coordination.
pub mod drop;
/// Directory entry model.
pub mod entry;
/// Tracing setup.
pub mod logging;
/// Absolute path decomposition.
pub mod path_parts;
/// File-system listing and stat providers.
pub mod provider;
/// Arena-backed directory tree and sync engine.
pub mod tree;
/// View adapter seam.
pub mod view;

#[cfg(test)]
mod test_support;

pub use config::TreeOptions;
pub use controller::DirTreeController;
pub use entry::{EntryRef, FileData};
pub use provider::{FileSystem, ListingProvider, LocalFs, StatProvider};
pub use tree::{DirTree, NodeId, TreeRow};
pub use view::{NullView, ScrollDirection, TreeView};
