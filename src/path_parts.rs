//! Splits absolute paths into the segments walked by the materializer.

use std::path::{Component, Path};

/// One step of an absolute path, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// The file-system root. Always the first segment of a decomposed path.
    Root,
    /// A named child of the previous segment.
    Named(String),
}

impl Segment {
    pub fn name(&self) -> &str {
        match self {
            Segment::Root => "/",
            Segment::Named(name) => name,
        }
    }
}

/// Decompose `path` into `[Root, Named(..), ..]`.
///
/// Consecutive separators produce no empty segments. Returns an empty list
/// when the path does not start at the root separator.
pub fn decompose(path: &Path) -> Vec<Segment> {
    let mut components = path.components();
    if components.next() != Some(Component::RootDir) {
        return Vec::new();
    }
    let mut segments = vec![Segment::Root];
    for component in components {
        match component {
            Component::Normal(name) => {
                segments.push(Segment::Named(name.to_string_lossy().into_owned()));
            }
            Component::ParentDir => segments.push(Segment::Named("..".to_string())),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments
}
