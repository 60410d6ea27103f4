//! In-memory collaborators for unit tests.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    io,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, SystemTime},
};

use indextree::NodeId;

use crate::{
    controller::FileOps,
    entry::{EntryRef, FileData},
    provider::{ListingProvider, StatProvider},
    view::{ScrollDirection, TreeView},
};

#[derive(Debug, Clone, Copy)]
struct MemoryEntry {
    is_dir: bool,
    size: u64,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<PathBuf, MemoryEntry>,
    clock: u64,
    reads: HashMap<PathBuf, usize>,
    stats: usize,
    denied: HashSet<PathBuf>,
    readonly: HashSet<PathBuf>,
    pseudo: HashSet<PathBuf>,
}

impl MemoryState {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.clock)
    }

    fn touch_parent(&mut self, path: &Path, now: SystemTime) {
        if let Some(parent) = path.parent()
            && let Some(entry) = self.entries.get_mut(parent)
        {
            entry.modified = now;
        }
    }

    fn create(&mut self, path: &Path, is_dir: bool) {
        let now = self.tick();
        self.entries.insert(
            path.to_path_buf(),
            MemoryEntry {
                is_dir,
                size: if is_dir { 0 } else { 1 },
                modified: now,
            },
        );
        self.touch_parent(path, now);
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entries.get(path).is_some_and(|entry| entry.is_dir)
    }
}

/// Shared in-memory file system that counts directory reads.
#[derive(Debug, Clone)]
pub(crate) struct MemoryFs {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryFs {
    pub(crate) fn new() -> Self {
        let mut state = MemoryState::default();
        state.create(Path::new("/"), true);
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub(crate) fn mkdir_p(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        let mut current = PathBuf::from("/");
        for component in Path::new(path).components().skip(1) {
            current.push(component);
            if !state.entries.contains_key(&current) {
                state.create(&current, true);
            }
        }
    }

    /// Create a file, or bump its modification time if it exists.
    pub(crate) fn touch(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        let path = Path::new(path);
        if let Some(existing) = state.entries.get(path).copied() {
            let now = state.tick();
            state.entries.insert(
                path.to_path_buf(),
                MemoryEntry {
                    modified: now,
                    ..existing
                },
            );
        } else {
            state.create(path, false);
        }
    }

    pub(crate) fn bump(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        let now = state.tick();
        if let Some(entry) = state.entries.get_mut(Path::new(path)) {
            entry.modified = now;
        }
    }

    pub(crate) fn remove_all(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        let path = Path::new(path);
        state.entries.retain(|key, _| !key.starts_with(path));
        let now = state.tick();
        state.touch_parent(path, now);
    }

    /// Make listing `path` fail with a permission error.
    pub(crate) fn deny(&self, path: &str) {
        self.state.borrow_mut().denied.insert(PathBuf::from(path));
    }

    pub(crate) fn set_readonly(&self, path: &str) {
        self.state.borrow_mut().readonly.insert(PathBuf::from(path));
    }

    /// Report `.` and `..` when listing `path`.
    pub(crate) fn add_pseudo_entries(&self, path: &str) {
        self.state.borrow_mut().pseudo.insert(PathBuf::from(path));
    }

    pub(crate) fn is_dir(&self, path: &str) -> bool {
        self.state.borrow().is_dir(Path::new(path))
    }

    pub(crate) fn reads(&self, path: &str) -> usize {
        self.state
            .borrow()
            .reads
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_reads(&self) -> usize {
        self.state.borrow().reads.values().sum()
    }

    /// Point queries answered so far (`is_directory`, `modification_time`, `exists`, `stat`).
    pub(crate) fn stat_calls(&self) -> usize {
        self.state.borrow().stats
    }

    fn entry_for(path: &Path, entry: &MemoryEntry) -> EntryRef {
        FileData::new(path, entry.is_dir, entry.size, Some(entry.modified))
    }
}

impl ListingProvider for MemoryFs {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<EntryRef>> {
        let mut state = self.state.borrow_mut();
        *state.reads.entry(path.to_path_buf()).or_default() += 1;
        if state.denied.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        if !state.is_dir(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        let mut listed: Vec<EntryRef> = state
            .entries
            .iter()
            .filter(|(key, _)| key.parent() == Some(path))
            .map(|(key, entry)| Self::entry_for(key, entry))
            .collect();
        if state.pseudo.contains(path) {
            listed.push(FileData::new(path.join("."), true, 0, None));
            listed.push(FileData::new(path.join(".."), true, 0, None));
        }
        // Listings come back in no particular order.
        listed.reverse();
        Ok(listed)
    }
}

impl StatProvider for MemoryFs {
    fn is_directory(&self, path: &Path) -> bool {
        let mut state = self.state.borrow_mut();
        state.stats += 1;
        state.is_dir(path)
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        let mut state = self.state.borrow_mut();
        state.stats += 1;
        state.entries.get(path).map(|entry| entry.modified)
    }

    fn exists(&self, path: &Path) -> bool {
        let mut state = self.state.borrow_mut();
        state.stats += 1;
        state.entries.contains_key(path)
    }

    fn is_writable(&self, path: &Path) -> bool {
        let state = self.state.borrow();
        state.is_dir(path) && !state.readonly.contains(path)
    }

    fn stat(&self, path: &Path) -> Option<EntryRef> {
        let mut state = self.state.borrow_mut();
        state.stats += 1;
        state
            .entries
            .get(path)
            .map(|entry| Self::entry_for(path, entry))
    }
}

impl FileOps for MemoryFs {
    fn rename_dir(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.entries.contains_key(from) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "missing source"));
        }
        if state.entries.contains_key(to) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "target exists"));
        }
        let moved: Vec<(PathBuf, MemoryEntry)> = state
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(from))
            .map(|(key, entry)| (key.clone(), *entry))
            .collect();
        for (key, entry) in moved {
            state.entries.remove(&key);
            let Ok(rest) = key.strip_prefix(from) else {
                continue;
            };
            let target = if rest.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(rest)
            };
            state.entries.insert(target, entry);
        }
        let now = state.tick();
        state.touch_parent(from, now);
        state.touch_parent(to, now);
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.entries.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
        }
        let parent_ok = path.parent().is_some_and(|parent| state.is_dir(parent));
        if !parent_ok {
            return Err(io::Error::new(io::ErrorKind::NotFound, "missing parent"));
        }
        state.create(path, true);
        Ok(())
    }

    fn delete_dir(&self, path: &Path) -> io::Result<()> {
        if !self.is_directory(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        }
        let text = path.to_string_lossy().into_owned();
        self.remove_all(&text);
        Ok(())
    }
}

/// Side effect pushed to a [`RecordingView`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    Expanded(PathBuf, bool),
    Busy(bool),
    Highlight(NodeId, bool),
    FolderOpen(NodeId, bool),
    Reveal(NodeId),
    Select(NodeId),
    DropEnabled(bool),
    Scroll(ScrollDirection),
}

/// Shared handle on the events recorded by a view.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewLog {
    events: Rc<RefCell<Vec<ViewEvent>>>,
}

impl ViewLog {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub(crate) fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    log: ViewLog,
}

impl RecordingView {
    pub(crate) fn log(&self) -> ViewLog {
        self.log.clone()
    }
}

impl TreeView for RecordingView {
    fn set_expanded(&mut self, _node: NodeId, path: &Path, expanded: bool) {
        self.log
            .push(ViewEvent::Expanded(path.to_path_buf(), expanded));
    }

    fn set_busy(&mut self, busy: bool) {
        self.log.push(ViewEvent::Busy(busy));
    }

    fn set_highlight(&mut self, node: NodeId, highlighted: bool) {
        self.log.push(ViewEvent::Highlight(node, highlighted));
    }

    fn set_folder_open(&mut self, node: NodeId, open: bool) {
        self.log.push(ViewEvent::FolderOpen(node, open));
    }

    fn reveal(&mut self, node: NodeId) {
        self.log.push(ViewEvent::Reveal(node));
    }

    fn select_row(&mut self, node: NodeId) {
        self.log.push(ViewEvent::Select(node));
    }

    fn set_drop_enabled(&mut self, enabled: bool) {
        self.log.push(ViewEvent::DropEnabled(enabled));
    }

    fn auto_scroll(&mut self, direction: ScrollDirection) {
        self.log.push(ViewEvent::Scroll(direction));
    }
}
