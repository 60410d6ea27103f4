use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_AUTO_SCROLL_EDGE, MAX_RESCAN_INTERVAL_SECS, default_auto_scroll_edge,
    default_drop_expand_delay_ms, default_false, default_rescan_interval_secs,
};

/// Behaviour switches for the directory tree.
///
/// Config keys: `show_hidden_files`, `descend_subdirs`, `case_sensitive_sort`,
/// `rescan_interval_secs`, `drop_expand_delay_ms`, `auto_scroll_edge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// List entries whose name starts with `.`.
    #[serde(default = "default_false")]
    pub show_hidden_files: bool,
    /// Populate freshly inserted children of a view-expanded node right away.
    #[serde(default = "default_false")]
    pub descend_subdirs: bool,
    /// Order siblings by exact byte comparison instead of case-folded names.
    #[serde(default = "default_false")]
    pub case_sensitive_sort: bool,
    /// Quiescence window during which an expanded directory is not re-read.
    #[serde(default = "default_rescan_interval_secs")]
    pub rescan_interval_secs: u64,
    /// Hover dwell before a drop target is expanded automatically.
    #[serde(default = "default_drop_expand_delay_ms")]
    pub drop_expand_delay_ms: u64,
    /// Distance from the top/bottom edge, in view units, that starts auto-scroll.
    #[serde(default = "default_auto_scroll_edge")]
    pub auto_scroll_edge: f32,
}

impl TreeOptions {
    pub fn rescan_interval(&self) -> Duration {
        Duration::from_secs(self.rescan_interval_secs)
    }

    pub fn drop_expand_delay(&self) -> Duration {
        Duration::from_millis(self.drop_expand_delay_ms)
    }

    /// Clamp out-of-range values loaded from disk.
    pub(crate) fn normalized(mut self) -> Self {
        self.rescan_interval_secs = self.rescan_interval_secs.min(MAX_RESCAN_INTERVAL_SECS);
        if !self.auto_scroll_edge.is_finite() || self.auto_scroll_edge < 0.0 {
            self.auto_scroll_edge = DEFAULT_AUTO_SCROLL_EDGE;
        }
        self
    }
}
