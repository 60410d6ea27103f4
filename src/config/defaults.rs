use super::types::TreeOptions;

pub(super) const DEFAULT_RESCAN_INTERVAL_SECS: u64 = 10;
pub(super) const DEFAULT_DROP_EXPAND_DELAY_MS: u64 = 1_000;
pub(super) const DEFAULT_AUTO_SCROLL_EDGE: f32 = 20.0;
pub(super) const MAX_RESCAN_INTERVAL_SECS: u64 = 3_600;

pub(super) fn default_rescan_interval_secs() -> u64 {
    DEFAULT_RESCAN_INTERVAL_SECS
}

pub(super) fn default_drop_expand_delay_ms() -> u64 {
    DEFAULT_DROP_EXPAND_DELAY_MS
}

pub(super) fn default_auto_scroll_edge() -> f32 {
    DEFAULT_AUTO_SCROLL_EDGE
}

pub(super) fn default_false() -> bool {
    false
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_hidden_files: default_false(),
            descend_subdirs: default_false(),
            case_sensitive_sort: default_false(),
            rescan_interval_secs: default_rescan_interval_secs(),
            drop_expand_delay_ms: default_drop_expand_delay_ms(),
            auto_scroll_edge: default_auto_scroll_edge(),
        }
    }
}
