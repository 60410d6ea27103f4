//! Where dirpane keeps its files.
//!
//! Everything lives in one `.dirpane` folder below a base directory: the
//! value of `DIRPANE_CONFIG_HOME` when it is set and non-empty, the OS config
//! directory otherwise.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application folder below the base directory.
pub const APP_DIR_NAME: &str = ".dirpane";

/// Environment variable overriding the base directory.
pub const CONFIG_HOME_ENV: &str = "DIRPANE_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("Neither {CONFIG_HOME_ENV} nor an OS config directory is available")]
    NoBaseDir,
    #[error("Failed to create application directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Folders owned by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    /// The `.dirpane` folder itself, holding `config.toml`.
    Root,
    /// Per-launch log files.
    Logs,
}

impl AppDir {
    /// Location of this folder below `base`.
    pub fn under(self, base: &Path) -> PathBuf {
        let root = base.join(APP_DIR_NAME);
        match self {
            AppDir::Root => root,
            AppDir::Logs => root.join(LOGS_DIR_NAME),
        }
    }

    /// Resolve this folder under the configured base and create it.
    pub fn ensure(self) -> Result<PathBuf, AppDirError> {
        let base = resolve_base(std::env::var_os(CONFIG_HOME_ENV), os_config_dir())
            .ok_or(AppDirError::NoBaseDir)?;
        let path = self.under(&base);
        std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// The `.dirpane` folder, created if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    AppDir::Root.ensure()
}

/// The log folder, created if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    AppDir::Logs.ensure()
}

fn os_config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

// An empty override counts as unset.
fn resolve_base(override_dir: Option<OsString>, os_dir: Option<PathBuf>) -> Option<PathBuf> {
    override_dir
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(os_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_os_directory() {
        let base = resolve_base(Some("/portable".into()), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(base, Some(PathBuf::from("/portable")));
    }

    #[test]
    fn empty_override_falls_back() {
        let base = resolve_base(Some(OsString::new()), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(base, Some(PathBuf::from("/home/u/.config")));
        assert_eq!(resolve_base(None, None), None);
    }

    #[test]
    fn folders_nest_under_app_dir() {
        let base = Path::new("/base");
        assert_eq!(AppDir::Root.under(base), PathBuf::from("/base/.dirpane"));
        assert_eq!(AppDir::Logs.under(base), PathBuf::from("/base/.dirpane/logs"));
    }
}
