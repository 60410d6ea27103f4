use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::{errors::ConfigError, types::TreeOptions};

/// Default filename used to store the tree options.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load options from the app directory, returning defaults if the file is missing.
pub fn load_or_default() -> Result<TreeOptions, ConfigError> {
    let path = config_path()?;
    load_from_path(&path)
}

/// Load options from a specific file. A missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<TreeOptions, ConfigError> {
    if !path.exists() {
        return Ok(TreeOptions::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<TreeOptions>(&text)
        .map(TreeOptions::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Persist options to the app directory, overwriting any previous contents.
pub fn save(options: &TreeOptions) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(options, &path)
}

/// Save options to a specific path, creating parent directories as needed.
pub fn save_to_path(options: &TreeOptions, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(options).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
