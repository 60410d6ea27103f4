use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use dirpane::app_dirs::CONFIG_HOME_ENV;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the config home at a test directory until dropped.
pub struct DirpaneEnvGuard {
    previous: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl DirpaneEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var(CONFIG_HOME_ENV).ok();
        // SAFETY: env mutations in these tests happen under ENV_LOCK.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, path);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for DirpaneEnvGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            // SAFETY: env mutations in these tests happen under ENV_LOCK.
            Some(value) => unsafe { std::env::set_var(CONFIG_HOME_ENV, value) },
            // SAFETY: env mutations in these tests happen under ENV_LOCK.
            None => unsafe { std::env::remove_var(CONFIG_HOME_ENV) },
        }
    }
}
