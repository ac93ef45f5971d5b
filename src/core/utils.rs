use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".pocket_ledger";
const DATA_DIR: &str = "data";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the application directory.
pub const HOME_ENV: &str = "POCKET_LEDGER_HOME";

/// Returns the application directory, defaulting to `~/.pocket_ledger`.
///
/// `None` means there is neither an override nor a home directory, i.e. no
/// durable place to write to.
pub fn app_data_dir() -> Option<PathBuf> {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return Some(PathBuf::from(custom));
    }
    home_dir().map(|home| home.join(DEFAULT_DIR_NAME))
}

/// Directory holding the persisted collections under `base`.
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

/// Creates `path` and its parents when missing. Fails if `path` exists but
/// is not a directory.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path)
}
