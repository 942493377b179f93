//! Path resolution for growbook directories.
//!
//! Follows the XDG base directory layout. When neither the XDG variable nor
//! `HOME` is set, paths are relative to the working directory.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "growbook";

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Configuration directory: `$XDG_CONFIG_HOME/growbook` or `~/.config/growbook`.
pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Default configuration file (`config.yaml` in the config directory).
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Data directory: `$XDG_DATA_HOME/growbook` or `~/.local/share/growbook`.
pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// Default SQLite database file.
pub fn get_default_db_path() -> PathBuf {
    get_data_dir().join("growbook.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are shared across parallel tests, so only check suffixes
    #[test]
    fn test_config_path_ends_with_config_yaml() {
        assert!(get_config_path().ends_with("growbook/config.yaml"));
    }

    #[test]
    fn test_data_dir_ends_with_growbook() {
        assert!(get_data_dir().ends_with("growbook"));
    }

    #[test]
    fn test_default_db_path_lives_in_data_dir() {
        let path = get_default_db_path();
        assert!(path.ends_with("growbook/growbook.db"));
        assert_eq!(path.parent(), Some(get_data_dir().as_path()));
    }
}
