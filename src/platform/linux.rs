// ChatLens platform paths for Linux
// Config: ~/.config/chatlens
// Data:   ~/.local/share/chatlens

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for ChatLens on Linux.
/// Uses `$XDG_CONFIG_HOME/chatlens` if set, otherwise `~/.config/chatlens`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("chatlens")
    } else {
        home_dir().join(".config").join("chatlens")
    }
}

/// Returns the data directory for ChatLens on Linux.
/// Uses `$XDG_DATA_HOME/chatlens` if set, otherwise `~/.local/share/chatlens`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("chatlens")
    } else {
        home_dir().join(".local").join("share").join("chatlens")
    }
}
