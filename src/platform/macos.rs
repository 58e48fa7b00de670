// ChatLens platform paths for macOS
// Config: ~/Library/Application Support/ChatLens
// Data:   ~/Library/Application Support/ChatLens

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for ChatLens on macOS.
/// `~/Library/Application Support/ChatLens`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("ChatLens")
}

/// Returns the data directory for ChatLens on macOS.
/// `~/Library/Application Support/ChatLens`
pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}
