// ChatLens platform paths for Windows
// Config: %APPDATA%/ChatLens
// Data:   %APPDATA%/ChatLens

use std::env;
use std::path::PathBuf;

fn appdata_dir() -> PathBuf {
    PathBuf::from(
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming")),
    )
}

/// Returns the configuration directory for ChatLens on Windows.
/// `%APPDATA%/ChatLens`
pub fn get_config_dir() -> PathBuf {
    appdata_dir().join("ChatLens")
}

/// Returns the data directory for ChatLens on Windows.
/// `%APPDATA%/ChatLens`
pub fn get_data_dir() -> PathBuf {
    appdata_dir().join("ChatLens")
}
