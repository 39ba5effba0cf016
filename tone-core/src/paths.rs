use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = "session.yaml";
pub const CONFIG_FILE: &str = "config.yaml";

pub fn tone_root(home: &Path) -> PathBuf {
    home.join(".tone")
}

pub fn session_path(home: &Path) -> PathBuf {
    tone_root(home).join(SESSION_FILE)
}

pub fn config_path(home: &Path) -> PathBuf {
    tone_root(home).join(CONFIG_FILE)
}
