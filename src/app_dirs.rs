use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "typespeed")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }
}
