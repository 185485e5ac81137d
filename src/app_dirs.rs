use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("radview")
                .join("radview.log")
        } else {
            ProjectDirs::from("", "", "radview")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("radview.log"))
                .unwrap_or_else(|| PathBuf::from("radview.log"))
        }
    }
}
