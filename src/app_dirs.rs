use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding one settings record per trainer
    pub fn settings_dir() -> PathBuf {
        ProjectDirs::from("", "", "triq")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("triq_settings"))
    }

    /// Log file; stdout belongs to the terminal UI
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("triq")
                .join("triq.log")
        } else {
            ProjectDirs::from("", "", "triq")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("triq.log"))
                .unwrap_or_else(|| PathBuf::from("triq.log"))
        }
    }
}
