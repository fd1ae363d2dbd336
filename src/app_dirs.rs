use directories::ProjectDirs;
use std::path::PathBuf;

use crate::store::STORAGE_KEY;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/quiver`, or the platform data dir without `$HOME`
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("quiver"),
            )
        } else {
            ProjectDirs::from("", "", "quiver").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn sessions_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(format!("{STORAGE_KEY}.json")))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("quiver.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quiver").map(|pd| pd.config_dir().join("config.json"))
    }
}
