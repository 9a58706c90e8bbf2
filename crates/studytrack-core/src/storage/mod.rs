mod config;
pub mod store;

pub use config::{Config, RemoteConfig};
pub use store::{keys, LocalStore};

use std::path::PathBuf;

/// Returns `~/.config/studytrack[-dev]/` based on STUDYTRACK_ENV.
///
/// STUDYTRACK_DATA_DIR overrides the location entirely (used by the CLI
/// test harness to point at a temp directory).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = if let Ok(dir) = std::env::var("STUDYTRACK_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("STUDYTRACK_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("studytrack-dev")
        } else {
            base_dir.join("studytrack")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
