use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATABASE_FILE: &str = "fintrack.db";
pub const LOG_FILE: &str = "fintrack.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    /// Uses `data_dir` when given, otherwise the platform data directory.
    pub fn resolve(data_dir: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::default_data_dir()?,
        };
        Ok(Self { data_dir, verbose })
    }

    pub fn default_data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "fintrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}
