//! Save file store.
//!
//! A save file is the JSON form of a [`GameSnapshot`]. This crate only moves
//! snapshots between memory and disk; whether a decoded snapshot may be
//! applied is decided by `GameState::restore`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

pub use blockfall_core::snapshot::GameSnapshot;

/// Environment variable that overrides the save file location
pub const SAVE_PATH_ENV: &str = "BLOCKFALL_SAVE_PATH";

#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the snapshot as pretty JSON, creating parent directories
    pub fn save(&self, snapshot: &GameSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create save directory {}", parent.display()))?;
            }
        }

        let text = serde_json::to_string_pretty(snapshot).context("encode snapshot")?;
        fs::write(&self.path, text)
            .with_context(|| format!("write save file {}", self.path.display()))?;

        info!(path = %self.path.display(), score = snapshot.score, "saved game");
        Ok(())
    }

    /// Read and decode the save file
    pub fn load(&self) -> Result<GameSnapshot> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("read save file {}", self.path.display()))?;
        let snapshot = serde_json::from_slice::<GameSnapshot>(&bytes)
            .with_context(|| format!("decode save file {}", self.path.display()))?;

        debug!(path = %self.path.display(), version = snapshot.version, "loaded save file");
        Ok(snapshot)
    }
}

/// `$XDG_DATA_HOME/blockfall/save.json`, else `$HOME/.local/share/blockfall/save.json`,
/// else `./blockfall-save.json`
pub fn save_path_in(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let base = xdg_data_home
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".local").join("share")));

    match base {
        Some(mut path) => {
            path.push("blockfall");
            path.push("save.json");
            path
        }
        None => PathBuf::from("blockfall-save.json"),
    }
}
