use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use geocoin_core::SaveGame;
use geocoin_runtime::SessionStore;
use tracing::debug;

/// Session store backed by a JSON file.
#[derive(Clone, Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load_blob(&mut self) -> Result<Option<SaveGame>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no save file yet");
                return Ok(None);
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("failed to read save file at {}", self.path.display())
                })
            }
        };
        let save = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse save file at {}", self.path.display()))?;
        Ok(Some(save))
    }

    fn save_blob(&mut self, save: &SaveGame) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(save).context("failed to serialize session")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write save file at {}", self.path.display()))
    }
}
