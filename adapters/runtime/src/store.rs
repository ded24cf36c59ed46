//! Persistence seam for saved sessions.

use anyhow::Result as AnyResult;
use geocoin_core::SaveGame;

/// Storage capable of holding a single saved session.
pub trait SessionStore {
    /// Reads the saved session, returning `None` when nothing was saved yet.
    fn load_blob(&mut self) -> AnyResult<Option<SaveGame>>;

    /// Replaces the saved session.
    fn save_blob(&mut self, save: &SaveGame) -> AnyResult<()>;
}

/// Store that keeps the saved session in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    saved: Option<SaveGame>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `save`.
    #[must_use]
    pub fn with_save(save: SaveGame) -> Self {
        Self {
            saved: Some(save),
            saves: 0,
        }
    }

    /// Most recently saved session.
    #[must_use]
    pub fn saved(&self) -> Option<&SaveGame> {
        self.saved.as_ref()
    }

    /// Number of times the store was written.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SessionStore for MemoryStore {
    fn load_blob(&mut self) -> AnyResult<Option<SaveGame>> {
        Ok(self.saved.clone())
    }

    fn save_blob(&mut self, save: &SaveGame) -> AnyResult<()> {
        self.saved = Some(save.clone());
        self.saves += 1;
        Ok(())
    }
}
