//! `window.localStorage` persistence.

use web_sys::Storage;

use crate::error::QuizError;
use crate::question::Difficulty;
use crate::stats::{StatsRecord, StatsStore};

fn local_storage() -> Result<Storage, QuizError> {
    web_sys::window()
        .ok_or(QuizError::StorageUnavailable)?
        .local_storage()
        .map_err(|_| QuizError::StorageUnavailable)?
        .ok_or(QuizError::StorageUnavailable)
}

pub struct LocalStorageStats {
    storage: Storage,
    key: String,
}

impl LocalStorageStats {
    pub fn open(key: &str) -> Result<Self, QuizError> {
        Ok(Self { storage: local_storage()?, key: key.to_string() })
    }
}

impl StatsStore for LocalStorageStats {
    fn load(&self) -> StatsRecord {
        let raw = self.storage.get_item(&self.key).ok().flatten();
        StatsRecord::decode(raw.as_deref())
    }

    fn save(&mut self, stats: &StatsRecord) -> Result<(), QuizError> {
        self.storage
            .set_item(&self.key, &stats.encode()?)
            .map_err(|e| QuizError::Storage(format!("{e:?}")))
    }
}

pub fn load_difficulty(key: &str) -> Option<Difficulty> {
    let raw = local_storage().ok()?.get_item(key).ok().flatten()?;
    Difficulty::parse(&raw)
}

pub fn save_difficulty(key: &str, difficulty: Difficulty) {
    let result = local_storage().and_then(|s| {
        s.set_item(key, difficulty.as_str())
            .map_err(|e| QuizError::Storage(format!("{e:?}")))
    });
    if let Err(e) = result {
        log::debug!("difficulty not saved: {e}");
    }
}
