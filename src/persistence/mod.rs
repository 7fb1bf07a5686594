//! Score persistence
//!
//! Features:
//! - Key/value `ScoreStore` backends (in-memory, JSON files, LocalStorage)
//! - `Scoreboard` keeps the in-memory record authoritative when a backend
//!   fails, and reports each failure once

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::error::StoreError;
use crate::records::ScoreRecord;

/// Durable string store keyed per game
pub trait ScoreStore {
    /// `Ok(None)` when the key was never written
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load a record, defaulting when the key is absent
pub fn load_record<R: ScoreRecord>(store: &dyn ScoreStore) -> Result<R, StoreError> {
    match store.read(R::KEY)? {
        Some(json) => serde_json::from_str(&json).map_err(|source| StoreError::Serde {
            key: R::KEY.to_string(),
            source,
        }),
        None => Ok(R::default()),
    }
}

pub fn save_record<R: ScoreRecord>(store: &mut dyn ScoreStore, record: &R) -> Result<(), StoreError> {
    let json = serde_json::to_string(record).map_err(|source| StoreError::Serde {
        key: R::KEY.to_string(),
        source,
    })?;
    store.write(R::KEY, &json)
}

/// One game's record plus the store it writes through to
pub struct Scoreboard<R: ScoreRecord> {
    store: Box<dyn ScoreStore>,
    record: R,
    unreported: Option<StoreError>,
}

impl<R: ScoreRecord> Scoreboard<R> {
    /// Load the record; on failure start from defaults and queue the error
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let (record, unreported) = match load_record::<R>(store.as_ref()) {
            Ok(record) => {
                log::info!("Loaded score record {}", R::KEY);
                (record, None)
            }
            Err(err) => {
                log::warn!("Could not load {}: {err}; using defaults", R::KEY);
                (R::default(), Some(err))
            }
        };
        Self {
            store,
            record,
            unreported,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Apply a session result and write through. The in-memory record is
    /// updated even if the write fails.
    pub fn commit(&mut self, update: impl FnOnce(&mut R)) {
        update(&mut self.record);
        match save_record(self.store.as_mut(), &self.record) {
            Ok(()) => log::info!("Score record {} saved", R::KEY),
            Err(err) => {
                log::warn!("Could not save {}: {err}", R::KEY);
                self.unreported = Some(err);
            }
        }
    }

    /// Hand over a pending failure exactly once
    pub fn take_error(&mut self) -> Option<StoreError> {
        self.unreported.take()
    }
}

impl<R: ScoreRecord + std::fmt::Debug> std::fmt::Debug for Scoreboard<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoreboard")
            .field("key", &R::KEY)
            .field("record", &self.record)
            .field("unreported", &self.unreported)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MemoryRecord, WhackRecord};

    #[test]
    fn test_absent_key_defaults() {
        let board = Scoreboard::<WhackRecord>::load(Box::new(MemoryStore::new()));
        assert_eq!(board.record(), &WhackRecord::default());
    }

    #[test]
    fn test_load_save_load_is_identical() {
        let mut store = MemoryStore::new();
        store
            .write(MemoryRecord::KEY, r#"{"bestTime":41000,"bestMoves":9,"gamesWon":4}"#)
            .unwrap();

        let first: MemoryRecord = load_record(&store).unwrap();
        let raw_before = store.read(MemoryRecord::KEY).unwrap();
        save_record(&mut store, &first).unwrap();
        let raw_after = store.read(MemoryRecord::KEY).unwrap();
        let second: MemoryRecord = load_record(&store).unwrap();

        assert_eq!(first, second);
        assert_eq!(raw_before, raw_after);
    }

    #[test]
    fn test_commit_writes_through() {
        let store = MemoryStore::new();
        let mut board = Scoreboard::<WhackRecord>::load(Box::new(store.clone()));
        board.commit(|r| r.record_round(42));
        let reloaded: WhackRecord = load_record(&store).unwrap();
        assert_eq!(reloaded.high_score, 42);
        assert!(board.take_error().is_none());
    }

    #[test]
    fn test_write_failure_keeps_memory_and_reports_once() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut board = Scoreboard::<WhackRecord>::load(Box::new(store.clone()));
        board.commit(|r| r.record_round(42));

        assert_eq!(board.record().high_score, 42);
        assert!(matches!(board.take_error(), Some(StoreError::Unavailable { .. })));
        assert!(board.take_error().is_none());
    }

    #[test]
    fn test_corrupt_record_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.write(WhackRecord::KEY, "{not json").unwrap();
        let mut board = Scoreboard::<WhackRecord>::load(Box::new(store));
        assert_eq!(board.record(), &WhackRecord::default());
        assert!(matches!(board.take_error(), Some(StoreError::Serde { .. })));
    }
}
