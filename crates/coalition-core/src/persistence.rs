//! Snapshot persistence for the coalition's configuration and chat history.
//!
//! The whole state is small and changes rarely, so it is stored as one
//! JSON-encoded snapshot under a single key rather than per-entity records.

use crate::shared::{ApiSettings, ChatMessage, Room};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const SNAPSHOT_KEY: &[u8] = b"coalition_snapshot_v1";

/// Everything needed to restore a deployment: room layout, API settings, and
/// the session history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoalitionSnapshot {
    pub rooms: Vec<Room>,
    pub settings: ApiSettings,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Pluggable snapshot store.
pub trait StatePersistence: Send + Sync {
    fn load(&self) -> Result<Option<CoalitionSnapshot>, PersistenceError>;
    fn save(&self, snapshot: &CoalitionSnapshot) -> Result<(), PersistenceError>;
}

/// Sled-backed store, one tree, one key.
pub struct SledStateStore {
    db: sled::Db,
}

impl SledStateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl StatePersistence for SledStateStore {
    fn load(&self) -> Result<Option<CoalitionSnapshot>, PersistenceError> {
        match self.db.get(SNAPSHOT_KEY)? {
            Some(raw) => {
                let snapshot: CoalitionSnapshot = serde_json::from_slice(&raw)?;
                info!(
                    "[PERSIST] snapshot loaded: {} room(s), {} message(s)",
                    snapshot.rooms.len(),
                    snapshot.messages.len()
                );
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &CoalitionSnapshot) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_vec(snapshot)?;
        self.db.insert(SNAPSHOT_KEY, encoded)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;

    #[test]
    fn snapshot_round_trips_through_sled() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStateStore::open(dir.path().join("state")).unwrap();

        assert!(store.load().unwrap().is_none());

        let snapshot = CoalitionSnapshot {
            rooms: bootstrap::initial_rooms(),
            settings: bootstrap::initial_settings(),
            messages: vec![ChatMessage::user("hello", Vec::new())],
        };
        store.save(&snapshot).unwrap();

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.rooms.len(), snapshot.rooms.len());
        assert_eq!(restored.rooms[0].units[0].name, "Admin Manager");
        assert_eq!(restored.messages.len(), 1);
        assert_eq!(
            restored.settings.cloud_connections.len(),
            snapshot.settings.cloud_connections.len()
        );
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStateStore::open(dir.path().join("state")).unwrap();

        let mut snapshot = CoalitionSnapshot {
            rooms: bootstrap::initial_rooms(),
            settings: bootstrap::initial_settings(),
            messages: Vec::new(),
        };
        store.save(&snapshot).unwrap();
        snapshot.messages.push(ChatMessage::user("again", Vec::new()));
        store.save(&snapshot).unwrap();

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.messages.len(), 1);
    }
}
