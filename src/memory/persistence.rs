//! Blob storage for the recurring-identity store
//!
//! The payload is one JSON document:
//!
//! ```json
//! { "roster": ["k3x9a", ...],
//!   "memoryByIdentity": { "k3x9a": { "knowledgeGrid": [[...]], "exitKnown": true,
//!                                    "exitPos": {"x": 22, "y": 8},
//!                                    "memberTemplates": [{"level": 2, "classId": "mage", "traitId": "Show-off"}] } } }
//! ```
//!
//! Loading never fails. A missing or unreadable payload yields an empty
//! store; a bad record only costs that identity its memory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::store::{PartyMemory, RecurringStore};
use crate::core::config::SimulationConfig;
use crate::core::error::{DungeonError, Result};
use crate::core::types::{Coord, PartyToken};
use crate::knowledge::{KnowledgeCell, KnowledgeMap};
use crate::party::MemberTemplate;

/// Key-value blob storage
pub trait BlobStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Blobs held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: AHashMap<String, String>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per blob under a directory
#[derive(Debug, Clone)]
pub struct DirectoryBlobStore {
    root: PathBuf,
}

impl DirectoryBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DungeonError::Storage(format!("invalid blob key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl BlobStore for DirectoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persisted form of one identity's memory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemoryRecord {
    knowledge_grid: Vec<Vec<KnowledgeCell>>,
    exit_known: bool,
    exit_pos: Option<Coord>,
    member_templates: Vec<MemberTemplate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MemoryPayload {
    roster: Vec<PartyToken>,
    memory_by_identity: BTreeMap<PartyToken, MemoryRecord>,
}

/// Serialise the store to its JSON payload
pub fn encode(store: &RecurringStore) -> Result<String> {
    let roster: Vec<PartyToken> = store.roster().cloned().collect();
    let memory_by_identity = roster
        .iter()
        .filter_map(|token| {
            store.recall(token).map(|memory| {
                (
                    token.clone(),
                    MemoryRecord {
                        knowledge_grid: memory.knowledge.to_rows(),
                        exit_known: memory.exit_known,
                        exit_pos: memory.exit_pos,
                        member_templates: memory.member_templates.clone(),
                    },
                )
            })
        })
        .collect();

    let payload = MemoryPayload {
        roster,
        memory_by_identity,
    };
    Ok(serde_json::to_string(&payload)?)
}

/// What a decoded payload must fit: the grid it was learned on, the roster
/// capacity and the highest level a template may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    pub width: i32,
    pub height: i32,
    pub pool_size: usize,
    pub level_cap: u32,
}

impl MemoryLimits {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            width: config.grid.width,
            height: config.grid.height,
            pool_size: config.memory.pool_size,
            level_cap: config.spawn.level_cap,
        }
    }
}

fn record_to_memory(record: MemoryRecord, limits: &MemoryLimits) -> Option<PartyMemory> {
    let levels_ok = record
        .member_templates
        .iter()
        .all(|t| (1..=limits.level_cap).contains(&t.level));
    if !levels_ok {
        return None;
    }
    let knowledge = KnowledgeMap::from_rows(record.knowledge_grid, limits.width, limits.height)?;
    if let Some(pos) = record.exit_pos {
        if !knowledge.in_bounds(pos) {
            return None;
        }
    }
    Some(PartyMemory {
        knowledge,
        exit_known: record.exit_known && record.exit_pos.is_some(),
        exit_pos: record.exit_pos,
        member_templates: record.member_templates,
    })
}

/// Rebuild a store from a payload, best effort
///
/// Records that do not fit `limits` (wrong grid size, exit off the grid,
/// template levels outside `1..=level_cap`) are dropped; their identities
/// stay on the roster without memory.
pub fn decode(raw: &str, limits: &MemoryLimits) -> RecurringStore {
    let mut store = RecurringStore::new(limits.pool_size);

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Discarding unreadable memory payload: {}", e);
            return store;
        }
    };

    let Some(roster) = value.get("roster").and_then(|r| r.as_array()) else {
        tracing::warn!("Memory payload has no roster; starting empty");
        return store;
    };
    for token in roster.iter().filter_map(|t| t.as_str()) {
        if let Some(evicted) = store.enroll(PartyToken::new(token)) {
            tracing::debug!("Roster over capacity, dropping {}", evicted);
        }
    }

    let Some(records) = value.get("memoryByIdentity").and_then(|m| m.as_object()) else {
        return store;
    };
    for (token, record) in records {
        let token = PartyToken::new(token.as_str());
        if !store.contains(&token) {
            continue;
        }
        let memory = serde_json::from_value::<MemoryRecord>(record.clone())
            .ok()
            .and_then(|r| record_to_memory(r, limits));
        match memory {
            Some(memory) => {
                store.checkpoint(&token, memory);
            }
            None => {
                tracing::warn!("Discarding malformed memory record for {}", token);
            }
        }
    }

    store
}

/// Load the store from a blob store; any failure yields what could be read
pub fn load_store(blobs: &dyn BlobStore, key: &str, limits: &MemoryLimits) -> RecurringStore {
    match blobs.read(key) {
        Ok(Some(raw)) => decode(&raw, limits),
        Ok(None) => RecurringStore::new(limits.pool_size),
        Err(e) => {
            tracing::warn!("Could not read memory blob '{}': {}", key, e);
            RecurringStore::new(limits.pool_size)
        }
    }
}

pub fn flush_store(blobs: &mut dyn BlobStore, key: &str, store: &RecurringStore) -> Result<()> {
    let payload = encode(store)?;
    blobs.write(key, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::TileKind;
    use crate::party::{AdventurerClass, AdventurerTrait};

    fn limits(width: i32, height: i32) -> MemoryLimits {
        MemoryLimits {
            width,
            height,
            pool_size: 3,
            level_cap: 5,
        }
    }

    fn sample_store() -> RecurringStore {
        let mut store = RecurringStore::new(3);
        let token = PartyToken::new("r2d2x");
        store.enroll(token.clone());

        let mut knowledge = KnowledgeMap::blank(6, 3);
        knowledge.observe(Coord::new(1, 1), TileKind::Entrance, 1);
        knowledge.observe(Coord::new(4, 1), TileKind::Exit, 9);
        store.checkpoint(
            &token,
            PartyMemory {
                knowledge,
                exit_known: true,
                exit_pos: Some(Coord::new(4, 1)),
                member_templates: vec![MemberTemplate {
                    level: 2,
                    class_id: AdventurerClass::Healer,
                    trait_id: AdventurerTrait::ManaSink,
                }],
            },
        );
        store
    }

    #[test]
    fn test_payload_uses_saved_field_names() {
        let raw = encode(&sample_store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["roster"], serde_json::json!(["r2d2x"]));
        let record = &value["memoryByIdentity"]["r2d2x"];
        assert_eq!(record["exitKnown"], serde_json::json!(true));
        assert_eq!(record["exitPos"], serde_json::json!({"x": 4, "y": 1}));
        assert_eq!(record["knowledgeGrid"].as_array().unwrap().len(), 3);
        assert_eq!(record["memberTemplates"][0]["classId"], "healer");
    }

    #[test]
    fn test_round_trip_through_blob() {
        let store = sample_store();
        let mut blobs = InMemoryBlobStore::new();
        flush_store(&mut blobs, "dc_regular_memory_v1", &store).unwrap();

        let loaded = load_store(&blobs, "dc_regular_memory_v1", &limits(6, 3));
        let token = PartyToken::new("r2d2x");
        assert_eq!(loaded.recall(&token), store.recall(&token));
    }

    #[test]
    fn test_missing_and_garbage_payloads_are_empty() {
        let mut blobs = InMemoryBlobStore::new();
        assert!(load_store(&blobs, "k", &limits(6, 3)).is_empty());

        blobs.write("k", "{not json").unwrap();
        assert!(load_store(&blobs, "k", &limits(6, 3)).is_empty());

        blobs.write("k", "[1, 2, 3]").unwrap();
        assert!(load_store(&blobs, "k", &limits(6, 3)).is_empty());
    }

    #[test]
    fn test_wrong_size_record_is_dropped_but_identity_kept() {
        let raw = encode(&sample_store()).unwrap();
        // Same payload read against a wider grid
        let loaded = decode(&raw, &limits(7, 3));
        let token = PartyToken::new("r2d2x");
        assert!(loaded.contains(&token));
        assert!(loaded.recall(&token).is_none());
    }

    #[test]
    fn test_bad_record_does_not_spoil_others() {
        let raw = r#"{
            "roster": ["good1", "bad01"],
            "memoryByIdentity": {
                "good1": {"knowledgeGrid": [[{"observed": null, "lastSeenTick": 0}]],
                          "exitKnown": false, "exitPos": null, "memberTemplates": []},
                "bad01": {"knowledgeGrid": "nope"}
            }
        }"#;
        let loaded = decode(raw, &limits(1, 1));
        assert!(loaded.recall(&PartyToken::new("good1")).is_some());
        assert!(loaded.recall(&PartyToken::new("bad01")).is_none());
        assert!(loaded.contains(&PartyToken::new("bad01")));
    }

    #[test]
    fn test_template_level_outside_cap_drops_record() {
        let raw = r#"{
            "roster": ["huge1", "zero1", "fine1"],
            "memoryByIdentity": {
                "huge1": {"knowledgeGrid": [[{"observed": null, "lastSeenTick": 0}]],
                          "exitKnown": false, "exitPos": null,
                          "memberTemplates": [{"level": 4000000000, "classId": "healer", "traitId": "Show-off"}]},
                "zero1": {"knowledgeGrid": [[{"observed": null, "lastSeenTick": 0}]],
                          "exitKnown": false, "exitPos": null,
                          "memberTemplates": [{"level": 0, "classId": "mage", "traitId": "Show-off"}]},
                "fine1": {"knowledgeGrid": [[{"observed": null, "lastSeenTick": 0}]],
                          "exitKnown": false, "exitPos": null,
                          "memberTemplates": [{"level": 5, "classId": "mage", "traitId": "Show-off"}]}
            }
        }"#;
        let loaded = decode(raw, &limits(1, 1));
        assert_eq!(loaded.len(), 3);
        assert!(loaded.recall(&PartyToken::new("huge1")).is_none());
        assert!(loaded.recall(&PartyToken::new("zero1")).is_none());
        assert!(loaded.recall(&PartyToken::new("fine1")).is_some());
    }

    #[test]
    fn test_directory_store_rejects_path_keys() {
        let blobs = DirectoryBlobStore::new(std::env::temp_dir());
        assert!(blobs.read("../escape").is_err());
    }
}
