//! Recurring-party memory across runs

use std::path::PathBuf;

use dungeon_economy::core::config::SimulationConfig;
use dungeon_economy::core::types::{Coord, PartyToken};
use dungeon_economy::dungeon::TileKind;
use dungeon_economy::knowledge::KnowledgeMap;
use dungeon_economy::memory::{
    encode, load_store, BlobStore, DirectoryBlobStore, InMemoryBlobStore, MemoryLimits,
    PartyMemory, RecurringStore,
};
use dungeon_economy::party::{AdventurerClass, AdventurerTrait, MemberTemplate};
use dungeon_economy::simulation::{Simulation, SimulationEvent};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "dungeon_economy_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn regulars_only() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.spawn.interval = 2;
    config.spawn.regular_chance = 1.0;
    config.pressure.window_size = 10;
    config
}

#[test]
fn test_roster_survives_a_restart() {
    let dir = scratch_dir("restart");
    let config = regulars_only();

    let mut first = Simulation::new(config.clone())
        .expect("valid config")
        .with_blob_store(DirectoryBlobStore::new(dir.clone()));
    first.run(40);
    first.flush_memory().expect("flush");

    let roster: Vec<PartyToken> = first.state().store.roster().cloned().collect();
    assert!(!roster.is_empty());
    assert!(roster.len() <= config.memory.pool_size);

    let mut second = Simulation::new(config)
        .expect("valid config")
        .with_blob_store(DirectoryBlobStore::new(dir.clone()));
    let loaded = second.drain_events();
    assert!(matches!(
        loaded[0].event,
        SimulationEvent::MemoryLoaded { identities } if identities == roster.len()
    ));

    let reloaded: Vec<PartyToken> = second.state().store.roster().cloned().collect();
    assert_eq!(reloaded, roster);
    for token in &roster {
        match (first.state().store.recall(token), second.state().store.recall(token)) {
            (Some(a), Some(b)) => {
                assert!(a.knowledge.same_observations(&b.knowledge));
                assert_eq!(a.exit_known, b.exit_known);
                assert_eq!(a.member_templates, b.member_templates);
            }
            (None, None) => {}
            _ => panic!("memory for {} changed across restart", token),
        }
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_oldest_identity_is_evicted_from_a_full_pool() {
    let mut store = RecurringStore::new(3);
    let tokens: Vec<PartyToken> = ["aaaaa", "bbbbb", "ccccc", "ddddd"]
        .into_iter()
        .map(PartyToken::new)
        .collect();

    let mut evicted = Vec::new();
    for token in &tokens {
        evicted.extend(store.enroll(token.clone()));
    }
    assert_eq!(evicted, vec![tokens[0].clone()]);

    let mut blobs = InMemoryBlobStore::new();
    blobs
        .write("pool", &encode(&store).expect("encode"))
        .expect("write");
    let limits = MemoryLimits {
        width: 24,
        height: 16,
        pool_size: 3,
        level_cap: 5,
    };
    let loaded = load_store(&blobs, "pool", &limits);
    let roster: Vec<&PartyToken> = loaded.roster().collect();
    assert_eq!(roster, vec![&tokens[1], &tokens[2], &tokens[3]]);
}

#[test]
fn test_garbage_blob_starts_fresh() {
    let mut blobs = InMemoryBlobStore::new();
    let config = SimulationConfig::default();
    blobs
        .write(&config.memory.storage_key, "{ not json")
        .expect("write");

    let sim = Simulation::new(config)
        .expect("valid config")
        .with_blob_store(blobs);
    assert!(sim.state().store.is_empty());
}

#[test]
fn test_remembered_regular_comes_back_with_its_map() {
    let mut config = SimulationConfig::default();
    config.spawn.interval = 1;
    config.spawn.regular_chance = 1.0;
    config.spawn.reuse_chance = 1.0;

    let token = PartyToken::new("vet01");
    let mut store = RecurringStore::new(config.memory.pool_size);
    store.enroll(token.clone());
    let mut knowledge = KnowledgeMap::blank(24, 16);
    for x in 1..=22 {
        let kind = match x {
            1 => TileKind::Entrance,
            22 => TileKind::Exit,
            _ => TileKind::Room,
        };
        knowledge.observe(Coord::new(x, 8), kind, 3);
    }
    let templates = vec![
        MemberTemplate {
            level: 2,
            class_id: AdventurerClass::Ranger,
            trait_id: AdventurerTrait::ShowOff,
        },
        MemberTemplate {
            level: 2,
            class_id: AdventurerClass::Healer,
            trait_id: AdventurerTrait::ManaSink,
        },
    ];
    store.checkpoint(
        &token,
        PartyMemory {
            knowledge,
            exit_known: true,
            exit_pos: Some(Coord::new(22, 8)),
            member_templates: templates.clone(),
        },
    );

    let mut blobs = InMemoryBlobStore::new();
    blobs
        .write(&config.memory.storage_key, &encode(&store).expect("encode"))
        .expect("write");

    let mut sim = Simulation::new(config)
        .expect("valid config")
        .with_blob_store(blobs);
    let events = sim.tick();

    assert!(events.iter().any(|r| matches!(
        &r.event,
        SimulationEvent::PartySpawned { party, returning: true, members: 2, .. } if *party == token
    )));
    let party = sim.state().party(&token).expect("veteran is active");
    assert!(party.exit_known);
    assert!(party.knowledge.is_seen(Coord::new(20, 8)));
    let classes: Vec<AdventurerClass> = party.members.iter().map(|m| m.class).collect();
    assert_eq!(classes, vec![AdventurerClass::Ranger, AdventurerClass::Healer]);
}

#[test]
fn test_out_of_range_level_in_blob_is_ignored() {
    let mut config = SimulationConfig::default();
    config.spawn.interval = 1;
    config.spawn.regular_chance = 1.0;
    config.spawn.reuse_chance = 1.0;

    let token = PartyToken::new("big01");
    let mut store = RecurringStore::new(config.memory.pool_size);
    store.enroll(token.clone());
    store.checkpoint(
        &token,
        PartyMemory {
            knowledge: KnowledgeMap::blank(24, 16),
            exit_known: false,
            exit_pos: None,
            member_templates: vec![MemberTemplate {
                level: 1,
                class_id: AdventurerClass::Healer,
                trait_id: AdventurerTrait::ShowOff,
            }],
        },
    );

    let mut payload: serde_json::Value =
        serde_json::from_str(&encode(&store).expect("encode")).expect("valid json");
    payload["memoryByIdentity"]["big01"]["memberTemplates"][0]["level"] =
        serde_json::json!(4_000_000_000u32);
    let mut blobs = InMemoryBlobStore::new();
    blobs
        .write(&config.memory.storage_key, &payload.to_string())
        .expect("write");

    let mut sim = Simulation::new(config)
        .expect("valid config")
        .with_blob_store(blobs);
    assert!(sim.state().store.contains(&token));
    assert!(sim.state().store.recall(&token).is_none());

    sim.run(20);
    for party in &sim.state().parties {
        for member in &party.members {
            assert!(member.level <= sim.config().spawn.level_cap);
            assert!(member.hp <= member.max_hp);
        }
    }
}
