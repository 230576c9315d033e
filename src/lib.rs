//! Dungeon Economy - autonomous adventurers in a player-built dungeon

pub mod combat;
pub mod core;
pub mod dice;
pub mod dungeon;
pub mod knowledge;
pub mod memory;
pub mod navigation;
pub mod party;
pub mod simulation;
