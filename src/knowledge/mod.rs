//! What each party knows about the dungeon

pub mod map;
pub mod perception;

pub use map::{KnowledgeCell, KnowledgeMap};
pub use perception::{reveal, vision_radius};
