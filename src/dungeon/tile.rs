//! Tile kinds

use serde::{Deserialize, Serialize};

/// Hazard weight of a known trap tile
pub const TRAP_DANGER: u32 = 4;

/// Hazard weight of a known mob tile
pub const MOB_DANGER: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Wall,
    Room,
    Mob,
    Trap,
    Loot,
    Entrance,
    Exit,
}

impl TileKind {
    pub const ALL: [TileKind; 7] = [
        TileKind::Wall,
        TileKind::Room,
        TileKind::Mob,
        TileKind::Trap,
        TileKind::Loot,
        TileKind::Entrance,
        TileKind::Exit,
    ];

    /// Wall is the only tile adventurers cannot stand on
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// Entrance and exit are placed once and never edited
    pub fn is_fixture(self) -> bool {
        matches!(self, TileKind::Entrance | TileKind::Exit)
    }

    /// Hazard weight used as extra path cost
    pub fn danger(self) -> u32 {
        match self {
            TileKind::Trap => TRAP_DANGER,
            TileKind::Mob => MOB_DANGER,
            _ => 0,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Room => '.',
            TileKind::Mob => 'm',
            TileKind::Trap => '^',
            TileKind::Loot => '$',
            TileKind::Entrance => 'E',
            TileKind::Exit => 'X',
        }
    }
}
