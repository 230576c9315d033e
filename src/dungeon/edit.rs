//! Player build tools
//!
//! An edit is validated against the grid and the resource pool before
//! anything changes. A rejected edit leaves both untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::tile::TileKind;
use crate::core::config::EconomyConfig;
use crate::core::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditTool {
    PlaceRoom,
    PlaceMob,
    PlaceTrap,
    PlaceLoot,
    Erase,
}

impl EditTool {
    pub fn cost(self, economy: &EconomyConfig) -> u32 {
        match self {
            EditTool::PlaceRoom => economy.room_cost,
            EditTool::PlaceMob => economy.mob_cost,
            EditTool::PlaceTrap => economy.trap_cost,
            EditTool::PlaceLoot => economy.loot_cost,
            EditTool::Erase => economy.erase_cost,
        }
    }
}

impl fmt::Display for EditTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditTool::PlaceRoom => "room",
            EditTool::PlaceMob => "mob",
            EditTool::PlaceTrap => "trap",
            EditTool::PlaceLoot => "loot",
            EditTool::Erase => "erase",
        };
        f.write_str(name)
    }
}

impl FromStr for EditTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "room" => Ok(EditTool::PlaceRoom),
            "mob" => Ok(EditTool::PlaceMob),
            "trap" => Ok(EditTool::PlaceTrap),
            "loot" => Ok(EditTool::PlaceLoot),
            "erase" | "wall" => Ok(EditTool::Erase),
            other => Err(format!("unknown tool '{}'", other)),
        }
    }
}

/// Why an edit was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditRejection {
    OutOfBounds,
    /// Entrance and exit cannot be edited
    Fixture,
    InsufficientResources { needed: u32, available: u32 },
    /// A new room must touch an existing walkable tile
    NotAdjacent,
    /// Rooms can only be carved out of wall
    NotWall,
    /// Mobs, traps and loot go on empty rooms
    NotRoom,
    /// Nothing to erase
    AlreadyWall,
    /// Erasing would cut the entrance off from the exit
    WouldDisconnect,
}

impl fmt::Display for EditRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRejection::OutOfBounds => write!(f, "out of bounds"),
            EditRejection::Fixture => write!(f, "entrance and exit are fixed"),
            EditRejection::InsufficientResources { needed, available } => {
                write!(f, "needs {} resources, have {}", needed, available)
            }
            EditRejection::NotAdjacent => write!(f, "not adjacent to a walkable tile"),
            EditRejection::NotWall => write!(f, "target is not wall"),
            EditRejection::NotRoom => write!(f, "target is not an empty room"),
            EditRejection::AlreadyWall => write!(f, "target is already wall"),
            EditRejection::WouldDisconnect => write!(f, "would disconnect entrance from exit"),
        }
    }
}

/// Validate an edit without touching the grid
pub fn check_edit(
    grid: &Grid,
    tool: EditTool,
    coord: Coord,
    available: u32,
    economy: &EconomyConfig,
) -> Result<u32, EditRejection> {
    if !grid.in_bounds(coord) {
        return Err(EditRejection::OutOfBounds);
    }

    let current = grid.tile_at(coord);
    if current.is_fixture() {
        return Err(EditRejection::Fixture);
    }

    match tool {
        EditTool::PlaceRoom => {
            if current != TileKind::Wall {
                return Err(EditRejection::NotWall);
            }
            if !grid.neighbors(coord).any(|n| grid.tile_at(n).is_walkable()) {
                return Err(EditRejection::NotAdjacent);
            }
        }
        EditTool::PlaceMob | EditTool::PlaceTrap | EditTool::PlaceLoot => {
            if current != TileKind::Room {
                return Err(EditRejection::NotRoom);
            }
        }
        EditTool::Erase => {
            if current == TileKind::Wall {
                return Err(EditRejection::AlreadyWall);
            }
            if grid.would_disconnect(coord) {
                return Err(EditRejection::WouldDisconnect);
            }
        }
    }

    let cost = tool.cost(economy);
    if cost > available {
        return Err(EditRejection::InsufficientResources {
            needed: cost,
            available,
        });
    }

    Ok(cost)
}

/// Validate and apply an edit, returning the cost to deduct
///
/// Mobs and traps placed by the player are the default kinds at full
/// strength.
pub fn apply_edit(
    grid: &mut Grid,
    tool: EditTool,
    coord: Coord,
    available: u32,
    economy: &EconomyConfig,
) -> Result<u32, EditRejection> {
    let cost = check_edit(grid, tool, coord, available, economy)?;

    let kind = match tool {
        EditTool::PlaceRoom => TileKind::Room,
        EditTool::PlaceMob => TileKind::Mob,
        EditTool::PlaceTrap => TileKind::Trap,
        EditTool::PlaceLoot => TileKind::Loot,
        EditTool::Erase => TileKind::Wall,
    };

    if !grid.set_tile(coord, kind) {
        // check_edit already ruled out every refusal set_tile knows about
        return Err(EditRejection::Fixture);
    }

    Ok(cost)
}
