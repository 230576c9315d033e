//! Perception - copying what a party can see from the true grid into its
//! knowledge map

use crate::core::types::{Coord, Tick};
use crate::dungeon::{Grid, TileKind};
use crate::party::Party;

/// Chebyshev radius every adventurer sees
pub const BASE_VISION_RADIUS: i32 = 1;

/// Added while any living member has extended vision
pub const EXTENDED_VISION_BONUS: i32 = 1;

pub fn vision_radius(party: &Party) -> i32 {
    if party.has_extended_vision() {
        BASE_VISION_RADIUS + EXTENDED_VISION_BONUS
    } else {
        BASE_VISION_RADIUS
    }
}

/// Reveal the square around every living member
///
/// Returns how many cells were seen for the first time. Repeating a reveal
/// without movement changes nothing except `last_seen_tick`.
pub fn reveal(party: &mut Party, grid: &Grid, tick: Tick) -> usize {
    let radius = vision_radius(party);
    let centres: Vec<Coord> = party.living().map(|m| m.position).collect();

    let mut newly_seen = 0;
    for centre in centres {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = centre.offset(dx, dy);
                if !grid.in_bounds(coord) {
                    continue;
                }
                let kind = grid.tile_at(coord);
                if party.knowledge.observe(coord, kind, tick) {
                    newly_seen += 1;
                }
                if kind == TileKind::Exit {
                    party.exit_known = true;
                    party.exit_pos = Some(coord);
                }
            }
        }
    }

    newly_seen
}
