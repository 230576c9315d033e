//! Goal selection under partial information
//!
//! Priority: a known exit, then the nearest remembered loot, then the
//! nearest frontier. Distances are Manhattan from the party's rounded
//! centroid and ties go to the first cell in row-major order.

use serde::Serialize;

use crate::core::types::Coord;
use crate::dungeon::TileKind;
use crate::knowledge::KnowledgeMap;
use crate::party::Party;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalKind {
    Exit,
    Loot,
    Frontier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub pos: Coord,
}

pub fn choose_target(party: &Party) -> Option<Goal> {
    if let Some(pos) = party.known_exit() {
        return Some(Goal {
            kind: GoalKind::Exit,
            pos,
        });
    }

    let centroid = party.centroid()?;

    if let Some(pos) = nearest_known_loot(&party.knowledge, centroid) {
        return Some(Goal {
            kind: GoalKind::Loot,
            pos,
        });
    }

    nearest_frontier(&party.knowledge, centroid).map(|pos| Goal {
        kind: GoalKind::Frontier,
        pos,
    })
}

/// Closest cell last observed as Loot
pub fn nearest_known_loot(knowledge: &KnowledgeMap, from: Coord) -> Option<Coord> {
    let mut best: Option<(i32, Coord)> = None;
    for coord in knowledge.find(TileKind::Loot) {
        let distance = coord.manhattan(&from);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, coord));
        }
    }
    best.map(|(_, coord)| coord)
}

/// Staging tile for the closest frontier cell
///
/// A frontier cell is unseen with at least one seen walkable neighbour; the
/// returned position is that neighbour (first in neighbour order), since the
/// frontier itself cannot be pathed to.
pub fn nearest_frontier(knowledge: &KnowledgeMap, from: Coord) -> Option<Coord> {
    let mut best: Option<(i32, Coord)> = None;

    for coord in knowledge.coords() {
        if knowledge.is_seen(coord) {
            continue;
        }
        let Some(staging) = coord
            .neighbors()
            .into_iter()
            .find(|n| knowledge.is_known_walkable(*n))
        else {
            continue;
        };

        let distance = coord.manhattan(&from);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, staging));
        }
    }

    best.map(|(_, staging)| staging)
}
