//! Per-member movement: follow a path when one exists, otherwise wander

use crate::core::config::WanderConfig;
use crate::core::types::Coord;
use crate::dice::Dice;
use crate::dungeon::Grid;
use crate::knowledge::KnowledgeMap;

use super::pathfinding::find_path;

/// Pick a neighbouring tile when there is nowhere to go
///
/// Candidates are neighbours that are walkable in the true grid. Each scores
/// 1 if unseen, minus its known danger, optionally jittered. The first best
/// candidate in neighbour order wins; with no candidate the member stays.
pub fn wander_step(
    grid: &Grid,
    knowledge: &KnowledgeMap,
    from: Coord,
    wander: &WanderConfig,
    dice: &mut dyn Dice,
) -> Coord {
    let mut best: Option<(i32, Coord)> = None;

    for candidate in grid.neighbors(from) {
        if !grid.tile_at(candidate).is_walkable() {
            continue;
        }
        let cell = knowledge.get(candidate);
        let unseen_bonus = if cell.seen() { 0 } else { 1 };
        let mut score = unseen_bonus - cell.danger() as i32;
        if dice.chance(wander.jitter_chance) {
            score += dice.roll(-wander.jitter_magnitude, wander.jitter_magnitude);
        }
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, c)| c).unwrap_or(from)
}

/// Next tile for a member at `from` heading for `goal`
pub fn next_step(
    grid: &Grid,
    knowledge: &KnowledgeMap,
    from: Coord,
    goal: Option<Coord>,
    wander: &WanderConfig,
    dice: &mut dyn Dice,
) -> Coord {
    if let Some(goal) = goal {
        if let Some(path) = find_path(knowledge, from, goal, true) {
            if let Some(&step) = path.get(1) {
                return step;
            }
        }
    }
    wander_step(grid, knowledge, from, wander, dice)
}
