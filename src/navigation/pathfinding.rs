//! A* pathfinding over a party's knowledge map
//!
//! Only seen, walkable cells are ever expanded. Known hazards add their
//! danger weight to the step cost when `allow_danger` is set, so parties
//! route around traps and mobs they remember unless there is no other way.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::core::types::Coord;
use crate::knowledge::KnowledgeMap;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: Coord,
    f_cost: u32, // g_cost + heuristic
    h_cost: u32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; prefer nodes closer to the goal on ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(from: Coord, goal: Coord) -> u32 {
    from.manhattan(&goal).unsigned_abs()
}

/// Cost of stepping onto `coord`
pub fn step_cost(knowledge: &KnowledgeMap, coord: Coord, allow_danger: bool) -> u32 {
    if allow_danger {
        1 + knowledge.danger(coord)
    } else {
        1
    }
}

/// Find a path using A*
///
/// The path includes both `start` and `goal`, and every cell on it,
/// `start` included, is seen and walkable. Returns None when either end is
/// unknown or the goal is unreachable through known territory.
pub fn find_path(
    knowledge: &KnowledgeMap,
    start: Coord,
    goal: Coord,
    allow_danger: bool,
) -> Option<Vec<Coord>> {
    if !knowledge.is_known_walkable(start) || !knowledge.is_known_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Coord, Coord> = AHashMap::new();
    let mut g_scores: AHashMap<Coord, u32> = AHashMap::new();
    let mut closed: AHashSet<Coord> = AHashSet::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: heuristic(start, goal),
        h_cost: heuristic(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, current.coord));
        }
        if !closed.insert(current.coord) {
            continue;
        }

        let current_g = *g_scores.get(&current.coord).unwrap_or(&u32::MAX);

        for neighbor in current.coord.neighbors() {
            if closed.contains(&neighbor) || !knowledge.is_known_walkable(neighbor) {
                continue;
            }

            let tentative_g = current_g.saturating_add(step_cost(knowledge, neighbor, allow_danger));
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                let h_cost = heuristic(neighbor, goal);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + h_cost,
                    h_cost,
                });
            }
        }
    }

    None
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<Coord, Coord>, mut current: Coord) -> Vec<Coord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Running cost after each step of a path (the start costs nothing)
pub fn cumulative_costs(knowledge: &KnowledgeMap, path: &[Coord], allow_danger: bool) -> Vec<u32> {
    let mut total = 0;
    path.iter()
        .enumerate()
        .map(|(i, coord)| {
            if i > 0 {
                total += step_cost(knowledge, *coord, allow_danger);
            }
            total
        })
        .collect()
}

/// Total cost of a path
pub fn path_cost(knowledge: &KnowledgeMap, path: &[Coord], allow_danger: bool) -> u32 {
    cumulative_costs(knowledge, path, allow_danger)
        .last()
        .copied()
        .unwrap_or(0)
}
