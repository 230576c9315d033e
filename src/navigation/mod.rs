//! Goal selection, A* and wandering

pub mod movement;
pub mod pathfinding;
pub mod target;

pub use movement::{next_step, wander_step};
pub use pathfinding::{cumulative_costs, find_path, path_cost, step_cost};
pub use target::{choose_target, nearest_frontier, nearest_known_loot, Goal, GoalKind};
