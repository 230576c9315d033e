//! Combat resolution and tile interactions

pub mod constants;
pub mod flee;
pub mod interaction;
pub mod resolution;

pub use flee::{flee_probability, should_attempt_flee};
pub use interaction::{pick_up_loot, spring_trap, upkeep, LootPickup, TrapSpring, Upkeep};
pub use resolution::{resolve_encounter, CombatNote, CombatOutcome, Encounter};
