//! Combat and interaction constants - all tunable odds in one place
//!
//! Per-run knobs (round cap, flee attempt chance, respawn delay) live in
//! `CombatConfig`; these are the fixed rules of the game.

// Flee probability terms
pub const FLEE_BASE: f32 = 0.10;
pub const FLEE_HEALTH_WEIGHT: f32 = 0.5;
pub const FLEE_CLASS_BONUS: f32 = 0.10;
pub const FLEE_DESPERATION_BONUS: f32 = 0.15;
pub const FLEE_MIN: f32 = 0.05;
pub const FLEE_MAX: f32 = 0.85;

// Retaliation
pub const BLEED_MIN: u32 = 2;
pub const BLEED_MAX: u32 = 5;
pub const RETALIATION_YIELD_DIVISOR: i32 = 2;

// Loot tiles
pub const LOOT_PICKUP_CHANCE: f32 = 0.35;
pub const LOOT_MIN: u32 = 1;
pub const LOOT_MAX: u32 = 3;
pub const LOOT_PICKUP_YIELD: u32 = 1;
pub const LOOT_EXHAUST_CHANCE: f32 = 0.15;

// Trap tiles
pub const TRAP_DISARM_CHANCE: f32 = 0.10;
pub const TRAP_YIELD_DIVISOR: i32 = 3;

// Upkeep
pub const MANA_LEAK_CHANCE: f32 = 0.25;
pub const MANA_LEAK_MIN: i32 = 1;
pub const MANA_LEAK_MAX: i32 = 3;
pub const BLEED_DAMAGE: i32 = 1;
pub const BLEED_YIELD: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flee_bounds_reasonable() {
        assert!(FLEE_MIN > 0.0 && FLEE_MIN < FLEE_MAX);
        assert!(FLEE_MAX < 1.0);
        assert!(FLEE_BASE >= FLEE_MIN);
    }

    #[test]
    fn test_tile_odds_are_probabilities() {
        for p in [
            LOOT_PICKUP_CHANCE,
            LOOT_EXHAUST_CHANCE,
            TRAP_DISARM_CHANCE,
            MANA_LEAK_CHANCE,
        ] {
            assert!(p > 0.0 && p < 1.0);
        }
        // Doubled by traits and still a probability
        assert!(TRAP_DISARM_CHANCE * 2.0 < 1.0);
        assert!(MANA_LEAK_CHANCE * 2.0 < 1.0);
    }

    #[test]
    fn test_ranges_ordered() {
        assert!(BLEED_MIN <= BLEED_MAX);
        assert!(LOOT_MIN <= LOOT_MAX);
        assert!(MANA_LEAK_MIN <= MANA_LEAK_MAX);
    }
}
