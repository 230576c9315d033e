//! Flee checks

use super::constants::*;
use crate::core::config::CombatConfig;
use crate::dice::Dice;
use crate::party::Party;

/// Chance that a flee attempt succeeds
pub fn flee_probability(party: &Party, config: &CombatConfig) -> f32 {
    let avg = party.avg_hp_fraction();
    let mut p = FLEE_BASE + FLEE_HEALTH_WEIGHT * (1.0 - avg);
    p += FLEE_CLASS_BONUS * party.evasive_count() as f32;
    if avg < config.low_health_threshold {
        p += FLEE_DESPERATION_BONUS;
    }
    p.clamp(FLEE_MIN, FLEE_MAX)
}

/// Badly hurt parties always try; healthy ones occasionally do
pub fn should_attempt_flee(party: &Party, config: &CombatConfig, dice: &mut dyn Dice) -> bool {
    party.avg_hp_fraction() < config.low_health_threshold || dice.chance(config.flee_attempt_chance)
}
