//! Simulation configuration with documented constants
//!
//! All tunable numbers of the dungeon economy live here. A TOML file may
//! override any subset; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DungeonError, Result};

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the deterministic dice
    pub seed: u64,
    pub grid: GridConfig,
    pub spawn: SpawnConfig,
    pub pressure: PressureConfig,
    pub combat: CombatConfig,
    pub economy: EconomyConfig,
    pub offers: OfferConfig,
    pub memory: MemoryConfig,
    pub wander: WanderConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            grid: GridConfig::default(),
            spawn: SpawnConfig::default(),
            pressure: PressureConfig::default(),
            combat: CombatConfig::default(),
            economy: EconomyConfig::default(),
            offers: OfferConfig::default(),
            memory: MemoryConfig::default(),
            wander: WanderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 24,
            height: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Ticks between spawn attempts
    pub interval: u64,

    /// Population cap on simultaneously active parties
    pub max_active_parties: usize,

    /// Probability that a spawn is a Regular party (the rest are Travelers)
    pub regular_chance: f32,

    /// Probability that a Regular spawn reuses a roster identity instead of
    /// minting a new one
    pub reuse_chance: f32,

    pub min_party_size: usize,
    pub max_party_size: usize,

    /// Level range for freshly generated members
    pub min_level: u32,
    pub max_level: u32,

    /// Regulars that escape gain a level on their templates, up to this cap
    pub level_cap: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 8,
            max_active_parties: 10,
            regular_chance: 0.6,
            reuse_chance: 0.7,
            min_party_size: 2,
            max_party_size: 4,
            min_level: 1,
            max_level: 3,
            level_cap: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Political risk at which the guard raids the dungeon (game over)
    pub political_threshold: u32,

    /// Economic pressure at which the town raids the dungeon (game over)
    pub economic_threshold: u32,

    /// Political risk added when a Regular member dies
    ///
    /// Regulars are locals; their deaths are noticed three times as much
    /// as a passing traveler's.
    pub regular_death_risk: u32,
    pub traveler_death_risk: u32,

    /// Ticks per accounting window
    pub window_size: u64,

    /// Loot pickups per tick below which the town economy suffers
    pub loot_rate_floor: f32,

    /// Economic pressure added for a starved window
    pub economic_rise: u32,

    /// Economic pressure removed for a healthy window
    pub economic_decay: u32,

    /// Political risk removed every window
    pub political_decay: u32,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            political_threshold: 100,
            economic_threshold: 100,
            regular_death_risk: 6,
            traveler_death_risk: 2,
            window_size: 50,
            loot_rate_floor: 0.6,
            economic_rise: 8,
            economic_decay: 4,
            political_decay: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Hard cap on rounds per encounter
    pub max_rounds: u32,

    /// Flat chance to attempt fleeing regardless of health
    pub flee_attempt_chance: f32,

    /// Average health fraction below which a party always attempts to flee
    pub low_health_threshold: f32,

    /// Ticks before a defeated mob's tile is re-occupied
    pub mob_respawn_ticks: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_rounds: 12,
            flee_attempt_chance: 0.15,
            low_health_threshold: 0.4,
            mob_respawn_ticks: 30,
        }
    }
}

/// Resource pool costs and rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_resources: u32,

    pub room_cost: u32,
    pub mob_cost: u32,
    pub trap_cost: u32,
    pub loot_cost: u32,
    pub erase_cost: u32,

    /// Resources harvested when an adventurer dies
    pub death_reward: u32,

    /// Resources granted when a party defeats a mob
    pub mob_kill_reward: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_resources: 100,
            room_cost: 5,
            mob_cost: 15,
            trap_cost: 20,
            loot_cost: 10,
            erase_cost: 0,
            death_reward: 10,
            mob_kill_reward: 5,
        }
    }
}

/// Random event ("cult offer") tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferConfig {
    /// Per-tick chance of an offer once the cooldown has elapsed
    pub offer_chance: f32,

    /// Cooldown range (ticks) started by accepting or declining
    pub cooldown_min: u32,
    pub cooldown_max: u32,

    /// Ticks an unanswered offer stays open
    pub offer_duration: u32,

    pub mark_political_risk: u32,
    pub mark_bonus_ticks: u32,
    pub mark_reward_multiplier: u32,

    pub withhold_economic_pressure: u32,
    pub withhold_payout: u32,
    pub withhold_loot_removed: usize,
}

impl Default for OfferConfig {
    fn default() -> Self {
        Self {
            offer_chance: 0.04,
            cooldown_min: 80,
            cooldown_max: 140,
            offer_duration: 40,
            mark_political_risk: 10,
            mark_bonus_ticks: 40,
            mark_reward_multiplier: 2,
            withhold_economic_pressure: 15,
            withhold_payout: 60,
            withhold_loot_removed: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Number of recurring identities remembered
    pub pool_size: usize,

    /// Blob store key for the persisted payload
    pub storage_key: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            pool_size: 3,
            storage_key: "dc_regular_memory_v1".to_string(),
        }
    }
}

/// Perturbation applied to the wandering fallback
///
/// Keeps identical parties standing on identical tiles from moving in
/// lockstep. Set `chance` to 0 for fully deterministic wandering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub jitter_chance: f32,
    pub jitter_magnitude: i32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            jitter_chance: 0.3,
            jitter_magnitude: 1,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML override
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate().map_err(DungeonError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        // Entrance at x = 1 and exit at x = width - 2 need a gap between them
        if self.grid.width < 5 || self.grid.height < 1 {
            return Err(format!(
                "grid must be at least 5x1, got {}x{}",
                self.grid.width, self.grid.height
            ));
        }

        if self.spawn.interval == 0 {
            return Err("spawn.interval must be positive".into());
        }

        if self.spawn.min_party_size == 0 || self.spawn.min_party_size > self.spawn.max_party_size {
            return Err(format!(
                "party size range {}..={} is invalid",
                self.spawn.min_party_size, self.spawn.max_party_size
            ));
        }

        if self.spawn.min_level == 0
            || self.spawn.min_level > self.spawn.max_level
            || self.spawn.max_level > self.spawn.level_cap
        {
            return Err(format!(
                "level range {}..={} (cap {}) is invalid",
                self.spawn.min_level, self.spawn.max_level, self.spawn.level_cap
            ));
        }

        for (name, p) in [
            ("spawn.regular_chance", self.spawn.regular_chance),
            ("spawn.reuse_chance", self.spawn.reuse_chance),
            ("combat.flee_attempt_chance", self.combat.flee_attempt_chance),
            ("offers.offer_chance", self.offers.offer_chance),
            ("wander.jitter_chance", self.wander.jitter_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{} must be within 0..=1, got {}", name, p));
            }
        }

        if self.pressure.window_size == 0 {
            return Err("pressure.window_size must be positive".into());
        }

        if self.combat.max_rounds == 0 {
            return Err("combat.max_rounds must be positive".into());
        }

        if self.offers.cooldown_min > self.offers.cooldown_max {
            return Err(format!(
                "offer cooldown range {}..={} is invalid",
                self.offers.cooldown_min, self.offers.cooldown_max
            ));
        }

        if self.memory.pool_size == 0 {
            return Err("memory.pool_size must be positive".into());
        }

        if self.wander.jitter_magnitude < 0 {
            return Err("wander.jitter_magnitude must not be negative".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_override_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7

            [spawn]
            interval = 4

            [memory]
            pool_size = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.spawn.interval, 4);
        assert_eq!(config.spawn.max_active_parties, 10);
        assert_eq!(config.memory.pool_size, 5);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn test_invalid_party_size_rejected() {
        let mut config = SimulationConfig::default();
        config.spawn.min_party_size = 5;
        config.spawn.max_party_size = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let mut config = SimulationConfig::default();
        config.grid.width = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let result = SimulationConfig::from_toml_str("seed = \"not a number\"");
        assert!(matches!(result, Err(DungeonError::ConfigParse(_))));
    }

    #[test]
    fn test_out_of_range_probability_is_invalid_config() {
        let result = SimulationConfig::from_toml_str("[spawn]\nregular_chance = 1.5");
        assert!(matches!(result, Err(DungeonError::InvalidConfig(_))));
    }
}
