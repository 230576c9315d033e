//! Political risk and economic pressure
//!
//! Either meter reaching its threshold ends the run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::PressureConfig;
use crate::party::PartyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// The guard leads a punitive expedition
    PoliticalRaid,
    /// The town deems the dungeon unprofitable
    EconomicRaid,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::PoliticalRaid => write!(f, "Political raid"),
            HaltReason::EconomicRaid => write!(f, "Economic raid"),
        }
    }
}

/// Counters reset every accounting window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowCounters {
    pub loot_events: u32,
    pub kills: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureMeters {
    pub political_risk: u32,
    pub economic_pressure: u32,
}

impl PressureMeters {
    pub fn record_death(&mut self, kind: PartyKind, config: &PressureConfig) {
        self.political_risk += match kind {
            PartyKind::Regular => config.regular_death_risk,
            PartyKind::Traveler => config.traveler_death_risk,
        };
    }

    /// Settle an accounting window from its loot count
    pub fn close_window(&mut self, loot_events: u32, config: &PressureConfig) {
        let loot_rate = loot_events as f32 / config.window_size.max(1) as f32;
        if loot_rate < config.loot_rate_floor {
            self.economic_pressure += config.economic_rise;
        } else {
            self.economic_pressure = self.economic_pressure.saturating_sub(config.economic_decay);
        }
        self.political_risk = self.political_risk.saturating_sub(config.political_decay);
    }

    /// Political raids take precedence when both meters breach together
    pub fn breach(&self, config: &PressureConfig) -> Option<HaltReason> {
        if self.political_risk >= config.political_threshold {
            Some(HaltReason::PoliticalRaid)
        } else if self.economic_pressure >= config.economic_threshold {
            Some(HaltReason::EconomicRaid)
        } else {
            None
        }
    }

    /// Mood of the town for display
    pub fn tension(&self) -> &'static str {
        let total = self.political_risk + self.economic_pressure;
        if total < 60 {
            "Calm"
        } else if total < 120 {
            "Worried"
        } else {
            "Hostile"
        }
    }
}
