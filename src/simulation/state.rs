//! World state owned by the clock

use serde::Serialize;

use super::offers::OfferBoard;
use super::pressure::{HaltReason, PressureMeters, WindowCounters};
use crate::core::config::SimulationConfig;
use crate::core::types::{PartyToken, Tick};
use crate::dungeon::Grid;
use crate::memory::RecurringStore;
use crate::party::Party;

#[derive(Debug, Clone)]
pub struct DungeonState {
    pub tick: Tick,
    pub grid: Grid,
    /// Active parties in spawn order
    pub parties: Vec<Party>,
    pub store: RecurringStore,
    /// The dungeon's currency
    pub resources: u32,
    pub meters: PressureMeters,
    pub window: WindowCounters,
    pub offers: OfferBoard,
    /// Ticks left on the marked-regulars reward bonus
    pub kill_bonus_ticks: u32,
    pub totals: RunTotals,
    /// Set once a meter breaches; the clock stops for good
    pub halted: Option<HaltReason>,
}

/// Whole-run tallies for summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub parties_spawned: u32,
    pub parties_exited: u32,
    pub parties_wiped: u32,
    pub adventurer_deaths: u32,
    pub mob_kills: u32,
    pub loot_cashed: u32,
}

impl DungeonState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            tick: 0,
            grid: Grid::new(config.grid.width, config.grid.height),
            parties: Vec::new(),
            store: RecurringStore::new(config.memory.pool_size),
            resources: config.economy.starting_resources,
            meters: PressureMeters::default(),
            window: WindowCounters::default(),
            offers: OfferBoard::new(),
            kill_bonus_ticks: 0,
            totals: RunTotals::default(),
            halted: None,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn is_active(&self, token: &PartyToken) -> bool {
        self.party(token).is_some()
    }

    pub fn party(&self, token: &PartyToken) -> Option<&Party> {
        self.parties.iter().find(|p| &p.id == token)
    }

    /// Multiplier on adventurer death rewards
    pub fn reward_multiplier(&self, config: &SimulationConfig) -> u32 {
        if self.kill_bonus_ticks > 0 {
            config.offers.mark_reward_multiplier.max(1)
        } else {
            1
        }
    }
}
