//! The world clock
//!
//! [`Simulation`] owns the dungeon state, the dice and the optional blob
//! store. Ticks, player edits and offer answers all go through it and are
//! reported as [`EventRecord`]s.

use super::events::{EventLog, EventRecord, SimulationEvent};
use super::offers::{Offer, OfferKind};
use super::state::DungeonState;
use super::tick::run_tick;
use crate::core::config::SimulationConfig;
use crate::core::error::{DungeonError, Result};
use crate::core::types::{Coord, Tick};
use crate::dice::{Dice, SimRng};
use crate::dungeon::{apply_edit, EditTool, TileKind};
use crate::memory::{flush_store, load_store, BlobStore, MemoryLimits};

pub struct Simulation {
    state: DungeonState,
    config: SimulationConfig,
    dice: Box<dyn Dice>,
    blobs: Option<Box<dyn BlobStore>>,
    events: EventLog,
}

impl Simulation {
    /// A fresh dungeon seeded from the config
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate().map_err(DungeonError::InvalidConfig)?;
        tracing::info!(seed = config.seed, "Creating dungeon {}x{}", config.grid.width, config.grid.height);
        Ok(Self {
            state: DungeonState::new(&config),
            dice: Box::new(SimRng::seeded(config.seed)),
            config,
            blobs: None,
            events: EventLog::new(),
        })
    }

    /// Replace the dice (scripted or forced rolls for scenarios)
    pub fn with_dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Attach a blob store and load remembered regulars from it
    pub fn with_blob_store(mut self, blobs: impl BlobStore + 'static) -> Self {
        self.state.store = load_store(
            &blobs,
            &self.config.memory.storage_key,
            &MemoryLimits::from_config(&self.config),
        );
        let identities = self.state.store.len();
        self.events
            .push(self.state.tick, SimulationEvent::MemoryLoaded { identities });
        self.blobs = Some(Box::new(blobs));
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &DungeonState {
        &self.state
    }

    /// Direct access for scenario setup
    pub fn state_mut(&mut self) -> &mut DungeonState {
        &mut self.state
    }

    pub fn current_tick(&self) -> Tick {
        self.state.tick
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    /// Advance one tick and return every event since the last drain
    pub fn tick(&mut self) -> Vec<EventRecord> {
        run_tick(
            &mut self.state,
            &self.config,
            &mut *self.dice,
            self.blobs.as_mut(),
            &mut self.events,
        );
        self.events.drain()
    }

    /// Tick until halted or `max_ticks` have run; returns ticks run
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !self.is_halted() {
            self.tick();
            ran += 1;
        }
        ran
    }

    /// Events recorded since the last drain (edits and offer answers)
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// Apply a player edit, paying for it on success
    pub fn apply_edit(&mut self, tool: EditTool, x: i32, y: i32) -> bool {
        let at = Coord::new(x, y);
        let result = apply_edit(
            &mut self.state.grid,
            tool,
            at,
            self.state.resources,
            &self.config.economy,
        );
        match result {
            Ok(cost) => {
                self.state.resources -= cost;
                self.events
                    .push(self.state.tick, SimulationEvent::EditApplied { tool, at, cost });
                true
            }
            Err(reason) => {
                self.events
                    .push(self.state.tick, SimulationEvent::EditRejected { tool, at, reason });
                false
            }
        }
    }

    pub fn current_offer(&self) -> Option<Offer> {
        self.state.offers.current()
    }

    /// Accept the open offer and apply its effect
    pub fn accept_offer(&mut self) -> bool {
        let Some(offer) = self.state.offers.answer(&self.config.offers, &mut *self.dice) else {
            return false;
        };
        let cfg = &self.config.offers;
        match offer {
            OfferKind::MarkRegulars => {
                self.state.meters.political_risk += cfg.mark_political_risk;
                self.state.kill_bonus_ticks = cfg.mark_bonus_ticks;
            }
            OfferKind::WithholdLoot => {
                self.state.meters.economic_pressure += cfg.withhold_economic_pressure;
                self.state.resources += cfg.withhold_payout;
                let loot: Vec<Coord> = self
                    .state
                    .grid
                    .coords()
                    .filter(|c| self.state.grid.tile_at(*c) == TileKind::Loot)
                    .take(cfg.withhold_loot_removed)
                    .collect();
                for at in loot {
                    self.state.grid.clear_to_room(at);
                }
            }
        }
        self.events
            .push(self.state.tick, SimulationEvent::OfferAccepted { offer });
        true
    }

    pub fn decline_offer(&mut self) -> bool {
        let Some(offer) = self.state.offers.answer(&self.config.offers, &mut *self.dice) else {
            return false;
        };
        self.events
            .push(self.state.tick, SimulationEvent::OfferDeclined { offer });
        true
    }

    /// Persist the memory store now
    pub fn flush_memory(&mut self) -> Result<()> {
        let Some(blobs) = self.blobs.as_mut() else {
            return Ok(());
        };
        flush_store(&mut **blobs, &self.config.memory.storage_key, &self.state.store)?;
        self.events.push(
            self.state.tick,
            SimulationEvent::MemoryFlushed {
                identities: self.state.store.len(),
            },
        );
        Ok(())
    }

    /// Forget every regular, in memory and in the blob store
    pub fn clear_memory(&mut self) {
        self.state.store.forget_all();
        if let Some(blobs) = self.blobs.as_mut() {
            if let Err(e) = blobs.remove(&self.config.memory.storage_key) {
                tracing::warn!("Could not clear saved memory: {}", e);
            }
        }
        tracing::info!("Cleared saved memory");
    }
}
