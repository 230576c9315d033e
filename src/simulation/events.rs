//! Simulation events
//!
//! One event per occurrence, in the order it happened within a tick.

use std::fmt;

use serde::Serialize;

use super::offers::OfferKind;
use super::pressure::HaltReason;
use crate::core::types::{Coord, PartyToken, Tick};
use crate::dungeon::{EditRejection, EditTool, MobKind, TrapKind};
use crate::party::{AdventurerClass, PartyKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    PartySpawned {
        party: PartyToken,
        kind: PartyKind,
        members: usize,
        /// A Regular identity returning with its remembered map
        returning: bool,
    },
    CombatEngaged {
        party: PartyToken,
        at: Coord,
        mob: MobKind,
    },
    FleeFailed {
        party: PartyToken,
        at: Coord,
    },
    CombatFled {
        party: PartyToken,
        at: Coord,
        mob: MobKind,
    },
    CombatWon {
        party: PartyToken,
        at: Coord,
        mob: MobKind,
        rounds: u32,
    },
    CombatLost {
        party: PartyToken,
        at: Coord,
        mob: MobKind,
    },
    CombatStalemate {
        party: PartyToken,
        at: Coord,
        mob: MobKind,
        mob_hp: i32,
    },
    ItemLooted {
        party: PartyToken,
        at: Coord,
        amount: u32,
    },
    LootExhausted {
        at: Coord,
    },
    TrapTriggered {
        party: PartyToken,
        at: Coord,
        trap: TrapKind,
        damage: i32,
    },
    TrapDisarmed {
        party: PartyToken,
        at: Coord,
    },
    MemberDied {
        party: PartyToken,
        class: AdventurerClass,
        reward: u32,
    },
    PartyWiped {
        party: PartyToken,
    },
    PartyExited {
        party: PartyToken,
        loot: u32,
    },
    MobRespawned {
        at: Coord,
        mob: MobKind,
    },
    PressureBreached {
        reason: HaltReason,
    },
    OfferMade {
        offer: OfferKind,
    },
    OfferAccepted {
        offer: OfferKind,
    },
    OfferDeclined {
        offer: OfferKind,
    },
    OfferExpired {
        offer: OfferKind,
    },
    EditApplied {
        tool: EditTool,
        at: Coord,
        cost: u32,
    },
    EditRejected {
        tool: EditTool,
        at: Coord,
        reason: EditRejection,
    },
    MemoryLoaded {
        identities: usize,
    },
    MemoryFlushed {
        identities: usize,
    },
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationEvent::PartySpawned {
                party,
                kind,
                members,
                returning,
            } => {
                write!(f, "{} party {} enters with {} members", kind, party, members)?;
                if *returning {
                    write!(f, " (returning)")?;
                }
                Ok(())
            }
            SimulationEvent::CombatEngaged { party, at, mob } => {
                write!(f, "{} engages a {:?} at {}", party, mob, at)
            }
            SimulationEvent::FleeFailed { party, at } => {
                write!(f, "{} failed to flee at {}", party, at)
            }
            SimulationEvent::CombatFled { party, at, mob } => {
                write!(f, "{} fled from a {:?} at {}", party, mob, at)
            }
            SimulationEvent::CombatWon {
                party,
                at,
                mob,
                rounds,
            } => write!(f, "{} slew a {:?} at {} in {} rounds", party, mob, at, rounds),
            SimulationEvent::CombatLost { party, at, mob } => {
                write!(f, "{} was wiped out by a {:?} at {}", party, mob, at)
            }
            SimulationEvent::CombatStalemate {
                party,
                at,
                mob,
                mob_hp,
            } => write!(
                f,
                "{} and a {:?} at {} break off ({} hp left)",
                party, mob, at, mob_hp
            ),
            SimulationEvent::ItemLooted { party, at, amount } => {
                write!(f, "{} looted {} at {}", party, amount, at)
            }
            SimulationEvent::LootExhausted { at } => write!(f, "Loot at {} ran dry", at),
            SimulationEvent::TrapTriggered {
                party,
                at,
                trap,
                damage,
            } => write!(f, "{} triggered a {} at {} for {}", party, trap.stats().name, at, damage),
            SimulationEvent::TrapDisarmed { party, at } => {
                write!(f, "{} disarmed the trap at {}", party, at)
            }
            SimulationEvent::MemberDied {
                party,
                class,
                reward,
            } => write!(f, "A {} of {} died (+{})", class, party, reward),
            SimulationEvent::PartyWiped { party } => write!(f, "{} is no more", party),
            SimulationEvent::PartyExited { party, loot } => {
                write!(f, "{} escaped with {} loot", party, loot)
            }
            SimulationEvent::MobRespawned { at, mob } => {
                write!(f, "A {:?} moves into {}", mob, at)
            }
            SimulationEvent::PressureBreached { reason } => {
                write!(f, "{}! The dungeon is overrun. (Game over)", reason)
            }
            SimulationEvent::OfferMade { offer } => write!(f, "[Cult] offers: {}", offer),
            SimulationEvent::OfferAccepted { offer } => write!(f, "[Cult] accepted: {}", offer),
            SimulationEvent::OfferDeclined { offer } => write!(f, "[Cult] declined: {}", offer),
            SimulationEvent::OfferExpired { offer } => write!(f, "[Cult] lapsed: {}", offer),
            SimulationEvent::EditApplied { tool, at, cost } => {
                write!(f, "Built {} at {} (-{})", tool, at, cost)
            }
            SimulationEvent::EditRejected { tool, at, reason } => {
                write!(f, "Cannot {} at {}: {}", tool, at, reason)
            }
            SimulationEvent::MemoryLoaded { identities } => {
                write!(f, "Loaded memory for {} regulars", identities)
            }
            SimulationEvent::MemoryFlushed { identities } => {
                write!(f, "Saved memory for {} regulars", identities)
            }
        }
    }
}

/// An event stamped with the tick it happened on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub tick: Tick,
    pub event: SimulationEvent,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>5}] {}", self.tick, self.event)
    }
}

/// Ordered event buffer; every event is also logged
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, event: SimulationEvent) {
        match &event {
            SimulationEvent::PressureBreached { .. } => tracing::warn!("{}", event),
            SimulationEvent::PartySpawned { .. }
            | SimulationEvent::PartyWiped { .. }
            | SimulationEvent::PartyExited { .. }
            | SimulationEvent::OfferMade { .. }
            | SimulationEvent::OfferAccepted { .. }
            | SimulationEvent::OfferDeclined { .. }
            | SimulationEvent::OfferExpired { .. } => tracing::info!(tick, "{}", event),
            _ => tracing::debug!(tick, "{}", event),
        }
        self.records.push(EventRecord { tick, event });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take everything recorded so far
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }
}
