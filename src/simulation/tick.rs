//! Tick system - orchestrates one step of the dungeon
//!
//! Order within a tick:
//! spawn -> parties (reveal, move, reveal, interact, upkeep, sweep, exit)
//! -> checkpoint regulars -> remove finished parties -> accounting window
//! -> bonus timer and offers -> mob regen/respawn -> pressure check

use super::events::{EventLog, SimulationEvent};
use super::offers::OfferChange;
use super::spawn::spawn_party;
use super::state::DungeonState;
use crate::combat::{pick_up_loot, resolve_encounter, spring_trap, upkeep, CombatOutcome};
use crate::core::config::SimulationConfig;
use crate::dice::Dice;
use crate::dungeon::TileKind;
use crate::knowledge::reveal;
use crate::memory::{flush_store, BlobStore, PartyMemory};
use crate::navigation::{choose_target, next_step};
use crate::party::Member;

/// Advance the world by one tick. Does nothing once halted.
pub fn run_tick(
    state: &mut DungeonState,
    config: &SimulationConfig,
    dice: &mut dyn Dice,
    blobs: Option<&mut Box<dyn BlobStore>>,
    events: &mut EventLog,
) {
    if state.is_halted() {
        return;
    }

    state.tick += 1;
    let tick = state.tick;

    if tick % config.spawn.interval == 0 && state.parties.len() < config.spawn.max_active_parties {
        spawn_party(state, config, dice, events);
    }

    for index in 0..state.parties.len() {
        advance_party(state, index, config, dice, events);
    }

    checkpoint_regulars(state, config);

    state.parties.retain(|p| p.alive);

    if tick % config.pressure.window_size == 0 {
        close_window(state, config, blobs, events);
    }

    state.kill_bonus_ticks = state.kill_bonus_ticks.saturating_sub(1);
    match state.offers.advance(&config.offers, dice) {
        Some(OfferChange::Made(offer)) => events.push(tick, SimulationEvent::OfferMade { offer }),
        Some(OfferChange::Expired(offer)) => {
            events.push(tick, SimulationEvent::OfferExpired { offer })
        }
        None => {}
    }

    for respawn in state.grid.advance_mobs(dice) {
        events.push(
            tick,
            SimulationEvent::MobRespawned {
                at: respawn.coord,
                mob: respawn.kind,
            },
        );
    }

    if let Some(reason) = state.meters.breach(&config.pressure) {
        state.halted = Some(reason);
        events.push(tick, SimulationEvent::PressureBreached { reason });
    }
}

/// One party's turn
fn advance_party(
    state: &mut DungeonState,
    index: usize,
    config: &SimulationConfig,
    dice: &mut dyn Dice,
    events: &mut EventLog,
) {
    let tick = state.tick;
    let multiplier = state.reward_multiplier(config);
    let party = &mut state.parties[index];
    if !party.alive {
        return;
    }
    party.ticks_alive += 1;

    reveal(party, &state.grid, tick);
    let goal = choose_target(party).map(|g| g.pos);

    if let Some(pos) = party.leader().map(|m| m.position) {
        party.last_position = pos;
    }
    for m in 0..party.members.len() {
        if !party.members[m].is_alive() {
            continue;
        }
        let from = party.members[m].position;
        party.members[m].position =
            next_step(&state.grid, &party.knowledge, from, goal, &config.wander, dice);
    }

    reveal(party, &state.grid, tick);

    // Leader interaction
    if let Some(leader) = party.leader_index() {
        let at = party.members[leader].position;
        match state.grid.tile_at(at) {
            TileKind::Mob => {
                if let Some(mob) = state.grid.mob_mut(at) {
                    let mob_kind = mob.kind;
                    events.push(
                        tick,
                        SimulationEvent::CombatEngaged {
                            party: party.id.clone(),
                            at,
                            mob: mob_kind,
                        },
                    );

                    let encounter = resolve_encounter(party, mob, &config.combat, dice);
                    let mob_hp = mob.hp;

                    if encounter.flee_failed {
                        events.push(
                            tick,
                            SimulationEvent::FleeFailed {
                                party: party.id.clone(),
                                at,
                            },
                        );
                    }
                    state.resources += encounter.resource_yield;

                    let id = party.id.clone();
                    let event = match encounter.outcome {
                        CombatOutcome::Victory => {
                            state.grid.clear_to_room(at);
                            state.grid.schedule_respawn(at, config.combat.mob_respawn_ticks);
                            state.resources += config.economy.mob_kill_reward;
                            state.window.kills += 1;
                            state.totals.mob_kills += 1;
                            SimulationEvent::CombatWon {
                                party: id,
                                at,
                                mob: mob_kind,
                                rounds: encounter.rounds,
                            }
                        }
                        CombatOutcome::Fled => SimulationEvent::CombatFled {
                            party: id,
                            at,
                            mob: mob_kind,
                        },
                        CombatOutcome::Wipe => SimulationEvent::CombatLost {
                            party: id,
                            at,
                            mob: mob_kind,
                        },
                        CombatOutcome::Ongoing => SimulationEvent::CombatStalemate {
                            party: id,
                            at,
                            mob: mob_kind,
                            mob_hp,
                        },
                    };
                    events.push(tick, event);
                }
            }
            TileKind::Loot => {
                if let Some(pickup) = pick_up_loot(&mut party.members[leader], dice) {
                    state.resources += pickup.resource_yield;
                    state.window.loot_events += 1;
                    events.push(
                        tick,
                        SimulationEvent::ItemLooted {
                            party: party.id.clone(),
                            at,
                            amount: pickup.amount,
                        },
                    );
                    if pickup.exhausted {
                        state.grid.clear_to_room(at);
                        events.push(tick, SimulationEvent::LootExhausted { at });
                    }
                }
            }
            TileKind::Trap => {
                let trap = state.grid.trap(at).unwrap_or_default();
                if let Some(spring) = spring_trap(&mut party.members[leader], trap, dice) {
                    state.resources += spring.resource_yield;
                    events.push(
                        tick,
                        SimulationEvent::TrapTriggered {
                            party: party.id.clone(),
                            at,
                            trap,
                            damage: spring.damage,
                        },
                    );
                    if spring.disarmed {
                        state.grid.clear_to_room(at);
                        events.push(
                            tick,
                            SimulationEvent::TrapDisarmed {
                                party: party.id.clone(),
                                at,
                            },
                        );
                    }
                }
            }
            _ => {}
        }
    }

    // Mana leak and bleed for everyone still standing
    for member in party.members.iter_mut() {
        state.resources += upkeep(member, dice).resource_yield;
    }

    // Sweep the dead
    let (living, dead): (Vec<Member>, Vec<Member>) =
        std::mem::take(&mut party.members).into_iter().partition(Member::is_alive);
    party.members = living;
    for fallen in dead {
        state.meters.record_death(party.kind, &config.pressure);
        let reward = config.economy.death_reward * multiplier;
        state.resources += reward;
        state.window.deaths += 1;
        state.totals.adventurer_deaths += 1;
        events.push(
            tick,
            SimulationEvent::MemberDied {
                party: party.id.clone(),
                class: fallen.class,
                reward,
            },
        );
    }

    if party.members.is_empty() {
        party.alive = false;
        state.totals.parties_wiped += 1;
        events.push(
            tick,
            SimulationEvent::PartyWiped {
                party: party.id.clone(),
            },
        );
        return;
    }

    let on_exit = party
        .leader()
        .map_or(false, |leader| state.grid.tile_at(leader.position) == TileKind::Exit);
    if on_exit {
        let loot = party.total_loot();
        state.resources += loot;
        state.totals.parties_exited += 1;
        state.totals.loot_cashed += loot;
        party.returned = true;
        party.alive = false;
        events.push(
            tick,
            SimulationEvent::PartyExited {
                party: party.id.clone(),
                loot,
            },
        );
    }
}

/// Full-replace every active Regular's memory with its current state
///
/// A wiped party has no survivors to describe, so its last checkpoint stands.
fn checkpoint_regulars(state: &mut DungeonState, config: &SimulationConfig) {
    let survivors = state
        .parties
        .iter()
        .filter(|p| p.is_regular() && !p.members.is_empty());
    for party in survivors {
        let mut templates = party.templates();
        if party.returned {
            for template in &mut templates {
                template.level = (template.level + 1).min(config.spawn.level_cap);
            }
        }
        state
            .store
            .checkpoint(&party.id, PartyMemory::capture(party, templates));
    }
}

/// Settle pressure for the window and persist the store
fn close_window(
    state: &mut DungeonState,
    config: &SimulationConfig,
    blobs: Option<&mut Box<dyn BlobStore>>,
    events: &mut EventLog,
) {
    state
        .meters
        .close_window(state.window.loot_events, &config.pressure);
    tracing::debug!(
        tick = state.tick,
        loot = state.window.loot_events,
        kills = state.window.kills,
        deaths = state.window.deaths,
        political = state.meters.political_risk,
        economic = state.meters.economic_pressure,
        "Accounting window closed"
    );
    state.window = Default::default();

    if let Some(blobs) = blobs {
        match flush_store(&mut **blobs, &config.memory.storage_key, &state.store) {
            Ok(()) => events.push(
                state.tick,
                SimulationEvent::MemoryFlushed {
                    identities: state.store.len(),
                },
            ),
            Err(e) => tracing::warn!("Failed to save regular memory: {}", e),
        }
    }
}
