//! Party creation
//!
//! Regular spawns prefer to bring back a remembered identity that is not
//! already in the dungeon; otherwise a fresh one is minted and enrolled.

use super::events::{EventLog, SimulationEvent};
use super::state::DungeonState;
use crate::core::config::{SimulationConfig, SpawnConfig};
use crate::core::types::{Coord, PartyToken};
use crate::dice::Dice;
use crate::knowledge::{reveal, KnowledgeMap};
use crate::party::{mint_token, Member, Party, PartyKind};

const MINT_ATTEMPTS: usize = 8;

/// Random members for a new party, all standing on `start`
pub fn generate_members(spawn: &SpawnConfig, start: Coord, dice: &mut dyn Dice) -> Vec<Member> {
    let size = dice.roll(spawn.min_party_size as i32, spawn.max_party_size as i32).max(1) as usize;
    (0..size)
        .map(|_| {
            let level = dice.roll(spawn.min_level as i32, spawn.max_level as i32).max(1) as u32;
            Member::random(level, start, dice)
        })
        .collect()
}

/// A token not used by any active party or roster identity
fn fresh_token(state: &DungeonState, dice: &mut dyn Dice) -> PartyToken {
    let mut token = mint_token(dice);
    for _ in 1..MINT_ATTEMPTS {
        if !state.is_active(&token) && !state.store.contains(&token) {
            break;
        }
        token = mint_token(dice);
    }
    token
}

/// Spawn one party at the entrance and let it look around
pub fn spawn_party(
    state: &mut DungeonState,
    config: &SimulationConfig,
    dice: &mut dyn Dice,
    events: &mut EventLog,
) {
    let entrance = state.grid.entrance();
    let (width, height) = (state.grid.width(), state.grid.height());
    let kind = if dice.chance(config.spawn.regular_chance) {
        PartyKind::Regular
    } else {
        PartyKind::Traveler
    };

    let mut returning = false;
    let mut party = match kind {
        PartyKind::Regular => {
            let idle: Vec<PartyToken> = state
                .store
                .roster()
                .filter(|t| !state.is_active(t))
                .cloned()
                .collect();

            if !idle.is_empty() && dice.chance(config.spawn.reuse_chance) {
                let token = idle[dice.index(idle.len())].clone();
                returning = true;
                match state.store.recall(&token) {
                    Some(memory) => {
                        let mut members: Vec<Member> = memory
                            .member_templates
                            .iter()
                            .map(|t| Member::from_template(t, entrance))
                            .collect();
                        if members.is_empty() {
                            members = generate_members(&config.spawn, entrance, dice);
                        }
                        let mut party = Party::new(
                            token,
                            kind,
                            members,
                            memory.knowledge.clone(),
                            entrance,
                        );
                        party.exit_known = memory.exit_known;
                        party.exit_pos = memory.exit_pos;
                        party
                    }
                    None => Party::new(
                        token,
                        kind,
                        generate_members(&config.spawn, entrance, dice),
                        KnowledgeMap::blank(width, height),
                        entrance,
                    ),
                }
            } else {
                let token = fresh_token(state, dice);
                if let Some(evicted) = state.store.enroll(token.clone()) {
                    tracing::debug!("Roster full, forgetting {}", evicted);
                }
                Party::new(
                    token,
                    kind,
                    generate_members(&config.spawn, entrance, dice),
                    KnowledgeMap::blank(width, height),
                    entrance,
                )
            }
        }
        PartyKind::Traveler => Party::new(
            fresh_token(state, dice),
            kind,
            generate_members(&config.spawn, entrance, dice),
            KnowledgeMap::blank(width, height),
            entrance,
        ),
    };

    reveal(&mut party, &state.grid, state.tick);

    events.push(
        state.tick,
        SimulationEvent::PartySpawned {
            party: party.id.clone(),
            kind,
            members: party.members.len(),
            returning,
        },
    );
    state.totals.parties_spawned += 1;
    state.parties.push(party);
}
