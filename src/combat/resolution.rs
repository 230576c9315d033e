//! Party versus mob encounters
//!
//! The resolver mutates the fighters (hit points, mana, bleed, positions on
//! a successful flee) and reports everything else in an [`Encounter`]; grid
//! changes and resource payouts are left to the caller.

use serde::Serialize;

use super::constants::*;
use super::flee::{flee_probability, should_attempt_flee};
use crate::core::config::CombatConfig;
use crate::dice::Dice;
use crate::dungeon::MobState;
use crate::party::{Member, Party, SkillEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatOutcome {
    /// The mob died
    Victory,
    /// The party escaped before any blows
    Fled,
    /// Every member died
    Wipe,
    /// Round cap reached with both sides standing
    Ongoing,
}

/// One thing that happened during the fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CombatNote {
    Attack {
        member: usize,
        skill: &'static str,
        damage: i32,
    },
    Heal {
        member: usize,
        target: usize,
        skill: &'static str,
        amount: i32,
    },
    Retaliation {
        target: usize,
        attack: &'static str,
        damage: i32,
        bleed: u32,
    },
}

/// Results of an encounter
#[derive(Debug, Clone, Serialize)]
pub struct Encounter {
    pub outcome: CombatOutcome,
    pub rounds: u32,
    /// Resources owed to the dungeon (half of all retaliation damage)
    pub resource_yield: u32,
    pub damage_to_mob: i32,
    pub damage_to_party: i32,
    /// A flee attempt was made and failed
    pub flee_failed: bool,
    pub notes: Vec<CombatNote>,
}

impl Encounter {
    fn new() -> Self {
        Self {
            outcome: CombatOutcome::Ongoing,
            rounds: 0,
            resource_yield: 0,
            damage_to_mob: 0,
            damage_to_party: 0,
            flee_failed: false,
            notes: Vec::new(),
        }
    }
}

/// Living member with the lowest hit-point fraction (first on ties)
fn most_wounded(members: &[Member]) -> Option<usize> {
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_alive())
        .fold(None, |best: Option<(usize, f32)>, (i, m)| {
            let f = m.hp_fraction();
            match best {
                Some((_, bf)) if bf <= f => best,
                _ => Some((i, f)),
            }
        })
        .map(|(i, _)| i)
}

/// One member's action for the round
fn member_acts(
    party: &mut Party,
    index: usize,
    mob: &mut MobState,
    encounter: &mut Encounter,
    dice: &mut dyn Dice,
) {
    let member = &party.members[index];
    let special = member.special_skill();
    let cost = member.special_cost();
    let bonus = member.trait_kind.special_damage_bonus();

    if member.can_use_special() {
        match special.effect {
            SkillEffect::Heal { min, max } => {
                let someone_hurt = party.living().any(Member::is_hurt);
                if someone_hurt {
                    if let Some(target) = most_wounded(&party.members) {
                        let amount = dice.roll(min, max);
                        party.members[index].mp -= cost;
                        party.members[target].heal(amount);
                        encounter.notes.push(CombatNote::Heal {
                            member: index,
                            target,
                            skill: special.name,
                            amount,
                        });
                        return;
                    }
                }
            }
            SkillEffect::Damage { min, max } => {
                let damage = dice.roll(min, max) + bonus;
                party.members[index].mp -= cost;
                strike(mob, index, special.name, damage, encounter);
                return;
            }
        }
    }

    let basic = party.members[index].basic_skill();
    if let SkillEffect::Damage { min, max } = basic.effect {
        let damage = dice.roll(min, max);
        strike(mob, index, basic.name, damage, encounter);
    }
}

fn strike(mob: &mut MobState, member: usize, skill: &'static str, damage: i32, encounter: &mut Encounter) {
    mob.hp -= damage;
    encounter.damage_to_mob += damage;
    encounter.notes.push(CombatNote::Attack {
        member,
        skill,
        damage,
    });
}

/// The mob hits back once at a random living member
fn retaliate(party: &mut Party, mob: &MobState, encounter: &mut Encounter, dice: &mut dyn Dice) {
    let living: Vec<usize> = (0..party.members.len())
        .filter(|i| party.members[*i].is_alive())
        .collect();
    if living.is_empty() {
        return;
    }
    let target = living[dice.index(living.len())];

    let attacks = mob.kind.stats().attacks;
    let attack = attacks[dice.index(attacks.len())];
    let damage = dice.roll(attack.min, attack.max);
    let bleed = dice.roll(BLEED_MIN as i32, BLEED_MAX as i32).max(0) as u32;

    let member = &mut party.members[target];
    member.take_damage(damage);
    member.bleed = bleed;

    encounter.damage_to_party += damage;
    encounter.resource_yield += (damage / RETALIATION_YIELD_DIVISOR).max(0) as u32;
    encounter.notes.push(CombatNote::Retaliation {
        target,
        attack: attack.name,
        damage,
        bleed,
    });
}

/// Resolve a full encounter between a party and the mob on its leader's tile
pub fn resolve_encounter(
    party: &mut Party,
    mob: &mut MobState,
    config: &CombatConfig,
    dice: &mut dyn Dice,
) -> Encounter {
    let mut encounter = Encounter::new();

    if !mob.is_alive() {
        encounter.outcome = CombatOutcome::Victory;
        return encounter;
    }
    if party.living_count() == 0 {
        encounter.outcome = CombatOutcome::Wipe;
        return encounter;
    }

    if should_attempt_flee(party, config, dice) {
        if dice.chance(flee_probability(party, config)) {
            let retreat = party.last_position;
            for member in party.members.iter_mut().filter(|m| m.is_alive()) {
                member.position = retreat;
            }
            encounter.outcome = CombatOutcome::Fled;
            return encounter;
        }
        encounter.flee_failed = true;
    }

    // Fight rounds until one side falls or max rounds reached
    while encounter.rounds < config.max_rounds {
        encounter.rounds += 1;

        for index in 0..party.members.len() {
            if !party.members[index].is_alive() {
                continue;
            }
            member_acts(party, index, mob, &mut encounter, dice);
            if !mob.is_alive() {
                break;
            }
        }

        if !mob.is_alive() {
            encounter.outcome = CombatOutcome::Victory;
            return encounter;
        }

        retaliate(party, mob, &mut encounter, dice);

        if party.living_count() == 0 {
            encounter.outcome = CombatOutcome::Wipe;
            return encounter;
        }
    }

    encounter.outcome = CombatOutcome::Ongoing;
    encounter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Coord, PartyToken};
    use crate::dice::{MaxRolls, ScriptedDice};
    use crate::dungeon::MobKind;
    use crate::knowledge::KnowledgeMap;
    use crate::party::{AdventurerClass, AdventurerTrait, PartyKind};

    fn party(members: Vec<Member>) -> Party {
        Party::new(
            PartyToken::new("c0001"),
            PartyKind::Traveler,
            members,
            KnowledgeMap::blank(8, 8),
            Coord::new(1, 1),
        )
    }

    fn member(class: AdventurerClass) -> Member {
        Member::new(class, AdventurerTrait::ManaSink, 1, Coord::new(2, 1))
    }

    #[test]
    fn test_warrior_cleaves_then_slashes() {
        let mut p = party(vec![member(AdventurerClass::Warrior)]);
        let mut mob = MobState::with_max_hp(MobKind::Slime, 20);
        // No flee attempt; everything else rolls high
        let mut dice = MaxRolls(ScriptedDice::new());
        let encounter = resolve_encounter(&mut p, &mut mob, &CombatConfig::default(), &mut dice);

        assert_eq!(encounter.outcome, CombatOutcome::Victory);
        assert_eq!(encounter.rounds, 2);
        assert!(mob.hp <= 0);
        assert_eq!(p.members[0].mp, 0);
        // Round one retaliation: Pseudopod for 6
        assert_eq!(p.members[0].hp, 54);
        assert_eq!(p.members[0].bleed, 5);
        assert_eq!(encounter.resource_yield, 3);
    }

    #[test]
    fn test_successful_flee_returns_to_last_position() {
        let mut p = party(vec![member(AdventurerClass::Warrior), member(AdventurerClass::Mage)]);
        let mut mob = MobState::new(MobKind::Goblin);
        let mut dice = ScriptedDice::new().with_chances([true, true]);
        let encounter = resolve_encounter(&mut p, &mut mob, &CombatConfig::default(), &mut dice);

        assert_eq!(encounter.outcome, CombatOutcome::Fled);
        assert_eq!(encounter.rounds, 0);
        assert!(p.members.iter().all(|m| m.position == Coord::new(1, 1)));
        assert_eq!(mob.hp, mob.max_hp);
    }

    #[test]
    fn test_failed_flee_still_fights() {
        let mut p = party(vec![member(AdventurerClass::Warrior)]);
        let mut mob = MobState::with_max_hp(MobKind::Slime, 5);
        let mut dice = ScriptedDice::new().with_chances([true, false]);
        let encounter = resolve_encounter(&mut p, &mut mob, &CombatConfig::default(), &mut dice);

        assert!(encounter.flee_failed);
        assert_eq!(encounter.outcome, CombatOutcome::Victory);
        assert_eq!(encounter.rounds, 1);
    }

    #[test]
    fn test_round_cap_leaves_mob_wounded() {
        let mut p = party(vec![member(AdventurerClass::Mage)]);
        p.members[0].mp = 0;
        p.members[0].hp = 500;
        p.members[0].max_hp = 500;
        let mut mob = MobState::with_max_hp(MobKind::Goblin, 1000);
        let config = CombatConfig {
            max_rounds: 3,
            ..CombatConfig::default()
        };
        let mut dice = ScriptedDice::new();
        let encounter = resolve_encounter(&mut p, &mut mob, &config, &mut dice);

        assert_eq!(encounter.outcome, CombatOutcome::Ongoing);
        assert_eq!(encounter.rounds, 3);
        // Staff rolls minimum 2 each round
        assert_eq!(mob.hp, 994);
    }

    #[test]
    fn test_wipe() {
        let mut p = party(vec![member(AdventurerClass::Mage)]);
        p.members[0].hp = 2;
        p.members[0].max_hp = 2;
        p.members[0].mp = 0;
        let mut mob = MobState::with_max_hp(MobKind::Goblin, 100);
        // Avg health is full so no forced flee; the roll says no
        let mut dice = ScriptedDice::new();
        let encounter = resolve_encounter(&mut p, &mut mob, &CombatConfig::default(), &mut dice);

        assert_eq!(encounter.outcome, CombatOutcome::Wipe);
        assert_eq!(encounter.rounds, 1);
        assert_eq!(p.living_count(), 0);
    }

    #[test]
    fn test_healer_heals_only_when_someone_hurt() {
        let mut p = party(vec![member(AdventurerClass::Warrior), member(AdventurerClass::Healer)]);
        p.members[0].mp = 0;
        p.members[0].hp = 30;
        let mut mob = MobState::with_max_hp(MobKind::Slime, 100);
        let config = CombatConfig {
            max_rounds: 1,
            ..CombatConfig::default()
        };
        let mut dice = ScriptedDice::new();
        let encounter = resolve_encounter(&mut p, &mut mob, &config, &mut dice);

        assert!(encounter.notes.contains(&CombatNote::Heal {
            member: 1,
            target: 0,
            skill: "Mend",
            amount: 10
        }));
        assert_eq!(p.members[1].mp, 27);

        let mut healthy = party(vec![member(AdventurerClass::Warrior), member(AdventurerClass::Healer)]);
        healthy.members[0].mp = 0;
        let mut mob = MobState::with_max_hp(MobKind::Slime, 100);
        let mut dice = ScriptedDice::new();
        let encounter = resolve_encounter(&mut healthy, &mut mob, &config, &mut dice);
        assert!(encounter.notes.contains(&CombatNote::Attack {
            member: 1,
            skill: "Mace",
            damage: 3
        }));
        assert_eq!(healthy.members[1].mp, 35);
    }
}
