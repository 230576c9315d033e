//! Combat and tile interaction integration tests

use dungeon_economy::combat::{pick_up_loot, resolve_encounter, spring_trap, upkeep, CombatOutcome};
use dungeon_economy::core::config::CombatConfig;
use dungeon_economy::core::types::{Coord, PartyToken};
use dungeon_economy::dice::{MaxRolls, ScriptedDice, SimRng};
use dungeon_economy::dungeon::{MobKind, MobState, TrapKind};
use dungeon_economy::knowledge::KnowledgeMap;
use dungeon_economy::party::{AdventurerClass, AdventurerTrait, Member, Party, PartyKind};

fn solo(class: AdventurerClass) -> Party {
    Party::new(
        PartyToken::new("solo1"),
        PartyKind::Traveler,
        vec![Member::new(class, AdventurerTrait::ManaSink, 1, Coord::new(3, 1))],
        KnowledgeMap::blank(8, 4),
        Coord::new(2, 1),
    )
}

/// A warrior rolling maximum damage always beats a 20 hp slime unless the
/// party runs first.
#[test]
fn test_warrior_beats_slime_across_seeds() {
    let config = CombatConfig::default();
    let mut victories = 0;

    for seed in 0..100 {
        let mut party = solo(AdventurerClass::Warrior);
        let mut mob = MobState::with_max_hp(MobKind::Slime, 20);
        let mut dice = MaxRolls(SimRng::seeded(seed));
        let encounter = resolve_encounter(&mut party, &mut mob, &config, &mut dice);

        assert!(encounter.rounds <= config.max_rounds);
        match encounter.outcome {
            CombatOutcome::Victory => {
                victories += 1;
                assert!(mob.hp <= 0);
                assert!(party.members[0].is_alive());
            }
            CombatOutcome::Fled => {
                assert_eq!(encounter.rounds, 0);
                assert_eq!(party.members[0].position, Coord::new(2, 1));
            }
            other => panic!("seed {} ended in {:?}", seed, other),
        }
    }

    assert!(victories > 0);
}

#[test]
fn test_wipe_when_the_mob_outlasts_the_party() {
    let mut party = solo(AdventurerClass::Mage);
    party.members[0].hp = 1;
    party.members[0].mp = 0;
    let mut mob = MobState::with_max_hp(MobKind::Goblin, 500);
    // Hurt party always tries to flee; this one fails
    let mut dice = ScriptedDice::new().with_chances([false]);
    let encounter = resolve_encounter(&mut party, &mut mob, &CombatConfig::default(), &mut dice);

    assert!(encounter.flee_failed);
    assert_eq!(encounter.outcome, CombatOutcome::Wipe);
    assert_eq!(encounter.rounds, 1);
    assert!(!party.members[0].is_alive());
    assert!(encounter.resource_yield > 0);
}

#[test]
fn test_dead_mob_is_an_immediate_victory() {
    let mut party = solo(AdventurerClass::Healer);
    let mut mob = MobState::with_max_hp(MobKind::Sentry, 10);
    mob.hp = 0;
    let encounter = resolve_encounter(
        &mut party,
        &mut mob,
        &CombatConfig::default(),
        &mut ScriptedDice::new(),
    );
    assert_eq!(encounter.outcome, CombatOutcome::Victory);
    assert_eq!(encounter.rounds, 0);
}

#[test]
fn test_trap_loot_and_upkeep_in_sequence() {
    let mut member = Member::new(AdventurerClass::Engineer, AdventurerTrait::ManaSink, 1, Coord::new(4, 1));
    let start_hp = member.hp;

    // Trap fires and hits for its maximum, no disarm
    let mut dice = MaxRolls(ScriptedDice::new().with_chances([true, true, false]));
    let spring = spring_trap(&mut member, TrapKind::Spike, &mut dice).expect("trap fires");
    assert!(spring.damage > 0);
    assert!(!spring.disarmed);
    assert_eq!(member.hp, start_hp - spring.damage);

    // Loot found, pile survives
    let mut dice = ScriptedDice::new().with_chances([true, false]).with_rolls([3]);
    let pickup = pick_up_loot(&mut member, &mut dice).expect("loot found");
    assert_eq!(pickup.amount, 3);
    assert!(!pickup.exhausted);
    assert_eq!(member.loot, 3);

    // Bleeding costs one hit point per tick until it runs out
    member.bleed = 2;
    let before = member.hp;
    let mut dice = ScriptedDice::new();
    let first = upkeep(&mut member, &mut dice);
    assert!(first.bled);
    upkeep(&mut member, &mut dice);
    let third = upkeep(&mut member, &mut dice);
    assert!(!third.bled);
    assert_eq!(member.hp, before - 2);
    assert_eq!(member.bleed, 0);
}
