//! Non-combat tile interactions and per-tick upkeep
//!
//! Each function mutates only the member involved and returns a report;
//! the clock applies tile changes and resource payouts from it.

use super::constants::*;
use crate::dice::Dice;
use crate::dungeon::TrapKind;
use crate::party::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootPickup {
    pub amount: u32,
    /// The tile ran dry and reverts to an empty room
    pub exhausted: bool,
    pub resource_yield: u32,
}

/// Try to pick up loot from the member's tile
pub fn pick_up_loot(member: &mut Member, dice: &mut dyn Dice) -> Option<LootPickup> {
    if !dice.chance(LOOT_PICKUP_CHANCE) {
        return None;
    }
    let amount = dice.roll(LOOT_MIN as i32, LOOT_MAX as i32).max(0) as u32;
    member.loot += amount;
    let exhausted = dice.chance(LOOT_EXHAUST_CHANCE);
    Some(LootPickup {
        amount,
        exhausted,
        resource_yield: LOOT_PICKUP_YIELD,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapSpring {
    pub trap: TrapKind,
    /// 0 when the trap fired and missed
    pub damage: i32,
    /// The trap is spent and reverts to an empty room
    pub disarmed: bool,
    pub resource_yield: u32,
}

/// Roll the trap on the member's tile
pub fn spring_trap(member: &mut Member, trap: TrapKind, dice: &mut dyn Dice) -> Option<TrapSpring> {
    let stats = trap.stats();
    if !dice.chance(stats.trigger_chance) {
        return None;
    }

    let damage = if dice.chance(stats.hit_chance) {
        dice.roll(stats.min_damage, stats.max_damage)
    } else {
        0
    };
    member.take_damage(damage);

    let disarmed = dice.chance(TRAP_DISARM_CHANCE * member.trait_kind.disarm_factor());
    Some(TrapSpring {
        trap,
        damage,
        disarmed,
        resource_yield: (damage / TRAP_YIELD_DIVISOR).max(0) as u32,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Upkeep {
    pub mana_leaked: i32,
    pub bled: bool,
    pub resource_yield: u32,
}

/// Mana leak and bleed for one living member
pub fn upkeep(member: &mut Member, dice: &mut dyn Dice) -> Upkeep {
    let mut report = Upkeep::default();
    if !member.is_alive() {
        return report;
    }

    if member.mp > 0 && dice.chance(MANA_LEAK_CHANCE * member.trait_kind.mana_leak_factor()) {
        let spend = dice.roll(MANA_LEAK_MIN, MANA_LEAK_MAX).min(member.mp);
        member.mp -= spend;
        report.mana_leaked = spend;
        report.resource_yield += spend.max(0) as u32;
    }

    if member.bleed > 0 {
        member.bleed -= 1;
        member.take_damage(BLEED_DAMAGE);
        report.bled = true;
        report.resource_yield += BLEED_YIELD;
    }

    report
}
