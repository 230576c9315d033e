//! Mob and trap catalogs
//!
//! Each kind carries a fixed stat table. New kinds are added by extending
//! the enum and its `stats()` match.

use serde::{Deserialize, Serialize};

use crate::dice::Dice;

/// One attack a mob can retaliate with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobAttack {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobStats {
    pub name: &'static str,
    pub max_hp: i32,
    /// Hit points recovered per tick while wounded
    pub regen: i32,
    pub attacks: &'static [MobAttack],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    #[default]
    Slime,
    Goblin,
    Sentry,
}

const SLIME_ATTACKS: &[MobAttack] = &[MobAttack { name: "Pseudopod", min: 3, max: 6 }];
const GOBLIN_ATTACKS: &[MobAttack] = &[
    MobAttack { name: "Slash", min: 4, max: 8 },
    MobAttack { name: "Stab", min: 5, max: 9 },
];
const SENTRY_ATTACKS: &[MobAttack] = &[MobAttack { name: "Zap", min: 3, max: 7 }];

impl MobKind {
    pub const ALL: [MobKind; 3] = [MobKind::Slime, MobKind::Goblin, MobKind::Sentry];

    pub fn stats(self) -> MobStats {
        match self {
            MobKind::Slime => MobStats {
                name: "Slime",
                max_hp: 20,
                regen: 1,
                attacks: SLIME_ATTACKS,
            },
            MobKind::Goblin => MobStats {
                name: "Goblin",
                max_hp: 28,
                regen: 0,
                attacks: GOBLIN_ATTACKS,
            },
            MobKind::Sentry => MobStats {
                name: "Sentry",
                max_hp: 16,
                regen: 2,
                attacks: SENTRY_ATTACKS,
            },
        }
    }

    pub fn random(dice: &mut dyn Dice) -> Self {
        Self::ALL[dice.index(Self::ALL.len())]
    }
}

/// A mob occupying a grid tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobState {
    pub kind: MobKind,
    pub hp: i32,
    pub max_hp: i32,
}

impl MobState {
    pub fn new(kind: MobKind) -> Self {
        let max_hp = kind.stats().max_hp;
        Self { kind, hp: max_hp, max_hp }
    }

    /// A mob with custom hit points (used by scenarios and tests)
    pub fn with_max_hp(kind: MobKind, max_hp: i32) -> Self {
        Self { kind, hp: max_hp, max_hp }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Heal by the kind's regen rate, never past max
    pub fn regenerate(&mut self) {
        if self.is_alive() && self.hp < self.max_hp {
            self.hp = (self.hp + self.kind.stats().regen).min(self.max_hp);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapStats {
    pub name: &'static str,
    /// Chance the trap fires when stepped on
    pub trigger_chance: f32,
    /// Chance a fired trap actually hits
    pub hit_chance: f32,
    pub min_damage: i32,
    pub max_damage: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    #[default]
    Spike,
    Dart,
    Snare,
}

impl TrapKind {
    pub const ALL: [TrapKind; 3] = [TrapKind::Spike, TrapKind::Dart, TrapKind::Snare];

    pub fn stats(self) -> TrapStats {
        match self {
            TrapKind::Spike => TrapStats {
                name: "Spike Trap",
                trigger_chance: 0.40,
                hit_chance: 0.90,
                min_damage: 6,
                max_damage: 12,
            },
            TrapKind::Dart => TrapStats {
                name: "Dart Launcher",
                trigger_chance: 0.35,
                hit_chance: 0.80,
                min_damage: 8,
                max_damage: 14,
            },
            TrapKind::Snare => TrapStats {
                name: "Snare",
                trigger_chance: 0.50,
                hit_chance: 0.75,
                min_damage: 4,
                max_damage: 9,
            },
        }
    }

    pub fn random(dice: &mut dyn Dice) -> Self {
        Self::ALL[dice.index(Self::ALL.len())]
    }
}
