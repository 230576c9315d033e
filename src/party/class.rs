//! Adventurer classes and traits
//!
//! Classes fix base stats and the two skills a member can use in combat.
//! Traits are small modifiers layered on top.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Dice;

/// What a skill does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEffect {
    Damage { min: i32, max: i32 },
    Heal { min: i32, max: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
    pub effect: SkillEffect,
    /// Mana spent per use (0 for basic attacks)
    pub mana_cost: i32,
}

impl Skill {
    pub fn is_heal(&self) -> bool {
        matches!(self.effect, SkillEffect::Heal { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStats {
    pub label: &'static str,
    pub base_hp: i32,
    pub base_mp: i32,
    pub basic: Skill,
    pub special: Skill,
    /// Adds to the party's vision radius
    pub extended_vision: bool,
    /// Counts toward the party's flee bonus
    pub evasive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdventurerClass {
    Warrior,
    Ranger,
    Assassin,
    Mage,
    Healer,
    Bard,
    Engineer,
}

const fn damage(name: &'static str, min: i32, max: i32, mana_cost: i32) -> Skill {
    Skill {
        name,
        effect: SkillEffect::Damage { min, max },
        mana_cost,
    }
}

impl AdventurerClass {
    pub const ALL: [AdventurerClass; 7] = [
        AdventurerClass::Warrior,
        AdventurerClass::Ranger,
        AdventurerClass::Assassin,
        AdventurerClass::Mage,
        AdventurerClass::Healer,
        AdventurerClass::Bard,
        AdventurerClass::Engineer,
    ];

    pub fn stats(self) -> ClassStats {
        match self {
            AdventurerClass::Warrior => ClassStats {
                label: "Warrior",
                base_hp: 60,
                base_mp: 5,
                basic: damage("Slash", 6, 10, 0),
                special: damage("Cleave", 12, 18, 5),
                extended_vision: false,
                evasive: false,
            },
            AdventurerClass::Ranger => ClassStats {
                label: "Ranger",
                base_hp: 40,
                base_mp: 15,
                basic: damage("Shot", 5, 9, 0),
                special: damage("Volley", 10, 15, 6),
                extended_vision: true,
                evasive: true,
            },
            AdventurerClass::Assassin => ClassStats {
                label: "Assassin",
                base_hp: 35,
                base_mp: 20,
                basic: damage("Stab", 5, 11, 0),
                special: damage("Backstab", 14, 22, 8),
                extended_vision: false,
                evasive: true,
            },
            AdventurerClass::Mage => ClassStats {
                label: "Mage",
                base_hp: 28,
                base_mp: 40,
                basic: damage("Staff", 2, 5, 0),
                special: damage("Firebolt", 12, 20, 10),
                extended_vision: false,
                evasive: false,
            },
            AdventurerClass::Healer => ClassStats {
                label: "Healer",
                base_hp: 32,
                base_mp: 35,
                basic: damage("Mace", 3, 6, 0),
                special: Skill {
                    name: "Mend",
                    effect: SkillEffect::Heal { min: 10, max: 16 },
                    mana_cost: 8,
                },
                extended_vision: false,
                evasive: false,
            },
            AdventurerClass::Bard => ClassStats {
                label: "Bard",
                base_hp: 30,
                base_mp: 25,
                basic: damage("Jab", 3, 7, 0),
                special: damage("Dissonance", 8, 12, 6),
                extended_vision: false,
                evasive: false,
            },
            AdventurerClass::Engineer => ClassStats {
                label: "Engineer",
                base_hp: 36,
                base_mp: 20,
                basic: damage("Wrench", 4, 8, 0),
                special: damage("Charge", 10, 16, 7),
                extended_vision: false,
                evasive: false,
            },
        }
    }

    pub fn random(dice: &mut dyn Dice) -> Self {
        Self::ALL[dice.index(Self::ALL.len())]
    }
}

impl fmt::Display for AdventurerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stats().label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdventurerTrait {
    #[serde(rename = "Mana Sink")]
    ManaSink,
    #[serde(rename = "Trap Enthusiast")]
    TrapEnthusiast,
    #[serde(rename = "Show-off")]
    ShowOff,
    #[serde(rename = "Efficient Caster")]
    EfficientCaster,
}

impl AdventurerTrait {
    pub const ALL: [AdventurerTrait; 4] = [
        AdventurerTrait::ManaSink,
        AdventurerTrait::TrapEnthusiast,
        AdventurerTrait::ShowOff,
        AdventurerTrait::EfficientCaster,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdventurerTrait::ManaSink => "Mana Sink",
            AdventurerTrait::TrapEnthusiast => "Trap Enthusiast",
            AdventurerTrait::ShowOff => "Show-off",
            AdventurerTrait::EfficientCaster => "Efficient Caster",
        }
    }

    pub fn random(dice: &mut dyn Dice) -> Self {
        Self::ALL[dice.index(Self::ALL.len())]
    }

    /// Multiplier on the per-tick mana leak chance
    pub fn mana_leak_factor(self) -> f32 {
        if self == AdventurerTrait::ManaSink {
            2.0
        } else {
            1.0
        }
    }

    /// Multiplier on the trap disarm chance
    pub fn disarm_factor(self) -> f32 {
        if self == AdventurerTrait::TrapEnthusiast {
            2.0
        } else {
            1.0
        }
    }

    /// Flat bonus to special-skill damage
    pub fn special_damage_bonus(self) -> i32 {
        if self == AdventurerTrait::ShowOff {
            2
        } else {
            0
        }
    }

    /// Mana saved per special-skill use
    pub fn special_cost_discount(self) -> i32 {
        if self == AdventurerTrait::EfficientCaster {
            2
        } else {
            0
        }
    }
}

impl fmt::Display for AdventurerTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
