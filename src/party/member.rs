//! Individual adventurers

use serde::{Deserialize, Serialize};

use super::class::{AdventurerClass, AdventurerTrait, Skill};
use crate::core::types::Coord;
use crate::dice::Dice;

/// Stat multiplier for a member of the given level
pub fn level_scale(level: u32) -> f64 {
    1.0 + (level.max(1) - 1) as f64 * 0.25
}

/// The persisted shape of a member: enough to rebuild it at full strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTemplate {
    pub level: u32,
    pub class_id: AdventurerClass,
    pub trait_id: AdventurerTrait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub class: AdventurerClass,
    pub trait_kind: AdventurerTrait,
    pub level: u32,
    /// Loot carried, cashed in when the party exits
    pub loot: u32,
    /// Remaining bleed ticks
    pub bleed: u32,
    pub position: Coord,
}

impl Member {
    /// A fresh member at full health and mana
    pub fn new(class: AdventurerClass, trait_kind: AdventurerTrait, level: u32, position: Coord) -> Self {
        let stats = class.stats();
        let scale = level_scale(level);
        let max_hp = (stats.base_hp as f64 * scale).round() as i32;
        let max_mp = (stats.base_mp as f64 * scale).round() as i32;
        Self {
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            class,
            trait_kind,
            level: level.max(1),
            loot: 0,
            bleed: 0,
            position,
        }
    }

    /// A member with random class and trait
    pub fn random(level: u32, position: Coord, dice: &mut dyn Dice) -> Self {
        let class = AdventurerClass::random(dice);
        let trait_kind = AdventurerTrait::random(dice);
        Self::new(class, trait_kind, level, position)
    }

    pub fn from_template(template: &MemberTemplate, position: Coord) -> Self {
        Self::new(template.class_id, template.trait_id, template.level, position)
    }

    pub fn template(&self) -> MemberTemplate {
        MemberTemplate {
            level: self.level,
            class_id: self.class,
            trait_id: self.trait_kind,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp.max(0) as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    pub fn is_hurt(&self) -> bool {
        self.is_alive() && self.hp < self.max_hp
    }

    pub fn basic_skill(&self) -> Skill {
        self.class.stats().basic
    }

    pub fn special_skill(&self) -> Skill {
        self.class.stats().special
    }

    /// Mana cost of the special skill after trait discounts (at least 1)
    pub fn special_cost(&self) -> i32 {
        let cost = self.special_skill().mana_cost - self.trait_kind.special_cost_discount();
        cost.max(1)
    }

    pub fn can_use_special(&self) -> bool {
        self.mp >= self.special_cost()
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount.max(0));
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_alive() {
            self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
        }
    }
}
