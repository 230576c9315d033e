//! Random cult offers
//!
//! At most one offer is open at a time. Answering it, or letting it lapse,
//! starts a cooldown before the next one can appear.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::OfferConfig;
use crate::dice::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferKind {
    /// Political risk now for doubled death rewards
    MarkRegulars,
    /// Economic pressure and lost loot tiles for an immediate payout
    WithholdLoot,
}

impl OfferKind {
    pub fn random(dice: &mut dyn Dice) -> Self {
        if dice.chance(0.5) {
            OfferKind::MarkRegulars
        } else {
            OfferKind::WithholdLoot
        }
    }

    pub fn description(self, config: &OfferConfig) -> String {
        match self {
            OfferKind::MarkRegulars => format!(
                "Spill noble blood: deaths pay x{} for {} ticks. Risk +{} politics.",
                config.mark_reward_multiplier, config.mark_bonus_ticks, config.mark_political_risk
            ),
            OfferKind::WithholdLoot => format!(
                "Starve the markets: remove {} loot nodes for +{} resources now. Risk +{} economics.",
                config.withhold_loot_removed, config.withhold_payout, config.withhold_economic_pressure
            ),
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferKind::MarkRegulars => write!(f, "Mark the Regulars"),
            OfferKind::WithholdLoot => write!(f, "Withhold the Loot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub kind: OfferKind,
    /// Ticks until the offer lapses
    pub expires_in: u32,
}

/// What changed on the board during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferChange {
    Made(OfferKind),
    Expired(OfferKind),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferBoard {
    current: Option<Offer>,
    cooldown: u32,
}

impl OfferBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Offer> {
        self.current
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    fn start_cooldown(&mut self, config: &OfferConfig, dice: &mut dyn Dice) {
        self.cooldown = dice.roll(config.cooldown_min as i32, config.cooldown_max as i32).max(0) as u32;
    }

    /// Close the open offer and start the cooldown
    pub fn answer(&mut self, config: &OfferConfig, dice: &mut dyn Dice) -> Option<OfferKind> {
        let offer = self.current.take()?;
        self.start_cooldown(config, dice);
        Some(offer.kind)
    }

    /// Once-per-tick upkeep: count down, expire, maybe make a new offer
    pub fn advance(&mut self, config: &OfferConfig, dice: &mut dyn Dice) -> Option<OfferChange> {
        self.cooldown = self.cooldown.saturating_sub(1);

        if let Some(offer) = self.current.as_mut() {
            offer.expires_in = offer.expires_in.saturating_sub(1);
            if offer.expires_in == 0 {
                let kind = offer.kind;
                self.current = None;
                self.start_cooldown(config, dice);
                return Some(OfferChange::Expired(kind));
            }
            return None;
        }

        if self.cooldown == 0 && dice.chance(config.offer_chance) {
            let kind = OfferKind::random(dice);
            self.current = Some(Offer {
                kind,
                expires_in: config.offer_duration.max(1),
            });
            return Some(OfferChange::Made(kind));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn test_offer_appears_then_expires() {
        let config = OfferConfig {
            offer_duration: 2,
            ..OfferConfig::default()
        };
        let mut board = OfferBoard::new();
        let mut dice = ScriptedDice::new()
            .with_chances([true, true])
            .with_rolls([100]);

        assert_eq!(
            board.advance(&config, &mut dice),
            Some(OfferChange::Made(OfferKind::MarkRegulars))
        );
        assert_eq!(board.advance(&config, &mut dice), None);
        assert_eq!(
            board.advance(&config, &mut dice),
            Some(OfferChange::Expired(OfferKind::MarkRegulars))
        );
        assert!(board.current().is_none());
        assert_eq!(board.cooldown(), 100);
    }

    #[test]
    fn test_answer_starts_cooldown() {
        let config = OfferConfig::default();
        let mut board = OfferBoard::new();
        let mut dice = ScriptedDice::new().with_chances([true, false]);
        assert_eq!(
            board.advance(&config, &mut dice),
            Some(OfferChange::Made(OfferKind::WithholdLoot))
        );
        assert_eq!(board.answer(&config, &mut dice), Some(OfferKind::WithholdLoot));
        assert_eq!(board.cooldown(), 80);
        assert_eq!(board.answer(&config, &mut dice), None);
    }

    #[test]
    fn test_no_offer_during_cooldown() {
        let config = OfferConfig {
            offer_chance: 1.0,
            ..OfferConfig::default()
        };
        let mut board = OfferBoard {
            current: None,
            cooldown: 3,
        };
        let mut dice = ScriptedDice::new().with_chances([true; 8]);
        assert_eq!(board.advance(&config, &mut dice), None);
        assert_eq!(board.advance(&config, &mut dice), None);
        assert!(matches!(board.advance(&config, &mut dice), Some(OfferChange::Made(_))));
    }
}
