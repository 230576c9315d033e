//! Adventuring parties

use std::fmt;

use serde::{Deserialize, Serialize};

use super::member::{Member, MemberTemplate};
use crate::core::types::{Coord, PartyToken};
use crate::dice::Dice;
use crate::knowledge::KnowledgeMap;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 5;

/// Draw a fresh five-character base-36 identity token
pub fn mint_token(dice: &mut dyn Dice) -> PartyToken {
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[dice.index(TOKEN_ALPHABET.len())] as char)
        .collect();
    PartyToken::new(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyKind {
    /// Locals with a remembered identity; their deaths draw attention
    Regular,
    /// One-off visitors
    Traveler,
}

impl fmt::Display for PartyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyKind::Regular => write!(f, "Regulars"),
            PartyKind::Traveler => write!(f, "Traveler"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Party {
    pub id: PartyToken,
    pub kind: PartyKind,
    pub members: Vec<Member>,
    pub knowledge: KnowledgeMap,
    pub exit_known: bool,
    pub exit_pos: Option<Coord>,
    pub alive: bool,
    pub ticks_alive: u64,
    /// Leader position before the latest move; fleeing returns here
    pub last_position: Coord,
    /// Set when the party left through the exit
    pub returned: bool,
}

impl Party {
    pub fn new(
        id: PartyToken,
        kind: PartyKind,
        members: Vec<Member>,
        knowledge: KnowledgeMap,
        start: Coord,
    ) -> Self {
        Self {
            id,
            kind,
            members,
            knowledge,
            exit_known: false,
            exit_pos: None,
            alive: true,
            ticks_alive: 0,
            last_position: start,
            returned: false,
        }
    }

    pub fn is_regular(&self) -> bool {
        self.kind == PartyKind::Regular
    }

    /// Index of the first living member
    pub fn leader_index(&self) -> Option<usize> {
        self.members.iter().position(Member::is_alive)
    }

    pub fn leader(&self) -> Option<&Member> {
        self.leader_index().map(|i| &self.members[i])
    }

    pub fn living(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// Mean hit-point fraction over living members (0 when none live)
    pub fn avg_hp_fraction(&self) -> f32 {
        let (sum, count) = self
            .living()
            .fold((0.0f32, 0usize), |(s, c), m| (s + m.hp_fraction(), c + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }

    /// Living members' mean position, rounded half up per axis
    pub fn centroid(&self) -> Option<Coord> {
        let (sx, sy, n) = self.living().fold((0i64, 0i64, 0i64), |(x, y, n), m| {
            (x + m.position.x as i64, y + m.position.y as i64, n + 1)
        });
        if n == 0 {
            return None;
        }
        let round = |sum: i64| (sum as f64 / n as f64 + 0.5).floor() as i32;
        Some(Coord::new(round(sx), round(sy)))
    }

    pub fn total_loot(&self) -> u32 {
        self.members.iter().map(|m| m.loot).sum()
    }

    /// Any living member whose class sees further
    pub fn has_extended_vision(&self) -> bool {
        self.living().any(|m| m.class.stats().extended_vision)
    }

    /// Living Rangers and Assassins
    pub fn evasive_count(&self) -> usize {
        self.living().filter(|m| m.class.stats().evasive).count()
    }

    pub fn known_exit(&self) -> Option<Coord> {
        if self.exit_known {
            self.exit_pos
        } else {
            None
        }
    }

    /// Templates of the living members
    pub fn templates(&self) -> Vec<MemberTemplate> {
        self.living().map(Member::template).collect()
    }
}
