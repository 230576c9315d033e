//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Integer tile coordinate on the dungeon grid
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours in fixed order: +x, -x, +y, -y
    ///
    /// Frontier staging and wandering both rely on this order for their
    /// tie-breaks, so it must not change.
    pub fn neighbors(&self) -> [Coord; 4] {
        [
            Coord::new(self.x + 1, self.y),
            Coord::new(self.x - 1, self.y),
            Coord::new(self.x, self.y + 1),
            Coord::new(self.x, self.y - 1),
        ]
    }

    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity token for a party
///
/// Regular parties keep the same token across spawns; travelers get a fresh
/// one every time.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PartyToken(pub String);

impl PartyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_distances() {
        let a = Coord::new(1, 1);
        let b = Coord::new(4, 3);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
    }

    #[test]
    fn test_neighbor_order_is_fixed() {
        let n = Coord::new(5, 5).neighbors();
        assert_eq!(n[0], Coord::new(6, 5));
        assert_eq!(n[1], Coord::new(4, 5));
        assert_eq!(n[2], Coord::new(5, 6));
        assert_eq!(n[3], Coord::new(5, 4));
    }

    #[test]
    fn test_party_token_display() {
        let token = PartyToken::new("k3x9a");
        assert_eq!(token.to_string(), "k3x9a");
        assert_eq!(token.as_str(), "k3x9a");
    }

    #[test]
    fn test_party_token_serializes_as_string() {
        let token = PartyToken::new("ab12c");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"ab12c\"");
    }
}
