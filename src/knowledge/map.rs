//! Per-party fog-of-war memory
//!
//! A party only ever plans against what it has seen. A cell that was never
//! observed has no kind, no danger and is never walkable.

use serde::{Deserialize, Serialize};

use crate::core::types::{Coord, Tick};
use crate::dungeon::TileKind;

/// What a party remembers about one tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeCell {
    /// Kind as last observed; `None` until seen
    pub observed: Option<TileKind>,
    pub last_seen_tick: Tick,
}

impl KnowledgeCell {
    pub fn seen(&self) -> bool {
        self.observed.is_some()
    }

    /// Hazard weight derived from the observed kind
    pub fn danger(&self) -> u32 {
        self.observed.map(TileKind::danger).unwrap_or(0)
    }

    pub fn is_walkable(&self) -> bool {
        self.observed.map(TileKind::is_walkable).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeMap {
    width: i32,
    height: i32,
    cells: Vec<KnowledgeCell>,
}

impl KnowledgeMap {
    /// A map with nothing seen
    pub fn blank(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![KnowledgeCell::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    /// Out-of-bounds coordinates read as an unseen cell
    pub fn get(&self, coord: Coord) -> KnowledgeCell {
        self.index(coord)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    pub fn is_seen(&self, coord: Coord) -> bool {
        self.get(coord).seen()
    }

    pub fn is_known_walkable(&self, coord: Coord) -> bool {
        self.get(coord).is_walkable()
    }

    pub fn danger(&self, coord: Coord) -> u32 {
        self.get(coord).danger()
    }

    /// Record an observation. Returns true if the cell was unseen before.
    pub fn observe(&mut self, coord: Coord, kind: TileKind, tick: Tick) -> bool {
        let Some(i) = self.index(coord) else {
            return false;
        };
        let cell = &mut self.cells[i];
        let newly_seen = cell.observed.is_none();
        cell.observed = Some(kind);
        cell.last_seen_tick = tick;
        newly_seen
    }

    pub fn seen_count(&self) -> usize {
        self.cells.iter().filter(|c| c.seen()).count()
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coord::new(x, y)))
    }

    /// Seen coordinates whose observed kind matches
    pub fn find(&self, kind: TileKind) -> impl Iterator<Item = Coord> + '_ {
        self.coords()
            .filter(move |c| self.get(*c).observed == Some(kind))
    }

    /// Same observations, ignoring when they were made
    pub fn same_observations(&self, other: &KnowledgeMap) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.observed == b.observed)
    }

    /// Row-major nested rows, the persisted shape
    pub fn to_rows(&self) -> Vec<Vec<KnowledgeCell>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height as usize];
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Rebuild from nested rows; `None` unless the shape is exactly
    /// `height` rows of `width` cells.
    pub fn from_rows(rows: Vec<Vec<KnowledgeCell>>, width: i32, height: i32) -> Option<Self> {
        if width < 0 || height < 0 || rows.len() != height as usize {
            return None;
        }
        if rows.iter().any(|row| row.len() != width as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}
