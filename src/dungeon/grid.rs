//! The dungeon grid - tile kinds plus per-tile combat state

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::hazards::{MobKind, MobState, TrapKind};
use super::tile::TileKind;
use crate::core::types::Coord;
use crate::dice::Dice;

/// A single grid tile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: TileKind,
    /// Present while `kind == Mob`
    pub mob: Option<MobState>,
    /// Present while `kind == Trap`
    pub trap: Option<TrapKind>,
    /// Ticks until a defeated mob is replaced
    pub respawn_in: Option<u32>,
}

/// Something that changed on the grid during `advance_mobs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Respawn {
    pub coord: Coord,
    pub kind: MobKind,
}

/// The true dungeon layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    entrance: Coord,
    exit: Coord,
}

impl Grid {
    /// All-wall grid with a corridor on the middle row: entrance at x = 1,
    /// exit at x = width - 2, rooms between.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(5);
        let height = height.max(1);
        let row = height / 2;
        let entrance = Coord::new(1, row);
        let exit = Coord::new(width - 2, row);

        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
            entrance,
            exit,
        };

        for x in (entrance.x + 1)..exit.x {
            if let Some(i) = grid.index(Coord::new(x, row)) {
                grid.cells[i].kind = TileKind::Room;
            }
        }
        if let Some(i) = grid.index(entrance) {
            grid.cells[i].kind = TileKind::Entrance;
        }
        if let Some(i) = grid.index(exit) {
            grid.cells[i].kind = TileKind::Exit;
        }

        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn entrance(&self) -> Coord {
        self.entrance
    }

    pub fn exit(&self) -> Coord {
        self.exit
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

    /// Tile kind at a coordinate; out of bounds reads as Wall
    pub fn tile_at(&self, coord: Coord) -> TileKind {
        self.cell(coord).map(|c| c.kind).unwrap_or(TileKind::Wall)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    pub fn mob(&self, coord: Coord) -> Option<&MobState> {
        self.cell(coord).and_then(|c| c.mob.as_ref())
    }

    pub fn mob_mut(&mut self, coord: Coord) -> Option<&mut MobState> {
        self.cell_mut(coord).and_then(|c| c.mob.as_mut())
    }

    pub fn trap(&self, coord: Coord) -> Option<TrapKind> {
        self.cell(coord).and_then(|c| c.trap)
    }

    /// Overwrite a tile's kind
    ///
    /// Refuses out-of-bounds writes, writes onto the entrance or exit, and
    /// writes of a new entrance or exit. A Mob written this way gets the
    /// default mob at full health; a Trap gets the default trap.
    pub fn set_tile(&mut self, coord: Coord, kind: TileKind) -> bool {
        match kind {
            TileKind::Mob => self.place_mob(coord, MobKind::default()),
            TileKind::Trap => self.place_trap(coord, TrapKind::default()),
            _ => self.write(coord, kind, None, None),
        }
    }

    pub fn place_mob(&mut self, coord: Coord, kind: MobKind) -> bool {
        self.write(coord, TileKind::Mob, Some(MobState::new(kind)), None)
    }

    pub fn place_trap(&mut self, coord: Coord, kind: TrapKind) -> bool {
        self.write(coord, TileKind::Trap, None, Some(kind))
    }

    /// Revert a mob, trap or loot tile to an empty room
    pub fn clear_to_room(&mut self, coord: Coord) -> bool {
        match self.tile_at(coord) {
            TileKind::Mob | TileKind::Trap | TileKind::Loot => {
                self.write(coord, TileKind::Room, None, None)
            }
            _ => false,
        }
    }

    fn write(
        &mut self,
        coord: Coord,
        kind: TileKind,
        mob: Option<MobState>,
        trap: Option<TrapKind>,
    ) -> bool {
        if kind.is_fixture() {
            return false;
        }
        let Some(cell) = self.cell_mut(coord) else {
            return false;
        };
        if cell.kind.is_fixture() {
            return false;
        }
        cell.kind = kind;
        cell.mob = mob;
        cell.trap = trap;
        true
    }

    /// Start the respawn countdown for a defeated mob's tile
    pub fn schedule_respawn(&mut self, coord: Coord, ticks: u32) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.respawn_in = Some(ticks);
        }
    }

    /// In-bounds orthogonal neighbours in `Coord::neighbors` order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.in_bounds(*n))
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coord::new(x, y)))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Is the exit reachable from the entrance, optionally treating one
    /// tile as wall?
    fn connected(&self, blocked: Option<Coord>) -> bool {
        if blocked == Some(self.entrance) || blocked == Some(self.exit) {
            return false;
        }

        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        if let Some(i) = self.index(self.entrance) {
            visited[i] = true;
        }
        queue.push_back(self.entrance);

        while let Some(current) = queue.pop_front() {
            if current == self.exit {
                return true;
            }
            for next in current.neighbors() {
                if Some(next) == blocked || !self.tile_at(next).is_walkable() {
                    continue;
                }
                let Some(i) = self.index(next) else {
                    continue;
                };
                if !visited[i] {
                    visited[i] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }

    pub fn is_connected(&self) -> bool {
        self.connected(None)
    }

    /// Would turning this tile into wall cut the entrance off from the exit?
    ///
    /// True only when the two are connected now and would not be afterwards.
    pub fn would_disconnect(&self, coord: Coord) -> bool {
        if !self.tile_at(coord).is_walkable() {
            return false;
        }
        self.connected(None) && !self.connected(Some(coord))
    }

    /// Regenerate wounded mobs and run respawn countdowns
    ///
    /// A countdown that reaches zero on a tile that is no longer an empty
    /// room stays at zero and retries next tick.
    pub fn advance_mobs(&mut self, dice: &mut dyn Dice) -> Vec<Respawn> {
        let mut respawns = Vec::new();

        for i in 0..self.cells.len() {
            if let Some(mob) = self.cells[i].mob.as_mut() {
                mob.regenerate();
            }

            let Some(remaining) = self.cells[i].respawn_in else {
                continue;
            };
            let remaining = remaining.saturating_sub(1);
            if remaining > 0 {
                self.cells[i].respawn_in = Some(remaining);
                continue;
            }

            if self.cells[i].kind == TileKind::Room {
                let kind = MobKind::random(dice);
                let cell = &mut self.cells[i];
                cell.kind = TileKind::Mob;
                cell.mob = Some(MobState::new(kind));
                cell.trap = None;
                cell.respawn_in = None;
                let coord = Coord::new(i as i32 % self.width, i as i32 / self.width);
                respawns.push(Respawn { coord, kind });
            } else {
                self.cells[i].respawn_in = Some(0);
            }
        }

        respawns
    }

    /// ASCII picture of the grid, with optional markers drawn on top
    pub fn render_ascii(&self, markers: &[(Coord, char)]) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let coord = Coord::new(x, y);
                let glyph = markers
                    .iter()
                    .rev()
                    .find(|(c, _)| *c == coord)
                    .map(|(_, g)| *g)
                    .unwrap_or_else(|| self.tile_at(coord).glyph());
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
