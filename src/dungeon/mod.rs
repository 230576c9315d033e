//! The true dungeon: tiles, hazards and player edits

pub mod edit;
pub mod grid;
pub mod hazards;
pub mod tile;

pub use edit::{apply_edit, check_edit, EditRejection, EditTool};
pub use grid::{Cell, Grid, Respawn};
pub use hazards::{MobAttack, MobKind, MobState, MobStats, TrapKind, TrapStats};
pub use tile::TileKind;
