//! The world clock and everything it schedules

pub mod clock;
pub mod events;
pub mod offers;
pub mod pressure;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::Simulation;
pub use events::{EventLog, EventRecord, SimulationEvent};
pub use offers::{Offer, OfferBoard, OfferKind};
pub use pressure::{HaltReason, PressureMeters, WindowCounters};
pub use state::{DungeonState, RunTotals};
