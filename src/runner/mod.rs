//! Lane-dodger simulation
//!
//! All gameplay logic for the 2D neon runner lives here. This module must
//! stay pure and deterministic:
//! - Seeded RNG only
//! - Elapsed time comes in as an argument and is capped by the tick
//! - No rendering or platform dependencies

pub mod input;
pub mod state;
pub mod tick;

pub use input::DragState;
pub use state::{LaneLine, Obstacle, Player, Road, RunnerPhase, RunnerState};
pub use tick::tick;
