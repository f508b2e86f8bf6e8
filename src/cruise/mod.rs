//! Endless-drive simulation
//!
//! Gameplay logic for the pseudo-3D synthwave drive. Pure and deterministic
//! like [`crate::runner`]: seeded RNG only, advanced one fixed logical step
//! per frame, no rendering or platform dependencies. Presentation happens
//! through the [`scene::SceneAdapter`] trait so the simulation never sees a
//! concrete rendering engine.

pub mod buildings;
pub mod input;
pub mod path;
pub mod scene;
pub mod state;
pub mod tick;

pub use input::{SteerKey, SwipeState, apply_key_down, apply_key_up};
pub use path::road_path;
pub use scene::{MeshDesc, MeshId, SceneAdapter, SceneSync, Shape};
pub use state::{
    Building, CameraRig, CruisePhase, CruiseState, NeonPalette, Pulse, Vehicle, VehicleKind,
};
pub use tick::tick;
