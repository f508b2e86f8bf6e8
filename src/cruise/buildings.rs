//! Procedural building field
//!
//! Keeps the skyline inside a rolling window around current progress:
//! cull well behind the vehicle, fill empty spacing slots ahead with a
//! symmetric pink/cyan pair per slot. The live set stays O(window size)
//! no matter how far the drive goes.

use rand::Rng;

use super::state::{Building, CruiseState, NeonPalette, Pulse};
use crate::consts::*;

/// Building dimension rolls
const HEIGHT_BASE: f32 = 5.0;
const HEIGHT_VAR: f32 = 15.0;
const LATERAL_BASE: f32 = 10.0;
const LATERAL_VAR: f32 = 8.0;
const PINK_FOOT_BASE: f32 = 5.0;
const CYAN_FOOT_BASE: f32 = 4.0;
const FOOT_VAR: f32 = 3.0;
/// The cyan twin is squatter than its pink counterpart
const CYAN_HEIGHT_RATIO: f32 = 0.8;
/// Fresh neon starts bright, then settles into the pulse band
const INITIAL_GLOW: f32 = 0.9;

/// One field maintenance step against current progress
pub fn update_buildings(state: &mut CruiseState) {
    let progress = state.progress;
    state
        .buildings
        .retain(|b| b.z > progress - BUILDING_CULL_BEHIND);

    let mut z = progress + BUILDING_SPAWN_NEAR;
    while z < progress + BUILDING_SPAWN_FAR {
        let occupied = state
            .buildings
            .iter()
            .any(|b| (b.z - z).abs() < BUILDING_SLOT_TOLERANCE);
        if !occupied {
            spawn_pair(state, z);
        }
        z += BUILDING_SPACING;
    }
}

/// Spawn the symmetric pair for one slot: pink-neon left, cyan-neon right
fn spawn_pair(state: &mut CruiseState, z: f32) {
    let height = HEIGHT_BASE + state.rng.random::<f32>() * HEIGHT_VAR;
    let offset = LATERAL_BASE + state.rng.random::<f32>() * LATERAL_VAR;

    let left = Building {
        id: state.next_mesh_id(),
        x: -offset,
        z,
        width: PINK_FOOT_BASE + state.rng.random::<f32>() * FOOT_VAR,
        depth: PINK_FOOT_BASE + state.rng.random::<f32>() * FOOT_VAR,
        height,
        palette: NeonPalette::Pink,
        pulse: Pulse::new(
            INITIAL_GLOW,
            BUILDING_PULSE_MIN,
            BUILDING_PULSE_MAX,
            BUILDING_PULSE_STEP,
        ),
    };
    let right = Building {
        id: state.next_mesh_id(),
        x: offset,
        z,
        width: CYAN_FOOT_BASE + state.rng.random::<f32>() * FOOT_VAR,
        depth: CYAN_FOOT_BASE + state.rng.random::<f32>() * FOOT_VAR,
        height: height * CYAN_HEIGHT_RATIO,
        palette: NeonPalette::Cyan,
        pulse: Pulse::new(
            INITIAL_GLOW,
            BUILDING_PULSE_MIN,
            BUILDING_PULSE_MAX,
            BUILDING_PULSE_STEP,
        ),
    };
    state.buildings.push(left);
    state.buildings.push(right);
}
