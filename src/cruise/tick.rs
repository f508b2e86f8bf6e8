//! Endless-drive frame step
//!
//! One call per animation frame once a vehicle is selected. The step is a
//! fixed logical increment, not time-scaled: perceived speed tracks the
//! display refresh rate, reproducing the original cadence.

use glam::Vec3;

use super::buildings::update_buildings;
use super::state::{CameraRig, CruisePhase, CruiseState};
use crate::consts::*;

/// Advance one frame: progress, steering, camera follow, road wrap,
/// building field maintenance, glow pulses. No-op until a vehicle exists.
pub fn tick(state: &mut CruiseState) {
    if state.phase != CruisePhase::Running {
        return;
    }
    let Some(mut vehicle) = state.vehicle else {
        return;
    };

    state.progress += PROGRESS_STEP;

    vehicle.x = (vehicle.x + state.steer * vehicle.kind.steer_step())
        .clamp(-LATERAL_BOUND, LATERAL_BOUND);
    vehicle.z = state.progress;

    state.camera = CameraRig {
        eye: Vec3::new(vehicle.x, CAMERA_HEIGHT, vehicle.z - CAMERA_BACK),
        target: Vec3::new(vehicle.x, LOOK_HEIGHT, vehicle.z + LOOK_AHEAD),
    };
    state.road_offset = state.progress.rem_euclid(ROAD_WRAP_SPAN) - ROAD_WRAP_SPAN / 2.0;
    state.vehicle = Some(vehicle);

    update_buildings(state);

    for building in &mut state.buildings {
        building.pulse.advance();
    }
    state.vehicle_pulse.advance();
}
