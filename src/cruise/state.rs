//! Endless-drive session state

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::scene::{FIRST_DYNAMIC_ID, MeshId};
use crate::consts::*;
use crate::hex_rgb;

/// Current phase of the drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CruisePhase {
    /// Menu shown, nothing advancing; the only entry gate is vehicle choice
    Unselected,
    /// Driving. There is no exit: the drive runs until the page unloads.
    Running,
}

/// Selectable vehicles. Chosen once per session, fixed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Car,
    Bike,
}

impl VehicleKind {
    /// Lateral step per frame while steering; the bike is twitchier
    pub fn steer_step(self) -> f32 {
        match self {
            VehicleKind::Car => CAR_STEER_STEP,
            VehicleKind::Bike => BIKE_STEER_STEP,
        }
    }
}

/// The active vehicle's world placement
#[derive(Debug, Clone, Copy)]
pub struct Vehicle {
    pub kind: VehicleKind,
    /// Lateral offset, clamped to the road bound
    pub x: f32,
    /// Forward position; follows `progress`
    pub z: f32,
}

/// The two skyline palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeonPalette {
    Pink,
    Cyan,
}

impl NeonPalette {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            NeonPalette::Pink => hex_rgb(0xff2481),
            NeonPalette::Cyan => hex_rgb(0x39ffd7),
        }
    }
}

/// A glow intensity bouncing between two bounds, reversing direction at
/// each. Every pulsing material owns one, so glows drift out of lock-step.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    pub value: f32,
    min: f32,
    max: f32,
    step: f32,
    dir: f32,
}

impl Pulse {
    pub fn new(value: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            value,
            min,
            max,
            step,
            dir: 1.0,
        }
    }

    /// One frame of pulse animation
    pub fn advance(&mut self) {
        self.value += self.dir * self.step;
        if self.value >= self.max {
            self.dir = -1.0;
        }
        if self.value <= self.min {
            self.dir = 1.0;
        }
    }
}

/// A neon building in the rolling skyline window
#[derive(Debug, Clone)]
pub struct Building {
    pub id: MeshId,
    pub x: f32,
    /// Forward position; the dedup key for slot occupancy
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub palette: NeonPalette,
    pub pulse: Pulse,
}

/// Chase camera placement, recomputed every frame
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Complete endless-drive session
#[derive(Debug, Clone)]
pub struct CruiseState {
    pub phase: CruisePhase,
    /// None until the menu choice arrives; no default vehicle exists
    pub vehicle: Option<Vehicle>,
    /// Current steer input: -1, 0 or +1
    pub steer: f32,
    /// Monotonic forward-distance scalar
    pub progress: f32,
    pub vehicle_pulse: Pulse,
    pub buildings: Vec<Building>,
    pub camera: CameraRig,
    /// Road mesh z offset, wrapped so the strip appears endless
    pub road_offset: f32,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    next_mesh_id: u32,
}

impl CruiseState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: CruisePhase::Unselected,
            vehicle: None,
            steer: 0.0,
            progress: 0.0,
            vehicle_pulse: Pulse::new(
                0.5,
                VEHICLE_PULSE_MIN,
                VEHICLE_PULSE_MAX,
                VEHICLE_PULSE_STEP,
            ),
            buildings: Vec::new(),
            camera: CameraRig {
                eye: Vec3::new(0.0, CAMERA_HEIGHT, -CAMERA_BACK),
                target: Vec3::new(0.0, LOOK_HEIGHT, LOOK_AHEAD),
            },
            road_offset: -ROAD_WRAP_SPAN / 2.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_mesh_id: FIRST_DYNAMIC_ID,
        }
    }

    /// Gate from the menu into the drive. Ignored once a vehicle exists:
    /// the choice is fixed for the session.
    pub fn select_vehicle(&mut self, kind: VehicleKind) {
        if self.phase != CruisePhase::Unselected {
            return;
        }
        self.vehicle = Some(Vehicle { kind, x: 0.0, z: 0.0 });
        self.progress = 0.0;
        self.phase = CruisePhase::Running;
    }

    pub(crate) fn next_mesh_id(&mut self) -> MeshId {
        let id = self.next_mesh_id;
        self.next_mesh_id += 1;
        MeshId(id)
    }
}
