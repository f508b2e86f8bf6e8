//! Scene adapter: the simulation's window into the 3D renderer
//!
//! The drive is presented through a retained-mode scene. All scene-graph
//! mutation goes through the [`SceneAdapter`] trait so the simulation and
//! sync layers carry no dependency on a concrete rendering engine;
//! [`SceneSync`] translates session state into adapter calls each frame and
//! remembers what already exists.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use super::state::{Building, CruiseState, VehicleKind};
use crate::consts::*;
use crate::hex_rgb;

/// Identity of one mesh in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Reserved ids for the static meshes
pub const ROAD_MESH: MeshId = MeshId(0);
pub const CAR_BODY: MeshId = MeshId(1);
pub const BIKE_FRAME: MeshId = MeshId(2);
pub const BIKE_FRONT_WHEEL: MeshId = MeshId(3);
pub const BIKE_REAR_WHEEL: MeshId = MeshId(4);
/// Dynamically allocated ids (buildings) start here
pub const FIRST_DYNAMIC_ID: u32 = 16;

const BIKE_MESHES: [MeshId; 3] = [BIKE_FRAME, BIKE_FRONT_WHEEL, BIKE_REAR_WHEEL];

/// Geometry shapes the renderer knows how to tessellate
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Cuboid { width: f32, height: f32, depth: f32 },
    Cylinder { radius: f32, length: f32 },
    Torus { radius: f32, tube: f32 },
    /// Flat strip in the xz plane, laterally deformed by the road path
    RoadStrip {
        width: f32,
        length: f32,
        x_segments: u32,
        z_segments: u32,
    },
}

/// Everything needed to add one mesh to the scene
#[derive(Debug, Clone, Copy)]
pub struct MeshDesc {
    pub shape: Shape,
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Thin retained-scene interface: add/remove meshes, move them, tweak
/// their glow, and place the camera. The wgpu renderer implements this;
/// tests substitute a recorder.
pub trait SceneAdapter {
    fn add_mesh(&mut self, id: MeshId, desc: &MeshDesc);
    fn remove_mesh(&mut self, id: MeshId);
    fn set_transform(&mut self, id: MeshId, position: Vec3, rotation: Quat);
    fn set_emissive(&mut self, id: MeshId, intensity: f32);
    fn set_visible(&mut self, id: MeshId, visible: bool);
    fn set_camera(&mut self, eye: Vec3, target: Vec3);
}

/// Per-frame state-to-scene synchronization with id bookkeeping
#[derive(Debug, Default)]
pub struct SceneSync {
    known_buildings: HashSet<MeshId>,
    shown: Option<VehicleKind>,
}

impl SceneSync {
    /// Build the static scene: the road strip and both vehicles, hidden
    /// until the menu choice arrives.
    pub fn new(adapter: &mut dyn SceneAdapter) -> Self {
        adapter.add_mesh(ROAD_MESH, &road_desc());
        adapter.add_mesh(CAR_BODY, &car_desc());
        let [frame, front, rear] = bike_descs();
        adapter.add_mesh(BIKE_FRAME, &frame);
        adapter.add_mesh(BIKE_FRONT_WHEEL, &front);
        adapter.add_mesh(BIKE_REAR_WHEEL, &rear);
        adapter.set_visible(CAR_BODY, false);
        for id in BIKE_MESHES {
            adapter.set_visible(id, false);
        }
        Self::default()
    }

    /// Push one frame of state into the scene
    pub fn sync(&mut self, state: &CruiseState, adapter: &mut dyn SceneAdapter) {
        if let Some(vehicle) = &state.vehicle {
            if self.shown != Some(vehicle.kind) {
                self.shown = Some(vehicle.kind);
                let is_car = vehicle.kind == VehicleKind::Car;
                adapter.set_visible(CAR_BODY, is_car);
                for id in BIKE_MESHES {
                    adapter.set_visible(id, !is_car);
                }
            }

            let base = Vec3::new(vehicle.x, VEHICLE_HEIGHT, vehicle.z);
            match vehicle.kind {
                VehicleKind::Car => {
                    adapter.set_transform(CAR_BODY, base, Quat::IDENTITY);
                    adapter.set_emissive(CAR_BODY, state.vehicle_pulse.value);
                }
                VehicleKind::Bike => {
                    adapter.set_transform(BIKE_FRAME, base, Quat::from_rotation_z(FRAC_PI_2));
                    adapter.set_transform(
                        BIKE_FRONT_WHEEL,
                        base + Vec3::new(0.5, -0.3, 0.0),
                        Quat::IDENTITY,
                    );
                    adapter.set_transform(
                        BIKE_REAR_WHEEL,
                        base + Vec3::new(-0.5, -0.3, 0.0),
                        Quat::IDENTITY,
                    );
                    // Only the frame pulses; the wheels hold their glow
                    adapter.set_emissive(BIKE_FRAME, state.vehicle_pulse.value);
                }
            }
        }

        adapter.set_transform(
            ROAD_MESH,
            Vec3::new(0.0, ROAD_HEIGHT, state.road_offset),
            Quat::IDENTITY,
        );

        let live: HashSet<MeshId> = state.buildings.iter().map(|b| b.id).collect();
        for id in self.known_buildings.difference(&live) {
            adapter.remove_mesh(*id);
        }
        for building in &state.buildings {
            if !self.known_buildings.contains(&building.id) {
                adapter.add_mesh(building.id, &building_desc(building));
            }
            adapter.set_emissive(building.id, building.pulse.value);
        }
        self.known_buildings = live;

        adapter.set_camera(state.camera.eye, state.camera.target);
    }
}

fn road_desc() -> MeshDesc {
    MeshDesc {
        shape: Shape::RoadStrip {
            width: ROAD_WIDTH,
            length: ROAD_LENGTH,
            x_segments: ROAD_X_SEGMENTS,
            z_segments: ROAD_Z_SEGMENTS,
        },
        color: hex_rgb(0x101019),
        emissive: hex_rgb(0xff2490),
        emissive_intensity: 0.14,
        position: Vec3::new(0.0, ROAD_HEIGHT, -ROAD_WRAP_SPAN / 2.0),
        rotation: Quat::IDENTITY,
    }
}

fn car_desc() -> MeshDesc {
    let cyan = hex_rgb(0x39ffd7);
    MeshDesc {
        shape: Shape::Cuboid {
            width: 1.05,
            height: 0.38,
            depth: 2.1,
        },
        color: cyan,
        emissive: cyan,
        emissive_intensity: 0.5,
        position: Vec3::new(0.0, VEHICLE_HEIGHT, 0.0),
        rotation: Quat::IDENTITY,
    }
}

fn bike_descs() -> [MeshDesc; 3] {
    let pink = hex_rgb(0xff2481);
    let cyan = hex_rgb(0x39ffd7);
    let frame = MeshDesc {
        shape: Shape::Cylinder {
            radius: 0.08,
            length: 1.2,
        },
        color: pink,
        emissive: pink,
        emissive_intensity: 0.5,
        position: Vec3::new(0.0, VEHICLE_HEIGHT, 0.0),
        rotation: Quat::from_rotation_z(FRAC_PI_2),
    };
    let wheel = MeshDesc {
        shape: Shape::Torus {
            radius: 0.3,
            tube: 0.08,
        },
        color: cyan,
        emissive: cyan,
        emissive_intensity: 0.7,
        position: Vec3::new(0.5, VEHICLE_HEIGHT - 0.3, 0.0),
        rotation: Quat::IDENTITY,
    };
    let rear = MeshDesc {
        position: Vec3::new(-0.5, VEHICLE_HEIGHT - 0.3, 0.0),
        ..wheel
    };
    [frame, wheel, rear]
}

fn building_desc(building: &Building) -> MeshDesc {
    let rgb = building.palette.rgb();
    MeshDesc {
        shape: Shape::Cuboid {
            width: building.width,
            height: building.height,
            depth: building.depth,
        },
        color: rgb,
        emissive: rgb,
        emissive_intensity: building.pulse.value,
        position: Vec3::new(building.x, building.height / 2.0, building.z),
        rotation: Quat::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cruise::tick;

    /// Records adapter calls for assertions
    #[derive(Default)]
    struct Recorder {
        added: Vec<MeshId>,
        removed: Vec<MeshId>,
        visible: std::collections::HashMap<MeshId, bool>,
        emissive: std::collections::HashMap<MeshId, f32>,
        transforms: std::collections::HashMap<MeshId, Vec3>,
        camera: Option<(Vec3, Vec3)>,
    }

    impl SceneAdapter for Recorder {
        fn add_mesh(&mut self, id: MeshId, _desc: &MeshDesc) {
            self.added.push(id);
        }
        fn remove_mesh(&mut self, id: MeshId) {
            self.removed.push(id);
        }
        fn set_transform(&mut self, id: MeshId, position: Vec3, _rotation: Quat) {
            self.transforms.insert(id, position);
        }
        fn set_emissive(&mut self, id: MeshId, intensity: f32) {
            self.emissive.insert(id, intensity);
        }
        fn set_visible(&mut self, id: MeshId, visible: bool) {
            self.visible.insert(id, visible);
        }
        fn set_camera(&mut self, eye: Vec3, target: Vec3) {
            self.camera = Some((eye, target));
        }
    }

    #[test]
    fn test_init_builds_hidden_vehicles() {
        let mut recorder = Recorder::default();
        let _sync = SceneSync::new(&mut recorder);
        assert_eq!(recorder.added.len(), 5);
        assert_eq!(recorder.visible[&CAR_BODY], false);
        assert_eq!(recorder.visible[&BIKE_FRAME], false);
    }

    #[test]
    fn test_selection_flips_visibility() {
        let mut recorder = Recorder::default();
        let mut sync = SceneSync::new(&mut recorder);
        let mut state = CruiseState::new(2);
        state.select_vehicle(VehicleKind::Bike);
        sync.sync(&state, &mut recorder);
        assert_eq!(recorder.visible[&CAR_BODY], false);
        assert!(recorder.visible[&BIKE_FRAME]);
        assert!(recorder.visible[&BIKE_FRONT_WHEEL]);
    }

    #[test]
    fn test_buildings_are_added_and_removed() {
        let mut recorder = Recorder::default();
        let mut sync = SceneSync::new(&mut recorder);
        let mut state = CruiseState::new(2);
        state.select_vehicle(VehicleKind::Car);

        tick(&mut state);
        sync.sync(&state, &mut recorder);
        // 5 static meshes + 8 buildings
        assert_eq!(recorder.added.len(), 13);

        // Drive far enough that the first slots fall out of the window
        for _ in 0..2000 {
            tick(&mut state);
        }
        sync.sync(&state, &mut recorder);
        assert!(!recorder.removed.is_empty());
        // Removed ids were all previously added
        for id in &recorder.removed {
            assert!(recorder.added.contains(id));
        }
    }

    #[test]
    fn test_vehicle_and_camera_follow_state() {
        let mut recorder = Recorder::default();
        let mut sync = SceneSync::new(&mut recorder);
        let mut state = CruiseState::new(2);
        state.select_vehicle(VehicleKind::Car);
        state.steer = 1.0;
        for _ in 0..5 {
            tick(&mut state);
        }
        sync.sync(&state, &mut recorder);

        let vehicle = state.vehicle.unwrap();
        let car_pos = recorder.transforms[&CAR_BODY];
        assert_eq!(car_pos, Vec3::new(vehicle.x, 0.28, vehicle.z));
        let (eye, target) = recorder.camera.unwrap();
        assert_eq!(eye, state.camera.eye);
        assert_eq!(target, state.camera.target);
        // Car pulses with the vehicle channel
        assert_eq!(recorder.emissive[&CAR_BODY], state.vehicle_pulse.value);
    }

    #[test]
    fn test_bike_frame_pulses_wheels_do_not() {
        let mut recorder = Recorder::default();
        let mut sync = SceneSync::new(&mut recorder);
        let mut state = CruiseState::new(2);
        state.select_vehicle(VehicleKind::Bike);
        tick(&mut state);
        sync.sync(&state, &mut recorder);
        assert_eq!(recorder.emissive[&BIKE_FRAME], state.vehicle_pulse.value);
        assert!(!recorder.emissive.contains_key(&BIKE_FRONT_WHEEL));
        // Wheels ride below the frame
        let frame = recorder.transforms[&BIKE_FRAME];
        let wheel = recorder.transforms[&BIKE_FRONT_WHEEL];
        assert!(wheel.y < frame.y);
        assert_eq!(wheel.x - frame.x, 0.5);
    }

    #[test]
    fn test_road_wraps_with_progress() {
        let mut recorder = Recorder::default();
        let mut sync = SceneSync::new(&mut recorder);
        let mut state = CruiseState::new(2);
        state.select_vehicle(VehicleKind::Car);
        tick(&mut state);
        sync.sync(&state, &mut recorder);
        let road = recorder.transforms[&ROAD_MESH];
        assert_eq!(road, Vec3::new(0.0, 0.2, state.road_offset));
    }
}
