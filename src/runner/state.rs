//! Lane-dodger session state
//!
//! One `RunnerState` is one session: created at boot, re-rolled in place on
//! every restart. The RNG survives restarts so repeated sessions stay on one
//! reproducible stream.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{hex_rgb, hsl};

/// Player hover-car body color
const PLAYER_BODY: u32 = 0xe900d2;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    /// At the menu overlay, nothing advancing
    Idle,
    /// Session live, frame updates running
    Playing,
    /// Collision happened; overlay shown with the final score
    GameOver,
}

/// The player's hover-car
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Reference speed (pixels/sec); obstacle speed derives from it
    pub speed: f32,
    /// Nearest lane index, recomputed on drag. Informational only - it is
    /// not clamped and nothing else consumes it yet.
    pub lane: i32,
    pub color: [f32; 4],
}

/// Immutable-per-session road geometry
#[derive(Debug, Clone)]
pub struct Road {
    pub lanes: u32,
    pub width: f32,
    pub lane_width: f32,
}

/// A falling neon orb
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 4],
    pub lane: u32,
}

/// Decorative lane divider
#[derive(Debug, Clone)]
pub struct LaneLine {
    pub x: f32,
    pub color: [f32; 4],
}

/// Complete lane-dodger session
#[derive(Debug, Clone)]
pub struct RunnerState {
    pub phase: RunnerPhase,
    /// Viewport dimensions in CSS pixels; mutated by resize, read everywhere
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub road: Road,
    /// Spawned in increasing order, culled strictly from the front
    pub obstacles: VecDeque<Obstacle>,
    /// Accumulated score; display value is the floor
    pub score: f32,
    pub lane_lines: Vec<LaneLine>,
    /// Y positions of the background scanlines
    pub scanlines: Vec<f32>,
    /// Base fall speed for this session (before the score ramp)
    pub obstacle_speed: f32,
    /// Session seed, for reproducing a run from logs
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl RunnerState {
    /// Create a session at the menu, with geometry already rolled so the
    /// backdrop can render behind the overlay.
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let mut state = Self {
            phase: RunnerPhase::Idle,
            width,
            height,
            player: Player {
                x: 0.0,
                y: 0.0,
                size: 0.0,
                speed: 0.0,
                lane: 0,
                color: [0.0; 4],
            },
            road: Road {
                lanes: 0,
                width,
                lane_width: width,
            },
            obstacles: VecDeque::new(),
            score: 0.0,
            lane_lines: Vec::new(),
            scanlines: Vec::new(),
            obstacle_speed: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset();
        state
    }

    /// Re-roll the session: new lane count, fresh geometry, cleared
    /// obstacles, zero score. Called on every (re)start.
    pub fn reset(&mut self) {
        let lanes = 3 + self.rng.random_range(0..2u32);
        let lane_width = self.width / (lanes + 1) as f32;

        self.player = Player {
            x: self.width / 2.0,
            y: self.height * PLAYER_Y_FRAC,
            size: lane_width * PLAYER_SIZE_FRAC,
            speed: self.height / PLAYER_SPEED_DIVISOR,
            lane: (lanes / 2) as i32,
            color: rgba(PLAYER_BODY),
        };
        self.road = Road {
            lanes,
            width: self.width,
            lane_width,
        };
        self.obstacles.clear();
        self.lane_lines = (0..=lanes)
            .map(|i| LaneLine {
                x: lane_width * i as f32,
                color: hsl(LANE_HUE_BASE + LANE_HUE_STEP * i as f32, 1.0, 0.6),
            })
            .collect();
        self.scanlines = (0..SCANLINE_ROWS)
            .map(|i| self.height / 12.0 * i as f32)
            .collect();
        self.score = 0.0;
        self.obstacle_speed = self.player.speed * OBSTACLE_SPEED_FACTOR;
    }

    /// Start (or restart) playing
    pub fn start(&mut self) {
        self.reset();
        self.phase = RunnerPhase::Playing;
    }

    /// Floored score for display
    pub fn display_score(&self) -> u32 {
        self.score as u32
    }

    /// Viewport changed. Lane geometry intentionally stays as rolled; only
    /// the clamp/cull bounds pick up the new size until the next reset.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Clamp a horizontal position to the playable band
    pub fn clamp_x(&self, x: f32) -> f32 {
        let pad = self.player.size * EDGE_PAD_FRAC;
        x.clamp(pad, self.width - pad)
    }

    /// Nearest lane index for a horizontal position (unclamped)
    pub fn nearest_lane(&self, x: f32) -> i32 {
        ((x - self.road.lane_width / 2.0) / self.road.lane_width).round() as i32
    }
}

#[inline]
fn rgba(hex: u32) -> [f32; 4] {
    let [r, g, b] = hex_rgb(hex);
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_geometry() {
        // Lane width = w / (lanes + 1) for whichever count was rolled
        for seed in 0..20 {
            let state = RunnerState::new(seed, 1000.0, 800.0);
            let lanes = state.road.lanes;
            assert!(lanes == 3 || lanes == 4);
            assert!((state.road.lane_width - 1000.0 / (lanes + 1) as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_player_starts_in_middle_lane() {
        for seed in 0..20 {
            let state = RunnerState::new(seed, 1000.0, 800.0);
            let mid = state.road.lanes / 2;
            assert_eq!(state.player.lane, mid as i32);
            // Horizontally centered, and inside the middle lane's corridor
            assert_eq!(state.player.x, 500.0);
            let left = state.road.lane_width * mid as f32;
            let right = state.road.lane_width * (mid + 1) as f32;
            assert!(state.player.x >= left && state.player.x <= right);
        }
    }

    #[test]
    fn test_reset_derivations() {
        let state = RunnerState::new(7, 900.0, 700.0);
        assert_eq!(state.player.y, 700.0 * 0.7);
        assert!((state.player.speed - 700.0 / 2.8).abs() < 1e-4);
        assert!((state.player.size - state.road.lane_width * 0.60).abs() < 1e-4);
        assert!((state.obstacle_speed - state.player.speed * 0.70).abs() < 1e-4);
        assert_eq!(state.lane_lines.len(), state.road.lanes as usize + 1);
        assert_eq!(state.scanlines.len(), 10);
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_restart_rerolls_lane_count() {
        // Both lane counts must be reachable across restarts of one session
        let mut state = RunnerState::new(42, 1000.0, 800.0);
        let mut seen_three = false;
        let mut seen_four = false;
        for _ in 0..64 {
            state.start();
            match state.road.lanes {
                3 => seen_three = true,
                4 => seen_four = true,
                other => panic!("unexpected lane count {other}"),
            }
            assert_eq!(state.phase, RunnerPhase::Playing);
            assert_eq!(state.display_score(), 0);
        }
        assert!(seen_three && seen_four);
    }

    #[test]
    fn test_clamp_x() {
        let state = RunnerState::new(1, 1000.0, 800.0);
        let pad = state.player.size * 0.45;
        assert_eq!(state.clamp_x(-50.0), pad);
        assert_eq!(state.clamp_x(2000.0), 1000.0 - pad);
        assert_eq!(state.clamp_x(500.0), 500.0);
    }

    #[test]
    fn test_resize_keeps_lane_geometry() {
        let mut state = RunnerState::new(5, 1000.0, 800.0);
        let lane_width = state.road.lane_width;
        state.resize_viewport(1400.0, 900.0);
        assert_eq!(state.width, 1400.0);
        assert_eq!(state.road.lane_width, lane_width);
    }
}
