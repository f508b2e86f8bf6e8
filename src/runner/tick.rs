//! Lane-dodger frame update
//!
//! One call per animation frame while the session is Playing. The frame
//! driver draws the current state first and advances it afterwards, which
//! preserves the draw-then-move frame order of the game this reproduces.

use rand::Rng;

use super::state::{Obstacle, Player, RunnerPhase, RunnerState};
use crate::consts::*;
use crate::hsl;

/// Advance the session by one frame.
///
/// In order: obstacles fall and the off-screen front of the queue is culled,
/// one spawn roll happens, collisions end the session, score accrues (also
/// on the collision frame). `dt` is capped at [`MAX_FRAME_DT`] so a stalled
/// tab cannot teleport obstacles through the player.
pub fn tick(state: &mut RunnerState, dt: f32) {
    if state.phase != RunnerPhase::Playing {
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);

    advance_obstacles(state, dt);
    maybe_spawn(state);
    if first_collision(state).is_some() {
        state.phase = RunnerPhase::GameOver;
    }
    state.score += dt * SCORE_RATE * (1.0 + state.road.lanes as f32 * SCORE_LANE_BONUS);
}

/// Move every obstacle down, then cull the off-screen front of the queue.
/// Obstacles spawn in increasing order and fall at a shared speed, so the
/// oldest is always frontmost and a FIFO pop is exact.
fn advance_obstacles(state: &mut RunnerState, dt: f32) {
    let speed = state.obstacle_speed + state.score / SCORE_SPEED_DIVISOR;
    for obs in &mut state.obstacles {
        obs.y += speed * dt;
    }
    let cull_below = state.height + DESPAWN_MARGIN;
    while state
        .obstacles
        .front()
        .is_some_and(|obs| obs.y > cull_below)
    {
        state.obstacles.pop_front();
    }
}

/// Roll the per-frame spawn chance. Deliberately not scaled by `dt`: the
/// expected spawn rate rises with the display refresh rate, reproducing the
/// original cadence.
fn maybe_spawn(state: &mut RunnerState) {
    let chance = SPAWN_CHANCE_BASE + SPAWN_CHANCE_PER_LANE * state.road.lanes as f32;
    if state.rng.random::<f32>() < chance {
        spawn_obstacle(state);
    }
}

fn spawn_obstacle(state: &mut RunnerState) {
    let lane = state.rng.random_range(0..state.road.lanes);
    let x = state.road.lane_width / 2.0 + lane as f32 * state.road.lane_width;
    let size = state.player.size * OBSTACLE_SIZE_BASE_FRAC
        + state.rng.random::<f32>() * state.player.size * OBSTACLE_SIZE_VAR_FRAC;
    let hue = OBSTACLE_HUE_BASE + state.rng.random::<f32>() * OBSTACLE_HUE_SPAN;
    state.obstacles.push_back(Obstacle {
        x,
        y: -size,
        size,
        color: hsl(hue, 1.0, 0.6),
        lane,
    });
}

/// Rectangular proximity test between the player and one obstacle. Both
/// axes must overlap; a near-miss on a single axis is not a collision.
pub fn overlaps(player: &Player, obs: &Obstacle) -> bool {
    (obs.y - player.y).abs() < obs.size + player.size * COLLIDE_Y_PAD_FRAC
        && (obs.x - player.x).abs() < obs.size + player.size * COLLIDE_X_PAD_FRAC
}

fn first_collision(state: &RunnerState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .find(|obs| overlaps(&state.player, obs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing_state(seed: u64) -> RunnerState {
        let mut state = RunnerState::new(seed, 1000.0, 800.0);
        state.start();
        state
    }

    /// Park the player where no falling obstacle can reach it
    fn sideline_player(state: &mut RunnerState) {
        state.player.x = -1e6;
    }

    #[test]
    fn test_idle_and_game_over_are_inert() {
        let mut state = RunnerState::new(3, 1000.0, 800.0);
        tick(&mut state, 0.016);
        assert_eq!(state.phase, RunnerPhase::Idle);
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());

        state.phase = RunnerPhase::GameOver;
        state.score = 12.5;
        tick(&mut state, 0.016);
        assert_eq!(state.score, 12.5);
    }

    #[test]
    fn test_dt_is_capped() {
        let mut state = playing_state(11);
        sideline_player(&mut state);
        let lanes = state.road.lanes as f32;
        tick(&mut state, 0.5);
        let expected = 0.045 * 35.0 * (1.0 + lanes * 0.1);
        assert!((state.score - expected).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_advance_formula() {
        let mut state = playing_state(11);
        sideline_player(&mut state);
        state.obstacles.push_back(Obstacle {
            x: 100.0,
            y: 100.0,
            size: 30.0,
            color: [1.0; 4],
            lane: 0,
        });
        let speed = state.obstacle_speed; // score is 0 at frame start
        tick(&mut state, 0.01);
        assert!((state.obstacles[0].y - (100.0 + speed * 0.01)).abs() < 1e-3);
    }

    #[test]
    fn test_fifo_cull_exact() {
        let mut state = playing_state(11);
        sideline_player(&mut state);
        // Front is past the cull line, the next one far from it
        state.obstacles.push_back(Obstacle {
            x: 100.0,
            y: 861.0, // height 800 + margin 60 exceeded
            size: 30.0,
            color: [1.0; 4],
            lane: 0,
        });
        state.obstacles.push_back(Obstacle {
            x: 100.0,
            y: 100.0,
            size: 30.0,
            color: [1.0; 4],
            lane: 1,
        });
        tick(&mut state, 1e-6);
        // The culled one is gone exactly once, the young one survives
        assert_eq!(state.obstacles.front().unwrap().lane, 1);
        assert!(state.obstacles.iter().all(|o| o.y <= 860.0));

        // Below the line nothing is culled, even right at it
        let mut state = playing_state(11);
        sideline_player(&mut state);
        state.obstacles.push_back(Obstacle {
            x: 100.0,
            y: 859.0,
            size: 30.0,
            color: [1.0; 4],
            lane: 2,
        });
        tick(&mut state, 1e-6);
        assert!(state.obstacles.iter().any(|o| o.lane == 2));
    }

    #[test]
    fn test_collision_example() {
        // Worked example: player (500,600) size 60, obstacle (520,590) size 40:
        // vertical gap 10 < 40 + 19.8, horizontal gap 20 < 40 + 27 -> collision
        let mut state = playing_state(11);
        state.player.x = 500.0;
        state.player.y = 600.0;
        state.player.size = 60.0;
        state.obstacles.push_back(Obstacle {
            x: 520.0,
            y: 590.0,
            size: 40.0,
            color: [1.0; 4],
            lane: 1,
        });
        tick(&mut state, 0.0);
        assert_eq!(state.phase, RunnerPhase::GameOver);
    }

    #[test]
    fn test_collision_is_symmetric() {
        let player = Player {
            x: 500.0,
            y: 600.0,
            size: 60.0,
            speed: 0.0,
            lane: 0,
            color: [1.0; 4],
        };
        let left = Obstacle {
            x: 480.0,
            y: 590.0,
            size: 40.0,
            color: [1.0; 4],
            lane: 0,
        };
        let right = Obstacle { x: 520.0, ..left.clone() };
        assert_eq!(overlaps(&player, &left), overlaps(&player, &right));
        assert!(overlaps(&player, &left));
    }

    #[test]
    fn test_near_miss_single_axis_is_not_a_collision() {
        let player = Player {
            x: 500.0,
            y: 600.0,
            size: 60.0,
            speed: 0.0,
            lane: 0,
            color: [1.0; 4],
        };
        // Vertical overlap only: horizontal gap 200 > 40 + 27
        let beside = Obstacle {
            x: 700.0,
            y: 590.0,
            size: 40.0,
            color: [1.0; 4],
            lane: 3,
        };
        assert!(!overlaps(&player, &beside));
        // Horizontal overlap only: vertical gap 500 > 40 + 19.8
        let above = Obstacle { x: 520.0, y: 100.0, ..beside };
        assert!(!overlaps(&player, &above));
    }

    #[test]
    fn test_score_accrues_on_the_collision_frame() {
        let mut state = playing_state(11);
        state.player.x = 500.0;
        state.player.y = 600.0;
        state.player.size = 60.0;
        state.obstacles.push_back(Obstacle {
            x: 500.0,
            y: 600.0,
            size: 40.0,
            color: [1.0; 4],
            lane: 1,
        });
        tick(&mut state, 0.03);
        assert_eq!(state.phase, RunnerPhase::GameOver);
        assert!(state.score > 0.0);
    }

    #[test]
    fn test_score_frame_rate_invariance() {
        // Same seed -> same lane roll; halved dt over doubled frames must
        // land on the same total (spawn rolls do not feed the score)
        let mut coarse = playing_state(21);
        let mut fine = playing_state(21);
        sideline_player(&mut coarse);
        sideline_player(&mut fine);
        assert_eq!(coarse.road.lanes, fine.road.lanes);
        for _ in 0..200 {
            tick(&mut coarse, 0.02);
        }
        for _ in 0..400 {
            tick(&mut fine, 0.01);
        }
        let rel = (coarse.score - fine.score).abs() / coarse.score;
        assert!(rel < 1e-3, "coarse {} vs fine {}", coarse.score, fine.score);
    }

    #[test]
    fn test_spawned_obstacles_are_well_formed() {
        let mut state = playing_state(33);
        sideline_player(&mut state);
        let mut seen = 0usize;
        for _ in 0..2000 {
            let before = state.obstacles.len();
            tick(&mut state, 0.016);
            if state.obstacles.len() > before {
                seen += 1;
                let obs = state.obstacles.back().unwrap();
                assert!(obs.lane < state.road.lanes);
                let expected_x = state.road.lane_width / 2.0
                    + obs.lane as f32 * state.road.lane_width;
                assert!((obs.x - expected_x).abs() < 1e-3);
                assert!(obs.size >= state.player.size * 0.70 - 1e-3);
                assert!(obs.size <= state.player.size * 0.90 + 1e-3);
            }
        }
        assert!(seen > 0, "expected at least one spawn in 2000 frames");
    }

    proptest! {
        #[test]
        fn prop_score_monotonic(dts in proptest::collection::vec(0.0f32..0.1, 1..200)) {
            let mut state = playing_state(9);
            sideline_player(&mut state);
            let mut last = 0.0f32;
            for dt in dts {
                tick(&mut state, dt);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
