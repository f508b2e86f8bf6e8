//! Pointer-drag input for the lane-dodger
//!
//! Mouse and single-touch arrive unified: the platform layer extracts a
//! client x from either event kind and feeds it through the same calls.

use super::state::{RunnerPhase, RunnerState};

/// Drag gesture state machine: idle until pointer-down, tracking until
/// pointer-up. Horizontal drag delta maps 1:1 onto the player position.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    dragging: bool,
    start_x: f32,
    player_start_x: f32,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag anchored at the pointer and the player's current x
    pub fn pointer_down(&mut self, x: f32, state: &RunnerState) {
        self.dragging = true;
        self.start_x = x;
        self.player_start_x = state.player.x;
    }

    /// Apply a pointer move. No-op unless a drag is live and the session is
    /// Playing (drags at the menu or after game-over are ignored).
    pub fn pointer_move(&mut self, x: f32, state: &mut RunnerState) {
        if !self.dragging || state.phase != RunnerPhase::Playing {
            return;
        }
        let dx = x - self.start_x;
        state.player.x = state.clamp_x(self.player_start_x + dx);
        state.player.lane = state.nearest_lane(state.player.x);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing_state() -> RunnerState {
        let mut state = RunnerState::new(4, 1000.0, 800.0);
        state.start();
        state
    }

    #[test]
    fn test_drag_delta_is_exact() {
        let mut state = playing_state();
        let mut drag = DragState::new();
        let before = state.player.x;
        drag.pointer_down(300.0, &state);
        drag.pointer_move(500.0, &mut state);
        assert_eq!(state.player.x, before + 200.0);
    }

    #[test]
    fn test_drag_clamps_to_playable_band() {
        let mut state = playing_state();
        let mut drag = DragState::new();
        let pad = state.player.size * 0.45;
        drag.pointer_down(300.0, &state);
        drag.pointer_move(5000.0, &mut state);
        assert_eq!(state.player.x, 1000.0 - pad);
        drag.pointer_move(-5000.0, &mut state);
        assert_eq!(state.player.x, pad);
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut state = playing_state();
        let mut drag = DragState::new();
        let before = state.player.x;
        drag.pointer_move(900.0, &mut state);
        assert_eq!(state.player.x, before);
    }

    #[test]
    fn test_move_after_up_is_ignored() {
        let mut state = playing_state();
        let mut drag = DragState::new();
        drag.pointer_down(300.0, &state);
        drag.pointer_up();
        assert!(!drag.is_dragging());
        let before = state.player.x;
        drag.pointer_move(900.0, &mut state);
        assert_eq!(state.player.x, before);
    }

    #[test]
    fn test_drag_before_start_is_ignored() {
        let mut state = RunnerState::new(4, 1000.0, 800.0);
        let mut drag = DragState::new();
        let before = state.player.x;
        drag.pointer_down(300.0, &state);
        drag.pointer_move(700.0, &mut state);
        assert_eq!(state.player.x, before);
    }

    #[test]
    fn test_lane_index_tracks_position() {
        let mut state = playing_state();
        let mut drag = DragState::new();
        drag.pointer_down(state.player.x, &state);
        drag.pointer_move(state.player.x + 150.0, &mut state);
        assert_eq!(state.player.lane, state.nearest_lane(state.player.x));
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            moves in proptest::collection::vec(-3000.0f32..4000.0, 1..50)
        ) {
            let mut state = playing_state();
            let mut drag = DragState::new();
            drag.pointer_down(500.0, &state);
            let pad = state.player.size * 0.45;
            for x in moves {
                drag.pointer_move(x, &mut state);
                prop_assert!(state.player.x >= pad);
                prop_assert!(state.player.x <= 1000.0 - pad);
            }
        }
    }
}
