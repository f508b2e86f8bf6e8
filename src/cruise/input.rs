//! Steering input for the endless drive
//!
//! Two sources feed the same steer scalar: arrow keys (press sets the
//! direction, release recenters) and a horizontal touch swipe.

use super::state::CruiseState;

/// A swipe must travel this many pixels before it counts as a steer
const SWIPE_THRESHOLD: f32 = 40.0;

/// Steering keys the drive responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerKey {
    Left,
    Right,
}

/// Key press: steer toward the pressed side
pub fn apply_key_down(state: &mut CruiseState, key: SteerKey) {
    state.steer = match key {
        SteerKey::Left => -1.0,
        SteerKey::Right => 1.0,
    };
}

/// Key release: recenter (releasing either arrow stops steering)
pub fn apply_key_up(state: &mut CruiseState) {
    state.steer = 0.0;
}

/// Touch swipe state machine: anchor on touch-start, steer once the finger
/// travels past the threshold (re-anchoring so a long drag keeps steering),
/// recenter on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeState {
    anchor_x: Option<f32>,
}

impl SwipeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f32) {
        self.anchor_x = Some(x);
    }

    pub fn touch_move(&mut self, x: f32, state: &mut CruiseState) {
        let Some(anchor) = self.anchor_x else {
            return;
        };
        let dx = x - anchor;
        if dx.abs() > SWIPE_THRESHOLD {
            state.steer = if dx < 0.0 { -1.0 } else { 1.0 };
            self.anchor_x = Some(x);
        }
    }

    pub fn touch_end(&mut self, state: &mut CruiseState) {
        self.anchor_x = None;
        state.steer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cruise::state::VehicleKind;

    fn running() -> CruiseState {
        let mut state = CruiseState::new(1);
        state.select_vehicle(VehicleKind::Car);
        state
    }

    #[test]
    fn test_keys_set_and_clear_steer() {
        let mut state = running();
        apply_key_down(&mut state, SteerKey::Left);
        assert_eq!(state.steer, -1.0);
        apply_key_down(&mut state, SteerKey::Right);
        assert_eq!(state.steer, 1.0);
        apply_key_up(&mut state);
        assert_eq!(state.steer, 0.0);
    }

    #[test]
    fn test_swipe_below_threshold_is_ignored() {
        let mut state = running();
        let mut swipe = SwipeState::new();
        swipe.touch_start(100.0);
        swipe.touch_move(135.0, &mut state);
        assert_eq!(state.steer, 0.0);
    }

    #[test]
    fn test_swipe_steers_and_reanchors() {
        let mut state = running();
        let mut swipe = SwipeState::new();
        swipe.touch_start(100.0);
        swipe.touch_move(145.0, &mut state);
        assert_eq!(state.steer, 1.0);
        // Re-anchored at 145: a small further move changes nothing
        swipe.touch_move(150.0, &mut state);
        assert_eq!(state.steer, 1.0);
        // A long pull back past the threshold flips the direction
        swipe.touch_move(100.0, &mut state);
        assert_eq!(state.steer, -1.0);
    }

    #[test]
    fn test_touch_end_recenters() {
        let mut state = running();
        let mut swipe = SwipeState::new();
        swipe.touch_start(100.0);
        swipe.touch_move(200.0, &mut state);
        swipe.touch_end(&mut state);
        assert_eq!(state.steer, 0.0);
        // Moves after release are ignored
        swipe.touch_move(400.0, &mut state);
        assert_eq!(state.steer, 0.0);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut state = running();
        let mut swipe = SwipeState::new();
        swipe.touch_move(500.0, &mut state);
        assert_eq!(state.steer, 0.0);
    }
}
