//! Frame assembly for the lane-dodger
//!
//! Builds the complete per-frame triangle list from the session state, in
//! draw order: backdrop, scanlines, lane dividers, player, obstacles.

use glam::Vec2;

use super::shapes::{circle, glow_circle, glow_line, polygon, rect, ring, stroke_polygon};
use super::vertex::{Vertex, colors, with_alpha};
use crate::runner::RunnerState;

/// Build the full frame for the current state
pub fn frame_vertices(state: &RunnerState) -> Vec<Vertex> {
    let mut frame = Vec::with_capacity(1024);
    draw_road(state, &mut frame);
    draw_player(state, &mut frame);
    draw_obstacles(state, &mut frame);
    frame
}

fn draw_road(state: &RunnerState, frame: &mut Vec<Vertex>) {
    frame.extend(rect(
        Vec2::ZERO,
        Vec2::new(state.width, state.height),
        colors::BACKDROP,
    ));

    // Horizontal scanlines, alternating faint alphas
    for (i, &y) in state.scanlines.iter().enumerate() {
        let alpha = 0.06 + if i % 2 == 1 { 0.10 } else { 0.05 };
        frame.extend(glow_line(
            Vec2::new(0.0, y),
            Vec2::new(state.width, y),
            1.5,
            12.0,
            with_alpha(colors::NEON_CYAN, alpha),
        ));
    }

    // Lane dividers, one hue step apart
    for lane_line in &state.lane_lines {
        frame.extend(glow_line(
            Vec2::new(lane_line.x, 0.0),
            Vec2::new(lane_line.x, state.height),
            5.0,
            18.0,
            lane_line.color,
        ));
    }
}

fn draw_obstacles(state: &RunnerState, frame: &mut Vec<Vertex>) {
    for obs in &state.obstacles {
        let center = Vec2::new(obs.x, obs.y);
        frame.extend(glow_circle(center, obs.size, 16.0, with_alpha(obs.color, 0.5)));
        frame.extend(circle(center, obs.size, with_alpha(obs.color, 0.91), 32));
        // Outline ring floating just outside the orb
        frame.extend(ring(
            center,
            obs.size * 1.10 - 2.5,
            obs.size * 1.10 + 2.5,
            with_alpha(colors::OBSTACLE_RING, 0.5),
            32,
        ));
    }
}

fn draw_player(state: &RunnerState, frame: &mut Vec<Vertex>) {
    let (x, y, sz) = (state.player.x, state.player.y, state.player.size);

    // Retro hover body: a low trapezoid
    let body = [
        Vec2::new(x - sz * 0.36, y + sz * 0.3),
        Vec2::new(x - sz * 0.42, y - sz * 0.36),
        Vec2::new(x + sz * 0.42, y - sz * 0.36),
        Vec2::new(x + sz * 0.36, y + sz * 0.3),
    ];
    frame.extend(glow_circle(
        Vec2::new(x, y),
        sz * 0.45,
        32.0,
        with_alpha(colors::GLOW_PINK, 0.35),
    ));
    frame.extend(polygon(&body, with_alpha(state.player.color, 0.92)));
    frame.extend(stroke_polygon(&body, 6.0, colors::NEON_CYAN));

    // Neon windshield
    let windshield = [
        Vec2::new(x - sz * 0.23, y - sz * 0.19),
        Vec2::new(x, y - sz * 0.32),
        Vec2::new(x + sz * 0.23, y - sz * 0.19),
    ];
    frame.extend(polygon(&windshield, with_alpha(colors::WINDSHIELD, 0.8)));
}
