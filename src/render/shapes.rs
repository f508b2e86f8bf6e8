//! Shape generation for 2D primitives
//!
//! All emitters return raw triangle lists in pixel space. Neon glow is
//! faked with gradient geometry: extra quads/rings whose outer vertices
//! fade to transparent, which interpolates into a soft halo.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, with_alpha};

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    vec![
        Vertex::new(from.x + perp.x, from.y + perp.y, color),
        Vertex::new(from.x - perp.x, from.y - perp.y, color),
        Vertex::new(to.x + perp.x, to.y + perp.y, color),
        Vertex::new(to.x + perp.x, to.y + perp.y, color),
        Vertex::new(from.x - perp.x, from.y - perp.y, color),
        Vertex::new(to.x - perp.x, to.y - perp.y, color),
    ]
}

/// Line with a glow halo: a solid core plus flanking quads fading to
/// transparent across `blur` pixels on each side
pub fn glow_line(from: Vec2, to: Vec2, width: f32, blur: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x);
    let core = perp * (width / 2.0);
    let halo = perp * (width / 2.0 + blur);
    let clear = with_alpha(color, 0.0);

    let mut vertices = line(from, to, width, color);
    // Two fade quads, one per side
    for sign in [1.0f32, -1.0] {
        let inner_a = from + core * sign;
        let inner_b = to + core * sign;
        let outer_a = from + halo * sign;
        let outer_b = to + halo * sign;
        vertices.push(Vertex::new(inner_a.x, inner_a.y, color));
        vertices.push(Vertex::new(outer_a.x, outer_a.y, clear));
        vertices.push(Vertex::new(inner_b.x, inner_b.y, color));
        vertices.push(Vertex::new(inner_b.x, inner_b.y, color));
        vertices.push(Vertex::new(outer_a.x, outer_a.y, clear));
        vertices.push(Vertex::new(outer_b.x, outer_b.y, clear));
    }
    vertices
}

/// Filled circle as a triangle fan
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
    vertices
}

/// Hollow circle band
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    gradient_ring(center, inner_radius, outer_radius, color, color, segments)
}

/// Ring whose inner and outer rims carry different colors; with a
/// transparent outer rim this renders as a radial glow falloff
pub fn gradient_ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let point = |r: f32, theta: f32, color: [f32; 4]| {
            Vertex::new(
                center.x + r * theta.cos(),
                center.y + r * theta.sin(),
                color,
            )
        };
        let inner1 = point(inner_radius, theta1, inner_color);
        let outer1 = point(outer_radius, theta1, outer_color);
        let inner2 = point(inner_radius, theta2, inner_color);
        let outer2 = point(outer_radius, theta2, outer_color);

        vertices.push(inner1);
        vertices.push(outer1);
        vertices.push(inner2);
        vertices.push(inner2);
        vertices.push(outer1);
        vertices.push(outer2);
    }
    vertices
}

/// Radial glow around a disc of `radius`, fading out across `blur`
pub fn glow_circle(center: Vec2, radius: f32, blur: f32, color: [f32; 4]) -> Vec<Vertex> {
    gradient_ring(
        center,
        radius,
        radius + blur,
        color,
        with_alpha(color, 0.0),
        32,
    )
}

/// Filled convex polygon as a fan from the first point
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((points.len().saturating_sub(2)) * 3);
    for window in 1..points.len().saturating_sub(1) {
        vertices.push(Vertex::new(points[0].x, points[0].y, color));
        vertices.push(Vertex::new(points[window].x, points[window].y, color));
        vertices.push(Vertex::new(points[window + 1].x, points[window + 1].y, color));
    }
    vertices
}

/// Closed polygon outline from thick line segments
pub fn stroke_polygon(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for i in 0..points.len() {
        let next = (i + 1) % points.len();
        vertices.extend(line(points[i], points[next], width, color));
    }
    vertices
}
