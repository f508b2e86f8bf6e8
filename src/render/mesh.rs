//! Triangle tessellation for the drive's scene shapes
//!
//! Raw triangle lists with analytic normals, no index buffers. Geometry is
//! tessellated once at mesh-add time; per-frame transforms happen on the
//! CPU in the pipeline.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::cruise::Shape;
use crate::cruise::road_path;

const CYLINDER_SEGMENTS: u32 = 8;
const TORUS_RADIAL_SEGMENTS: u32 = 8;
const TORUS_TUBULAR_SEGMENTS: u32 = 16;

/// One tessellated corner: local position and outward normal
pub type Corner = (Vec3, Vec3);

/// Tessellate a shape into local-space triangles
pub fn tessellate(shape: &Shape) -> Vec<Corner> {
    match *shape {
        Shape::Cuboid {
            width,
            height,
            depth,
        } => cuboid(width, height, depth),
        Shape::Cylinder { radius, length } => cylinder(radius, length),
        Shape::Torus { radius, tube } => torus(radius, tube),
        Shape::RoadStrip {
            width,
            length,
            x_segments,
            z_segments,
        } => road_strip(width, length, x_segments, z_segments),
    }
}

/// Box centered on the origin
fn cuboid(width: f32, height: f32, depth: f32) -> Vec<Corner> {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut triangles = Vec::with_capacity(36);

    // (normal, two in-plane axes scaled to half extents)
    let faces = [
        (Vec3::X * hw, Vec3::Y * hh, Vec3::Z * hd),
        (Vec3::NEG_X * hw, Vec3::Z * hd, Vec3::Y * hh),
        (Vec3::Y * hh, Vec3::Z * hd, Vec3::X * hw),
        (Vec3::NEG_Y * hh, Vec3::X * hw, Vec3::Z * hd),
        (Vec3::Z * hd, Vec3::X * hw, Vec3::Y * hh),
        (Vec3::NEG_Z * hd, Vec3::Y * hh, Vec3::X * hw),
    ];
    for (out, u, v) in faces {
        let normal = out.normalize();
        let quad = [out - u - v, out + u - v, out + u + v, out - u + v];
        for idx in [0, 1, 2, 0, 2, 3] {
            triangles.push((quad[idx], normal));
        }
    }
    triangles
}

/// Capped cylinder along the y axis, centered on the origin
fn cylinder(radius: f32, length: f32) -> Vec<Corner> {
    let half = length / 2.0;
    let mut triangles = Vec::new();
    for i in 0..CYLINDER_SEGMENTS {
        let t1 = i as f32 / CYLINDER_SEGMENTS as f32 * TAU;
        let t2 = (i + 1) as f32 / CYLINDER_SEGMENTS as f32 * TAU;
        let n1 = Vec3::new(t1.cos(), 0.0, t1.sin());
        let n2 = Vec3::new(t2.cos(), 0.0, t2.sin());
        let top1 = n1 * radius + Vec3::Y * half;
        let top2 = n2 * radius + Vec3::Y * half;
        let bot1 = n1 * radius - Vec3::Y * half;
        let bot2 = n2 * radius - Vec3::Y * half;

        // Side
        triangles.push((bot1, n1));
        triangles.push((top1, n1));
        triangles.push((bot2, n2));
        triangles.push((bot2, n2));
        triangles.push((top1, n1));
        triangles.push((top2, n2));

        // Caps
        triangles.push((Vec3::Y * half, Vec3::Y));
        triangles.push((top2, Vec3::Y));
        triangles.push((top1, Vec3::Y));
        triangles.push((Vec3::NEG_Y * half, Vec3::NEG_Y));
        triangles.push((bot1, Vec3::NEG_Y));
        triangles.push((bot2, Vec3::NEG_Y));
    }
    triangles
}

/// Torus lying in the xy plane, centered on the origin
fn torus(radius: f32, tube: f32) -> Vec<Corner> {
    let mut triangles = Vec::new();
    let corner = |u_step: u32, v_step: u32| -> Corner {
        let u = u_step as f32 / TORUS_TUBULAR_SEGMENTS as f32 * TAU;
        let v = v_step as f32 / TORUS_RADIAL_SEGMENTS as f32 * TAU;
        let normal = Vec3::new(v.cos() * u.cos(), v.cos() * u.sin(), v.sin());
        let position = Vec3::new(
            (radius + tube * v.cos()) * u.cos(),
            (radius + tube * v.cos()) * u.sin(),
            tube * v.sin(),
        );
        (position, normal)
    };
    for u in 0..TORUS_TUBULAR_SEGMENTS {
        for v in 0..TORUS_RADIAL_SEGMENTS {
            let a = corner(u, v);
            let b = corner(u + 1, v);
            let c = corner(u + 1, v + 1);
            let d = corner(u, v + 1);
            triangles.extend([a, b, c, a, c, d]);
        }
    }
    triangles
}

/// Flat grid in the xz plane whose x positions follow the road path of the
/// local z coordinate. Deformation is local, so the curve pattern travels
/// with the mesh as it wraps.
fn road_strip(width: f32, length: f32, x_segments: u32, z_segments: u32) -> Vec<Corner> {
    let mut triangles = Vec::new();
    let vertex = |xi: u32, zi: u32| -> Vec3 {
        let x = (xi as f32 / x_segments as f32 - 0.5) * width;
        let z = (zi as f32 / z_segments as f32 - 0.5) * length;
        Vec3::new(x + road_path(z), 0.0, z)
    };
    for zi in 0..z_segments {
        for xi in 0..x_segments {
            let a = vertex(xi, zi);
            let b = vertex(xi + 1, zi);
            let c = vertex(xi + 1, zi + 1);
            let d = vertex(xi, zi + 1);
            // Flat strip: normals point straight up
            triangles.extend([
                (a, Vec3::Y),
                (b, Vec3::Y),
                (c, Vec3::Y),
                (a, Vec3::Y),
                (c, Vec3::Y),
                (d, Vec3::Y),
            ]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_triangle_count() {
        let tris = cuboid(1.0, 2.0, 3.0);
        assert_eq!(tris.len(), 36);
        // All corners on the box surface
        for (pos, _) in &tris {
            assert!(pos.x.abs() <= 0.5 + 1e-5);
            assert!(pos.y.abs() <= 1.0 + 1e-5);
            assert!(pos.z.abs() <= 1.5 + 1e-5);
        }
    }

    #[test]
    fn test_torus_stays_in_band() {
        let tris = torus(0.3, 0.08);
        for (pos, normal) in &tris {
            let ring_dist = (pos.truncate().length() - 0.3).abs();
            assert!(ring_dist <= 0.08 + 1e-4);
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_road_strip_follows_path() {
        let tris = road_strip(16.0, 200.0, 8, 30);
        assert_eq!(tris.len(), 8 * 30 * 6);
        for (pos, _) in &tris {
            // Lateral extent is half width plus the path amplitude
            assert!(pos.x.abs() <= 8.0 + 7.0 + 1e-3);
            assert_eq!(pos.y, 0.0);
        }
        // The centerline really is displaced where the sine peaks
        let on_peak = tris
            .iter()
            .any(|(p, _)| p.x > 8.0 || p.x < -8.0);
        assert!(on_peak);
    }
}
