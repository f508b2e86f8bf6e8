//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for the lane-dodger
pub mod colors {
    /// Road backdrop (#0b1033)
    pub const BACKDROP: [f32; 4] = [0.043, 0.063, 0.2, 1.0];
    /// Scanline / player outline cyan (#17ffe1)
    pub const NEON_CYAN: [f32; 4] = [0.09, 1.0, 0.882, 1.0];
    /// Player body glow (#fa32ff)
    pub const GLOW_PINK: [f32; 4] = [0.98, 0.196, 1.0, 1.0];
    /// Windshield (#02fefe)
    pub const WINDSHIELD: [f32; 4] = [0.008, 0.996, 0.996, 1.0];
    /// Obstacle outline ring (#00ffe9)
    pub const OBSTACLE_RING: [f32; 4] = [0.0, 1.0, 0.914, 1.0];
}

/// Replace a color's alpha
#[inline]
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}
