//! WebGPU rendering module
//!
//! Two pipelines, both fed by CPU-built triangle lists rebuilt each frame:
//! - `pipeline2d` draws the lane-dodger from pixel-space vertices
//! - `pipeline3d` is the retained scene behind the drive's `SceneAdapter`

pub mod mesh;
pub mod pipeline2d;
pub mod pipeline3d;
pub mod runner_pass;
pub mod shapes;
pub mod vertex;

pub use pipeline2d::Pipeline2d;
pub use pipeline3d::Scene3d;
