//! # Graphics Module
//!
//! Everything between gallery records and pixels: camera, scene graph,
//! GPU resources, rendering, picking and the transform gizmo.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - orbit camera with mouse controls
//! - **Scene Management** ([`scene`]) - arena scene graph addressed by [`NodeId`]
//! - **Geometry** ([`geometry`]) - procedural boxes and planes
//! - **Resource Management** ([`resources`]) - uniforms, materials and textures
//! - **Rendering Pipeline** ([`rendering`]) - opaque, translucent and overlay passes
//! - **Picking** ([`picking`]) - cursor rays against world bounds
//! - **Gizmos** ([`gizmos`]) - axis handles for transform editing
//!
//! [`NodeId`]: scene::NodeId

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitCamera, OrbitControls};
pub use rendering::render_engine::RenderEngine;
