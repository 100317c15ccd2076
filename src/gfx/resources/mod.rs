//! GPU-side copies of scene data
//!
//! Bind group 0 carries the frame globals (camera and lights), group 1 a
//! node's transform and group 2 its material.

pub mod bindings;
pub mod global_bindings;
pub mod material;
pub mod texture_resource;
pub mod transform_bindings;

pub use bindings::{GroupLayout, Slot, Uniform};
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent, MAX_LIGHTS};
pub use material::{GpuMaterial, MaterialBindings, MaterialUniform};
pub use texture_resource::{DepthBuffer, TextureResource};
pub use transform_bindings::{TransformBindings, TransformUBO, TransformUniform};
