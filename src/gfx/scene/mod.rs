//! # Scene Management Module
//!
//! An arena scene graph. The [`Scene`] owns all nodes; callers hold
//! [`NodeId`] handles and look nodes up when they need them, so removing
//! a subtree can never leave a dangling reference behind.
//!
//! ## Key Components
//!
//! - [`Scene`] - node arena with parent/child links and world matrices
//! - [`SceneNode`] - group, mesh or light with a local [`NodeTransform`]
//! - [`MeshData`] / [`GpuMesh`] - triangle data and its uploaded buffers
//! - [`Vertex3D`] - vertex format shared with the shader

pub mod mesh;
pub mod node;
pub mod scene;
pub mod vertex;

pub use mesh::{DrawObject, GpuMesh, MeshData};
pub use node::{
    Light, MeshNode, NodeId, NodeKind, NodeTransform, RenderLayer, SceneMaterial, SceneNode,
    TextureImage,
};
pub use scene::{PlacedLight, RenderItem, Scene};
pub use vertex::Vertex3D;
