//! # Model and Image Loading
//!
//! Turns artwork asset URLs into data the scene can hold. Fetching and
//! decoding run on worker threads ([`ModelLoader`]); the results are plain
//! host-side meshes and RGBA images, uploaded later by the render engine.
//!
//! ## Key Components
//!
//! - [`AssetSource`] - fetches bytes for a URL (files, HTTP, data URIs)
//! - [`ModelLoader`] - per-request workers with oneshot hand-back
//! - [`gltf_loader`] / [`fbx_loader`] - format decoders into [`LoadedModel`]

pub mod fbx_loader;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod gltf_loader;
pub mod loader;
pub mod source;

use std::sync::Arc;

use crate::{
    error::ModelResult,
    gallery::material::ResolvedMaterial,
    gfx::{
        picking::Aabb,
        scene::{MeshData, TextureImage},
    },
};

pub use loader::{AssetRequest, LoadId, LoadedAsset, ModelLoader};
pub use source::{AssetSource, DefaultSource, FileSource, HttpSource};

/// One drawable piece of a model with the material the file gave it
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: Arc<MeshData>,
    pub material: ResolvedMaterial,
    pub texture: Option<Arc<TextureImage>>,
}

/// Decoded model in its own coordinate space
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub parts: Vec<ModelPart>,
}

impl LoadedModel {
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangle_count()).sum()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.parts
            .iter()
            .filter_map(|p| p.mesh.bounds())
            .reduce(|a, b| a.union(&b))
    }
}

/// Decodes an encoded image (png, jpeg, webp) into RGBA8
pub fn decode_image(bytes: &[u8]) -> ModelResult<TextureImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    Ok(TextureImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
