//! # Scene Composition
//!
//! Turns an environment record and an ordered artwork list into a live
//! scene graph, and keeps that scene current as assets arrive and the
//! operator clicks and drags.
//!
//! ## Key Components
//!
//! - [`SceneContext`] - per-view owner of scene, loader, editor and handles
//! - [`layout`] - deterministic default placement
//! - [`surfaces`] / [`lighting`] - room planes and light rig
//! - [`displays`] - frames, pedestals, model slots and placeholders

pub mod context;
pub mod displays;
pub mod layout;
pub mod lighting;
pub mod surfaces;

use crate::gallery::{Artwork, FrameCatalog, GalleryEnvironment, PedestalCatalog};

pub use context::{ModelState, SceneContext};
pub use displays::Placeholder;
pub use layout::{default_position, placement};
pub use lighting::build_light;

/// Records a scene is composed from
#[derive(Debug, Clone, Default)]
pub struct GalleryInput {
    /// Active environment; the built-in default room when `None`
    pub environment: Option<GalleryEnvironment>,
    /// Artworks in display order
    pub artworks: Vec<Artwork>,
    pub frames: FrameCatalog,
    pub pedestals: PedestalCatalog,
}
