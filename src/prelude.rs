//! # Vernissage Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use std::sync::Arc;
//! use vernissage::prelude::*;
//!
//! let input = GalleryInput {
//!     artworks: vec![Artwork::new("a1", "Dunes", ArtworkKind::Painting)],
//!     ..Default::default()
//! };
//! let mut app = VernissageApp::new(ViewerConfig::default(), input, Arc::new(DefaultSource::new(".")));
//! app.on_event(|event| println!("{:?}", event));
//! app.run().unwrap();
//! ```

pub use crate::app::VernissageApp;
pub use crate::composition::{GalleryInput, ModelState, SceneContext};
pub use crate::config::{EditorConfig, ViewerConfig};
pub use crate::editing::{GalleryEvent, TransformEditor, TransformMode};
pub use crate::gallery::{
    Artwork, ArtworkKind, EnvironmentCatalog, FrameCatalog, GalleryEnvironment, LightingConfig,
    MaterialProperties, Offer, PedestalCatalog, Transform3D, Vec3Record,
};
pub use crate::gfx::{camera::OrbitCamera, scene::Scene};
pub use crate::models::{AssetSource, DefaultSource, FileSource, HttpSource};
pub use crate::store::ArtworkFile;

pub use cgmath::Vector3;
