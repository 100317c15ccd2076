//! # Gallery Records
//!
//! Typed versions of the records the gallery's resource API hands out.
//! Everything here is plain data plus the small rules the back-office
//! enforces on it; nothing touches the GPU.
//!
//! ## Key Components
//!
//! - [`Artwork`] - paintings and sculptures with optional stored transforms
//! - [`GalleryEnvironment`] / [`EnvironmentCatalog`] - rooms, surfaces and lights
//! - [`MaterialProperties`] / [`ResolvedMaterial`] - shading parameters
//! - [`FrameCatalog`] / [`PedestalCatalog`] - named display presets
//! - [`Offer`] / [`Contact`] - buyer-facing records with status rules

pub mod artwork;
pub mod contact;
pub mod environment;
pub mod lighting;
pub mod material;
pub mod offer;
pub mod styles;

pub use artwork::{Artwork, ArtworkId, ArtworkKind, ModelFormat, Transform3D, Vec3Record};
pub use contact::{Contact, ContactStatus};
pub use environment::{default_environment, EnvironmentCatalog, GalleryEnvironment, RoomDimensions, SurfaceConfig};
pub use lighting::{LightKind, LightingConfig};
pub use material::{MaterialProperties, ResolvedMaterial};
pub use offer::{Offer, OfferDraft, OfferStatus};
pub use styles::{FrameCatalog, FrameStyle, PedestalCatalog, PedestalStyle};
