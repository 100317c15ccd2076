//! Vernissage
//!
//! A virtual art gallery viewer built on wgpu and winit. Artwork and
//! environment records are composed into a lit 3D room with framed
//! paintings and sculptures on pedestals; in edit mode a gizmo moves,
//! rotates and scales artworks and reports each finished edit.

pub mod app;
pub mod composition;
pub mod config;
pub mod editing;
pub mod error;
pub mod gallery;
pub mod gfx;
pub mod models;
pub mod prelude;
pub mod store;
pub mod ui;

pub use app::VernissageApp;
