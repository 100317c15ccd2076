//! Frame rendering
//!
//! [`RenderEngine`] mirrors the scene into GPU resources and draws it with
//! the pipelines of [`pipeline_manager`], then lets the UI draw on top.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineKind, PipelineManager};
pub use render_engine::RenderEngine;
