//! # User Interface Module
//!
//! Dear ImGui overlay for the gallery viewer.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`panel`] - the gallery window: edit toggles, artwork details, offers
//!
//! While a panel is hovered or a text field has focus, input goes to the
//! UI only; the camera and the gallery picker never see it.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{gallery_panel, PanelState};
