//! Orbit camera and its mouse controls

pub mod controls;
pub mod orbit_camera;

pub use controls::{CameraDrag, OrbitControls};
pub use orbit_camera::{CameraUniform, OrbitCamera, OrbitLimits};
