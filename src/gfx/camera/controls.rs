//! Mouse and keyboard driving of the orbit camera
//!
//! Left drag orbits, right drag (or shift + left drag) pans and the wheel
//! zooms. Button state comes from window events so presses consumed by the
//! UI or a gizmo handle never start a drag; motion comes from raw device
//! deltas.

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::{CameraUniform, OrbitCamera};
use crate::config::CameraConfig;

/// Pan per pixel, as a fraction of the orbit distance
const PAN_SPEED: f32 = 0.001;
/// Pixel scroll deltas per wheel notch
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraDrag {
    Orbit,
    Pan,
}

pub struct OrbitControls {
    pub camera: OrbitCamera,
    rotate_speed: f32,
    drag: Option<CameraDrag>,
    shift: bool,
}

impl OrbitControls {
    pub fn new(camera: OrbitCamera, rotate_speed: f32) -> Self {
        Self {
            camera,
            rotate_speed,
            drag: None,
            shift: false,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(OrbitCamera::from_config(config, aspect), config.rotate_speed)
    }

    pub fn drag(&self) -> Option<CameraDrag> {
        self.drag
    }

    /// Starts or ends a drag for a button the scene did not claim
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.drag = match button {
                    MouseButton::Left if self.shift => Some(CameraDrag::Pan),
                    MouseButton::Left => Some(CameraDrag::Orbit),
                    MouseButton::Right | MouseButton::Middle => Some(CameraDrag::Pan),
                    _ => self.drag,
                };
            }
            ElementState::Released => self.drag = None,
        }
    }

    /// Applies raw mouse travel; returns true when the camera moved
    pub fn motion(&mut self, (dx, dy): (f64, f64)) -> bool {
        let (dx, dy) = (dx as f32, dy as f32);
        match self.drag {
            Some(CameraDrag::Orbit) => {
                self.camera
                    .orbit(-dx * self.rotate_speed, dy * self.rotate_speed);
                true
            }
            Some(CameraDrag::Pan) => {
                self.camera.pan(-dx * PAN_SPEED, dy * PAN_SPEED);
                true
            }
            None => false,
        }
    }

    pub fn wheel(&mut self, delta: &MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / PIXELS_PER_LINE,
        };
        self.camera.zoom(notches);
    }

    /// Shift tracking; shift + C returns to the starting view
    pub fn key(&mut self, event: &KeyEvent) {
        match event.physical_key {
            PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) => {
                self.shift = event.state == ElementState::Pressed;
            }
            PhysicalKey::Code(KeyCode::KeyC)
                if self.shift && event.state == ElementState::Pressed =>
            {
                log::debug!("Camera back to its starting view");
                self.camera.reset_to_home();
            }
            _ => {}
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }

    pub fn uniform(&self) -> CameraUniform {
        self.camera.uniform()
    }
}
