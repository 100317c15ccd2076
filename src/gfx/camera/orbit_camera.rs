//! Camera that circles a target point
//!
//! Placement is spherical: `distance` from `target`, `pitch` above the
//! horizon and `yaw` around the vertical axis (0 looks down -Z). The eye
//! position is recomputed whenever one of them changes.

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::config::CameraConfig;

/// Maps OpenGL clip depth (-1..1) onto wgpu's 0..1
#[rustfmt::skip]
const GL_TO_WGPU: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Camera data uploaded with the globals
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Eye position; w pads to 16 bytes
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

/// Orbit limits; `None` leaves a side open
#[derive(Debug, Clone, Copy)]
pub struct OrbitLimits {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        let almost_vertical = std::f32::consts::FRAC_PI_2 - 0.01;
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -almost_vertical,
            max_pitch: almost_vertical,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
    /// Derived from the four fields above
    pub eye: Vector3<f32>,
    pub limits: OrbitLimits,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    home: Placement,
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let home = Placement {
            distance,
            pitch,
            yaw,
            target,
        };
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            target,
            eye: target,
            limits: OrbitLimits::default(),
            aspect,
            fovy: Rad(std::f32::consts::FRAC_PI_3),
            znear: 0.1,
            zfar: 1000.0,
            home,
        };
        camera.place();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(
            config.distance,
            config.pitch,
            config.yaw,
            Vector3::from(config.target),
            aspect,
        );
        camera.fovy = Deg(config.fov_degrees).into();
        camera.limits.min_distance = Some(config.min_distance);
        camera.limits.max_distance = Some(config.max_distance);
        camera.limits.min_pitch = config.min_pitch;
        camera
    }

    /// Back to the placement given at construction
    pub fn reset_to_home(&mut self) {
        let home = self.home;
        self.distance = home.distance;
        self.pitch = home.pitch;
        self.yaw = home.yaw;
        self.target = home.target;
        self.place();
    }

    pub fn set_distance(&mut self, distance: f32) {
        let min = self.limits.min_distance.unwrap_or(f32::EPSILON);
        let max = self.limits.max_distance.unwrap_or(f32::MAX);
        self.distance = distance.clamp(min, max);
        self.place();
    }

    /// Zooms by `steps` wheel notches; far views move faster
    pub fn zoom(&mut self, steps: f32) {
        let step = self.distance.max(1.1).log10();
        self.set_distance(self.distance - steps * step);
    }

    /// Turns around the target by the given angles in radians
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(self.limits.min_pitch, self.limits.max_pitch);
        self.place();
    }

    /// Slides eye and target across the view plane
    ///
    /// `right` and `up` are fractions of the orbit distance.
    pub fn pan(&mut self, right: f32, up: f32) {
        let forward = self.forward();
        let side = forward.cross(Vector3::unit_y()).normalize();
        let lift = side.cross(forward);
        let offset = (side * right + lift * up) * self.distance;
        self.target += offset;
        self.eye += offset;
    }

    /// Unit vector from the eye towards the target
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.eye).normalize()
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            Vector3::unit_y(),
        );
        GL_TO_WGPU * perspective(self.fovy, self.aspect, self.znear, self.zfar) * view
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.eye.extend(1.0).into(),
            view_proj: self.view_projection().into(),
        }
    }

    fn place(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.eye = self.target
            + Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn default_config_puts_the_eye_at_gallery_entrance() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 1.6);
        assert!((camera.eye - Vector3::new(0.0, 3.0, 10.0)).magnitude() < 1e-4);
        assert!((Deg::from(camera.fovy).0 - 60.0).abs() < 1e-4);
    }

    #[test]
    fn distance_is_clamped_to_limits() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.set_distance(100.0);
        assert_eq!(camera.distance, 25.0);
        camera.zoom(1000.0);
        assert_eq!(camera.distance, 3.0);
    }

    #[test]
    fn orbit_never_dips_below_the_floor() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.orbit(0.0, -2.0);
        assert!(camera.pitch > 0.0);
        assert!(camera.eye.y > camera.target.y);
    }

    #[test]
    fn reset_restores_the_starting_view() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        let start = camera.eye;
        camera.orbit(1.0, 0.2);
        camera.pan(0.5, 0.5);
        camera.reset_to_home();
        assert!((camera.eye - start).magnitude() < 1e-4);
        assert_eq!(camera.target, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 1.5);
        let uniform = camera.uniform();
        assert_eq!(uniform.view_position[1], camera.eye.y);

        let clip = camera.view_projection() * Vector4::new(0.0, 2.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
        assert!((clip.w - camera.distance).abs() < 1e-3);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
