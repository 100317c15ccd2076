//! Global uniform bindings for camera and lighting data
//!
//! Everything shared by all draws in a frame lives in one uniform buffer
//! bound to group 0: the camera, the summed ambient term and up to
//! [`MAX_LIGHTS`] positional or directional lights.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::{
        camera::CameraUniform,
        scene::{Light, PlacedLight},
    },
};

use super::bindings::{GroupLayout, Slot, Uniform};

/// Lights beyond this count are ignored by the shader
pub const MAX_LIGHTS: usize = 8;

const KIND_DIRECTIONAL: f32 = 1.0;
const KIND_POINT: f32 = 2.0;
const KIND_SPOT: f32 = 3.0;

/// One light as the shader sees it. MUST match `GpuLight` in gallery.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// World position, w = 1
    pub position: [f32; 4],
    /// Normalized direction the light travels, w unused
    pub direction: [f32; 4],
    /// rgb colour, w intensity
    pub color: [f32; 4],
    /// range (0 = unlimited), cos outer cone, cos inner cone, kind
    pub params: [f32; 4],
}

/// Global uniform buffer content. MUST match `Globals` in gallery.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// Summed ambient colour in rgb, active light count in w
    pub ambient: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl Default for GlobalUBOContent {
    fn default() -> Self {
        Self::new(CameraUniform::default(), &[])
    }
}

impl GlobalUBOContent {
    /// Packs the camera and the scene's placed lights
    pub fn new(camera: CameraUniform, lights: &[PlacedLight]) -> Self {
        let mut content = Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [0.0; 4],
            lights: [GpuLight::default(); MAX_LIGHTS],
        };

        let mut count = 0;
        for placed in lights {
            if let Light::Ambient { color, intensity } = placed.light {
                for (sum, c) in content.ambient.iter_mut().zip(color) {
                    *sum += c * intensity;
                }
                continue;
            }
            if count == MAX_LIGHTS {
                log::debug!("Light limit reached, ignoring light {:?}", placed.id);
                continue;
            }
            content.lights[count] = pack_light(placed);
            count += 1;
        }
        content.ambient[3] = count as f32;
        content
    }

    pub fn light_count(&self) -> usize {
        self.ambient[3] as usize
    }
}

fn pack_light(placed: &PlacedLight) -> GpuLight {
    let p = placed.position;
    // directional and spot lights aim at the world origin
    let to_origin = -p;
    let direction = if to_origin.magnitude2() > f32::EPSILON {
        to_origin.normalize()
    } else {
        -Vector3::unit_y()
    };

    let color = placed.light.color();
    let mut light = GpuLight {
        position: [p.x, p.y, p.z, 1.0],
        direction: [direction.x, direction.y, direction.z, 0.0],
        color: [color[0], color[1], color[2], placed.light.intensity()],
        params: [0.0; 4],
    };

    light.params = match placed.light {
        Light::Directional { .. } => [0.0, -1.0, -1.0, KIND_DIRECTIONAL],
        Light::Point { distance, .. } => [distance, -1.0, -1.0, KIND_POINT],
        Light::Spot {
            distance,
            angle,
            penumbra,
            ..
        } => {
            let inner = angle * (1.0 - penumbra.clamp(0.0, 1.0));
            // keep the smoothstep edges apart for a hard-edged cone
            let cos_inner = inner.cos().max(angle.cos() + 1e-4);
            [distance, angle.cos(), cos_inner, KIND_SPOT]
        }
        Light::Ambient { .. } => [0.0; 4],
    };
    light
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = Uniform<GlobalUBOContent>;

/// Uploads this frame's camera and lights
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &[PlacedLight],
) {
    ubo.write(queue, &GlobalUBOContent::new(camera, lights));
}

/// Bind group layout and bind group for the global uniforms (group 0)
pub struct GlobalBindings {
    layout: GroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let layout = GroupLayout::new(
            device,
            "globals",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            &[Slot::Uniform],
        );
        let bind_group = layout.bind(device, vec![ubo.resource()]);
        GlobalBindings { layout, bind_group }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.layout.layout()
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::NodeId;

    fn placed(light: Light, position: Vector3<f32>) -> PlacedLight {
        PlacedLight {
            id: NodeId(0),
            light,
            position,
        }
    }

    #[test]
    fn ambient_lights_sum_into_one_term() {
        let lights = [
            placed(Light::Ambient { color: [1.0, 1.0, 1.0], intensity: 0.25 }, Vector3::new(0.0, 0.0, 0.0)),
            placed(Light::Ambient { color: [1.0, 0.0, 0.0], intensity: 0.5 }, Vector3::new(0.0, 0.0, 0.0)),
        ];
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights);
        assert_eq!(content.ambient, [0.75, 0.25, 0.25, 0.0]);
        assert_eq!(content.light_count(), 0);
    }

    #[test]
    fn directional_light_points_at_origin() {
        let lights = [placed(
            Light::Directional {
                color: [1.0; 3],
                intensity: 1.0,
                cast_shadow: true,
                shadow_map_size: Some(1024),
            },
            Vector3::new(0.0, 10.0, 0.0),
        )];
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights);
        assert_eq!(content.light_count(), 1);
        assert_eq!(content.lights[0].direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(content.lights[0].params[3], KIND_DIRECTIONAL);
    }

    #[test]
    fn spot_cone_narrows_with_penumbra() {
        let lights = [placed(
            Light::Spot {
                color: [1.0; 3],
                intensity: 2.0,
                distance: 12.0,
                angle: 0.5,
                penumbra: 0.5,
                cast_shadow: false,
                shadow_map_size: None,
            },
            Vector3::new(3.0, 4.0, 0.0),
        )];
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights);
        let params = content.lights[0].params;
        assert_eq!(params[0], 12.0);
        assert!((params[1] - 0.5_f32.cos()).abs() < 1e-6);
        assert!((params[2] - 0.25_f32.cos()).abs() < 1e-6);
        assert!(params[2] > params[1]);
        assert_eq!(content.lights[0].color[3], 2.0);
    }

    #[test]
    fn extra_lights_are_dropped() {
        let lights: Vec<PlacedLight> = (0..MAX_LIGHTS + 3)
            .map(|i| {
                placed(
                    Light::Point { color: [1.0; 3], intensity: 1.0, distance: 0.0, cast_shadow: false },
                    Vector3::new(i as f32, 1.0, 0.0),
                )
            })
            .collect();
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights);
        assert_eq!(content.light_count(), MAX_LIGHTS);
    }
}
