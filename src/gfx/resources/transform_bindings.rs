//! Per-node model matrices (group 1)

use cgmath::{Matrix, Matrix4, SquareMatrix};

use super::bindings::{GroupLayout, Slot, Uniform};

/// MUST match `Transform` in gallery.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model` for normals
    pub normal: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for TransformUniform {
    fn from(model: Matrix4<f32>) -> Self {
        let normal = model
            .invert()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

pub type TransformUBO = Uniform<TransformUniform>;

pub struct TransformBindings {
    layout: GroupLayout,
}

impl TransformBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            layout: GroupLayout::new(device, "transform", wgpu::ShaderStages::VERTEX, &[Slot::Uniform]),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.layout.layout()
    }

    pub fn create_bind_group(&self, device: &wgpu::Device, ubo: &TransformUBO) -> wgpu::BindGroup {
        self.layout.bind(device, vec![ubo.resource()])
    }
}
