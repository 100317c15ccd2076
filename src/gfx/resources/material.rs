//! GPU side of scene materials
//!
//! Each mesh node owns a [`GpuMaterial`]: a uniform with the resolved
//! shading parameters plus the base colour texture (a shared white texel
//! when the material has none). Bound to group 2.

use std::sync::Arc;

use wgpu::Device;

use super::{
    bindings::{GroupLayout, Slot, Uniform},
    texture_resource::TextureResource,
};
use crate::{
    gallery::material::ResolvedMaterial,
    gfx::scene::{SceneMaterial, TextureImage},
};

/// GPU uniform data for materials. MUST match `Material` in gallery.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// rgb colour, a opacity
    pub base_color: [f32; 4],
    /// rgb emissive colour pre-multiplied by its intensity
    pub emissive: [f32; 4],
    /// metalness, roughness, unused, unused
    pub params: [f32; 4],
}

impl From<&ResolvedMaterial> for MaterialUniform {
    fn from(material: &ResolvedMaterial) -> Self {
        let [r, g, b] = material.color;
        let [er, eg, eb] = material.emissive;
        let k = material.emissive_intensity;
        let opacity = if material.transparent {
            material.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            base_color: [r, g, b, opacity],
            emissive: [er * k, eg * k, eb * k, 0.0],
            params: [
                material.metalness.clamp(0.0, 1.0),
                material.roughness.clamp(0.04, 1.0),
                0.0,
                0.0,
            ],
        }
    }
}

type MaterialUBO = Uniform<MaterialUniform>;

/// Material bind group layout: uniform, texture, sampler
pub struct MaterialBindings {
    layout: GroupLayout,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let layout = GroupLayout::new(
            device,
            "material",
            wgpu::ShaderStages::FRAGMENT,
            &[Slot::Uniform, Slot::Texture, Slot::Sampler],
        );
        MaterialBindings { layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.layout.layout()
    }

    fn create_bind_group(
        &self,
        device: &Device,
        ubo: &MaterialUBO,
        texture: &TextureResource,
    ) -> wgpu::BindGroup {
        self.layout.bind(
            device,
            vec![
                ubo.resource(),
                wgpu::BindingResource::TextureView(&texture.view),
                wgpu::BindingResource::Sampler(&texture.sampler),
            ],
        )
    }
}

/// Uploaded material for one mesh node
pub struct GpuMaterial {
    ubo: MaterialUBO,
    texture: Option<(Arc<TextureImage>, TextureResource)>,
    bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        white: &TextureResource,
        material: &SceneMaterial,
    ) -> Self {
        let mut ubo = MaterialUBO::new(device, "material");
        ubo.write(queue, &MaterialUniform::from(&material.params));

        let texture = material.texture.as_ref().map(|image| {
            let resource = TextureResource::from_image(device, queue, image, "Material Texture");
            (image.clone(), resource)
        });
        let bind_group = bindings.create_bind_group(
            device,
            &ubo,
            texture.as_ref().map(|(_, t)| t).unwrap_or(white),
        );

        Self {
            ubo,
            texture,
            bind_group,
        }
    }

    /// Re-uploads parameters; rebuilds the bind group when the texture changed
    pub fn sync(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        white: &TextureResource,
        material: &SceneMaterial,
    ) {
        self.ubo.write(queue, &MaterialUniform::from(&material.params));

        let current = self.texture.as_ref().map(|(image, _)| image);
        let unchanged = match (current, material.texture.as_ref()) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return;
        }

        self.texture = material.texture.as_ref().map(|image| {
            let resource = TextureResource::from_image(device, queue, image, "Material Texture");
            (image.clone(), resource)
        });
        self.bind_group = bindings.create_bind_group(
            device,
            &self.ubo,
            self.texture.as_ref().map(|(_, t)| t).unwrap_or(white),
        );
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_materials_ignore_opacity() {
        let mut material = ResolvedMaterial::MODEL_DEFAULT;
        material.opacity = 0.3;
        assert_eq!(MaterialUniform::from(&material).base_color[3], 1.0);

        material.transparent = true;
        assert_eq!(MaterialUniform::from(&material).base_color[3], 0.3);
    }

    #[test]
    fn emissive_is_scaled_by_intensity() {
        let mut material = ResolvedMaterial::MODEL_DEFAULT;
        material.emissive = [1.0, 0.5, 0.0];
        material.emissive_intensity = 2.0;
        assert_eq!(MaterialUniform::from(&material).emissive, [2.0, 1.0, 0.0, 0.0]);
    }
}
